//! PII redaction helpers.
//!
//! Raw report text contains SSNs, account numbers, and addresses. Nothing in
//! this crate logs raw report text: log lines reference a short content hash,
//! and any identifier that leaves the parser is masked first.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_SSN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{3})-?(\d{2})-?(\d{4})\b").expect("ssn regex"));

static RE_LONG_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{5,}").expect("digits regex"));

/// Short, stable, anonymized reference for a piece of text (for logs only).
pub fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// "123-45-6789" → "XXX-XX-6789". Already-masked input passes through.
pub fn mask_ssn(ssn: &str) -> String {
    RE_SSN.replace_all(ssn, "XXX-XX-$3").into_owned()
}

/// Keep the last four digits of an account number, mask the rest.
/// Short identifiers (under 5 digits) are left as printed.
pub fn mask_account_number(number: &str) -> String {
    RE_LONG_DIGITS
        .replace_all(number, |caps: &regex::Captures<'_>| {
            let digits = &caps[0];
            let tail = &digits[digits.len() - 4..];
            format!("****{tail}")
        })
        .into_owned()
}

/// Blanket pass over free text before it is stored alongside a session:
/// masks SSN-shaped and long digit runs.
pub fn scrub_text(text: &str) -> String {
    mask_account_number(&mask_ssn(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_ssn_keeping_last_four() {
        assert_eq!(mask_ssn("123-45-6789"), "XXX-XX-6789");
        assert_eq!(mask_ssn("SSN: 123456789"), "SSN: XXX-XX-6789");
        assert_eq!(mask_ssn("XXX-XX-6789"), "XXX-XX-6789");
    }

    #[test]
    fn masks_account_numbers_keeping_last_four() {
        assert_eq!(mask_account_number("4400123456781234"), "****1234");
        assert_eq!(mask_account_number("Acct 55501234"), "Acct ****1234");
        // Too short to be an account number; leave as printed.
        assert_eq!(mask_account_number("1234"), "1234");
    }

    #[test]
    fn anon_hash_is_short_and_stable() {
        let a = anon_hash("some report text");
        let b = anon_hash("some report text");
        assert_eq!(a, b);
        assert_eq!(a.len(), 12);
        assert_ne!(a, anon_hash("other text"));
    }

    #[test]
    fn scrub_handles_mixed_text() {
        let s = scrub_text("SSN 987-65-4321, card 4400123412341234");
        assert!(!s.contains("987-65"));
        assert!(s.contains("XXX-XX-4321"));
        assert!(s.contains("****1234"));
    }
}
