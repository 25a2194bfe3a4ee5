//! # Creditor Registry
//!
//! Configurable mapping from furnisher names as printed on reports
//! (e.g. "MIDLAND CREDIT MGMT", "NAVIENT SOLUTIONS") to a furnisher class.
//!
//! - Loads from JSON config (classes + aliases).
//! - Case-insensitive lookup with normalization of punctuation, dashes, etc.
//! - Aliases map alternative spellings to canonical names.
//! - Fallback order: aliases → exact match → substring match → fuzzy match
//!   (Jaro-Winkler) → `Unknown`.
//! - Includes a built-in `default_seed()` with common US furnishers.
//!
//! The detector uses the class to short-circuit its keyword chain (a known
//! collection agency is a collection issue even without "collection" in the
//! status line), and the parser uses the registry for its
//! "looks like a real creditor name" check.

use serde::Deserialize;
use std::{collections::HashMap, fs, path::Path};

/// What kind of furnisher a tradeline belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FurnisherClass {
    Bank,
    CardIssuer,
    CollectionAgency,
    StudentLoanServicer,
    AutoLender,
    Unknown,
}

/// Minimum Jaro-Winkler similarity for the fuzzy tier.
const FUZZY_MATCH_MIN: f64 = 0.85;

#[derive(Debug, Clone, Deserialize)]
pub struct CreditorRegistry {
    /// Classes for canonical furnisher names (normalized keys).
    #[serde(default)]
    pub classes: HashMap<String, FurnisherClass>,
    /// Aliases mapping non-canonical names → canonical names.
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

impl CreditorRegistry {
    /// Load from a JSON file; falls back to `default_seed()` on any error.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(path) {
            Ok(s) => serde_json::from_str(&s).unwrap_or_else(|_| Self::default_seed()),
            Err(_) => Self::default_seed(),
        }
    }

    /// Classify a furnisher name.
    ///
    /// Steps:
    /// 1. Alias lookup (normalized) → canonical → class.
    /// 2. Exact class match.
    /// 3. Substring fallback ("NAVIENT SOLUTIONS LLC" → "navient").
    /// 4. Fuzzy fallback for OCR/extraction noise ("NAVLENT" → "navient").
    /// 5. `Unknown`.
    pub fn class_for(&self, name: &str) -> FurnisherClass {
        let s = normalize(name);
        if s.is_empty() {
            return FurnisherClass::Unknown;
        }

        // 1) Alias resolution.
        if let Some(canon) = self.aliases.get(&s) {
            if let Some(&c) = self.classes.get(&normalize(canon)) {
                return c;
            }
        }

        // 2) Exact match.
        if let Some(&c) = self.classes.get(&s) {
            return c;
        }

        // 3) Substring fallback.
        for (k, &c) in &self.classes {
            if s.contains(k.as_str()) {
                return c;
            }
        }

        // 4) Fuzzy fallback (extraction noise tolerance); best score wins.
        let best = self
            .classes
            .iter()
            .map(|(k, &c)| (strsim::jaro_winkler(&s, k), c))
            .max_by(|a, b| a.0.total_cmp(&b.0));
        if let Some((score, c)) = best {
            if score >= FUZZY_MATCH_MIN {
                return c;
            }
        }

        FurnisherClass::Unknown
    }

    pub fn is_collection_agency(&self, name: &str) -> bool {
        self.class_for(name) == FurnisherClass::CollectionAgency
    }

    pub fn is_student_loan_servicer(&self, name: &str) -> bool {
        self.class_for(name) == FurnisherClass::StudentLoanServicer
    }

    /// Shape check used by the account parser: does this line plausibly name
    /// a creditor at all? Registry membership is sufficient; otherwise the
    /// line must look name-like (letters, not a report keyword, not a value).
    pub fn looks_like_creditor(&self, line: &str) -> bool {
        let s = normalize(line);
        if s.len() < 3 || s.len() > 60 {
            return false;
        }
        if self.class_for(line) != FurnisherClass::Unknown {
            return true;
        }
        let alpha = s.chars().filter(|c| c.is_ascii_alphabetic()).count();
        if alpha < 3 {
            return false;
        }
        // Report furniture, not furnishers.
        const NOISE: [&str; 10] = [
            "account number",
            "balance",
            "payment status",
            "date opened",
            "last activity",
            "personal information",
            "inquiries",
            "public records",
            "credit summary",
            "page",
        ];
        !NOISE.iter().any(|n| s.starts_with(n))
    }

    /// Built-in seed with common US banks, card issuers, collection
    /// agencies, and student loan servicers. Used when no config is found.
    pub fn default_seed() -> Self {
        let mut classes = HashMap::new();
        let mut aliases = HashMap::new();

        use FurnisherClass::*;
        for (k, v) in [
            ("chase", Bank),
            ("bank of america", Bank),
            ("wells fargo", Bank),
            ("citibank", Bank),
            ("us bank", Bank),
            ("pnc bank", Bank),
            ("capital one", CardIssuer),
            ("discover", CardIssuer),
            ("american express", CardIssuer),
            ("synchrony", CardIssuer),
            ("barclays", CardIssuer),
            ("credit one", CardIssuer),
            ("midland credit", CollectionAgency),
            ("portfolio recovery", CollectionAgency),
            ("lvnv funding", CollectionAgency),
            ("enhanced recovery", CollectionAgency),
            ("convergent outsourcing", CollectionAgency),
            ("ic system", CollectionAgency),
            ("navient", StudentLoanServicer),
            ("nelnet", StudentLoanServicer),
            ("mohela", StudentLoanServicer),
            ("sallie mae", StudentLoanServicer),
            ("great lakes", StudentLoanServicer),
            ("fedloan", StudentLoanServicer),
            ("dept of education", StudentLoanServicer),
            ("aidvantage", StudentLoanServicer),
            ("ally financial", AutoLender),
            ("santander consumer", AutoLender),
            ("gm financial", AutoLender),
            ("toyota financial", AutoLender),
        ] {
            classes.insert(k.to_string(), v);
        }

        for (a, c) in [
            ("jpmcb", "chase"),
            ("jp morgan chase", "chase"),
            ("bofa", "bank of america"),
            ("boa", "bank of america"),
            ("wf", "wells fargo"),
            ("citi", "citibank"),
            ("cap one", "capital one"),
            ("capone", "capital one"),
            ("amex", "american express"),
            ("syncb", "synchrony"),
            ("synchrony bank", "synchrony"),
            ("midland credit management", "midland credit"),
            ("mcm", "midland credit"),
            ("portfolio recovery associates", "portfolio recovery"),
            ("pra", "portfolio recovery"),
            ("erc", "enhanced recovery"),
            ("navient solutions", "navient"),
            ("us dept of ed", "dept of education"),
            ("us department of education", "dept of education"),
            ("dept of ed", "dept of education"),
            ("slm", "sallie mae"),
            ("fedloan servicing", "fedloan"),
            ("great lakes higher ed", "great lakes"),
        ] {
            aliases.insert(a.to_string(), c.to_string());
        }

        Self { classes, aliases }
    }
}

/// Normalize input string: lowercase, replace punctuation/dashes with
/// spaces, collapse multiple spaces into one.
fn normalize(s: &str) -> String {
    let mut out = s.trim().to_ascii_lowercase();

    for ch in ['—', '–', '-', '_', '/', '\\'] {
        out = out.replace(ch, " ");
    }
    out = out.replace(['\n', '\r', '\t', '.', ',', '#', '*', '\''], " ");

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reg() -> CreditorRegistry {
        CreditorRegistry::default_seed()
    }

    #[test]
    fn exact_match() {
        assert_eq!(reg().class_for("Navient"), FurnisherClass::StudentLoanServicer);
    }

    #[test]
    fn alias_match() {
        let r = reg();
        assert_eq!(r.class_for("AMEX"), FurnisherClass::CardIssuer);
        assert_eq!(r.class_for("US DEPT OF ED"), FurnisherClass::StudentLoanServicer);
    }

    #[test]
    fn substring_match() {
        let r = reg();
        assert_eq!(
            r.class_for("MIDLAND CREDIT MGMT INC"),
            FurnisherClass::CollectionAgency
        );
        assert_eq!(
            r.class_for("NAVIENT SOLUTIONS LLC"),
            FurnisherClass::StudentLoanServicer
        );
    }

    #[test]
    fn fuzzy_match_tolerates_extraction_noise() {
        // One transposed character, as OCR tends to produce.
        assert_eq!(reg().class_for("NAVEINT"), FurnisherClass::StudentLoanServicer);
    }

    #[test]
    fn unknown_for_unrecognized_names() {
        assert_eq!(reg().class_for("BOB'S DISCOUNT SOFAS"), FurnisherClass::Unknown);
    }

    #[test]
    fn case_and_punctuation_insensitive() {
        let r = reg();
        assert_eq!(r.class_for("sallie—mae"), r.class_for("SALLIE MAE"));
        assert_eq!(r.class_for("G.M. Financial"), FurnisherClass::AutoLender);
    }

    #[test]
    fn creditor_shape_check_rejects_report_furniture() {
        let r = reg();
        assert!(r.looks_like_creditor("ABC COLLECTIONS AGENCY"));
        assert!(r.looks_like_creditor("FIRST PREMIER BANK"));
        assert!(!r.looks_like_creditor("Account Number: ****1234"));
        assert!(!r.looks_like_creditor("$1,523.44"));
        assert!(!r.looks_like_creditor("--"));
    }
}
