// src/parse/fields.rs
//! Shared field-extraction primitives: money, dates, account numbers,
//! labeled lines. Regexes are compiled once; extraction that finds nothing
//! returns `None`/`""`, so the parser never fails on a malformed field.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_MONEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\s*-?\d{1,3}(?:,\d{3})*(?:\.\d{2})?").expect("money regex"));

// The three date shapes US reports actually print.
static RE_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        \b\d{1,2}/\d{1,2}/\d{2,4}\b          # 03/12/2024
        | \b\d{4}-\d{2}-\d{2}\b              # 2024-03-12
        | \b(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\.?\s+\d{1,2},?\s+\d{4}\b
        ",
    )
    .expect("date regex")
});

// Masked forms as printed ("****1234", "XXXX-1234") or a bare digit run.
static RE_ACCOUNT_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:[*Xx]{2,}[-\s]?\d{2,4}|\b\d{8,19}\b)").expect("acct regex"));

static RE_LABELED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([A-Za-z][A-Za-z #/.]{1,30}?)\s*:\s*(.+)$").expect("label regex"));

/// First dollar amount on the line, parsed ("$1,523.44" → 1523.44).
pub fn first_money(line: &str) -> Option<f64> {
    let m = RE_MONEY.find(line)?;
    let cleaned: String = m
        .as_str()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned.parse::<f64>().ok()
}

/// First dollar amount on the line, verbatim as printed.
pub fn first_money_str(line: &str) -> String {
    RE_MONEY
        .find(line)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// First date on the line, verbatim as printed.
pub fn first_date(line: &str) -> String {
    RE_DATE
        .find(line)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// First account-number-shaped token, masked before it leaves the parser.
pub fn first_account_number(line: &str) -> String {
    RE_ACCOUNT_NUMBER
        .find(line)
        .map(|m| crate::redact::mask_account_number(m.as_str()))
        .unwrap_or_default()
}

/// `"Balance: $1,523.44"` → `("balance", "$1,523.44")`. Labels are
/// normalized to lowercase with collapsed spacing for matching.
pub fn labeled(line: &str) -> Option<(String, &str)> {
    let caps = RE_LABELED.captures(line)?;
    let label = caps
        .get(1)?
        .as_str()
        .to_ascii_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let value = caps.get(2)?.as_str().trim();
    Some((label, value))
}
