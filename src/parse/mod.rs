// src/parse/mod.rs
//! Report parser: normalized text in, `CreditReportData` out.
//!
//! Sequential regex passes: section split, then per-section field
//! extraction. There is no validation pass and no error path: malformed or
//! unexpected layouts produce empty or partially-populated records, and the
//! detector downstream pads the issue list when little survives.

pub mod accounts;
pub mod fields;
pub mod inquiries;
pub mod personal;
pub mod public_records;
pub mod sections;

use crate::creditors::CreditorRegistry;
use crate::redact;
use crate::report::{BureausPresent, CreditReportData};
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("parse_reports_total", "Reports run through the parser.");
        describe_counter!("parse_accounts_total", "Accounts extracted across all reports.");
        describe_counter!(
            "parse_empty_reports_total",
            "Reports that produced no accounts and no inquiries."
        );
    });
}

/// Parse one report's normalized text.
pub fn parse_report(
    text: &str,
    source_was_pdf: bool,
    registry: &CreditorRegistry,
) -> CreditReportData {
    ensure_metrics_described();
    counter!("parse_reports_total").increment(1);

    let split = sections::split(text);

    let personal_info = personal::parse(&split.personal);
    let accounts = accounts::parse(&split.accounts, registry);
    let inquiries = inquiries::parse(&split.inquiries, registry);
    let public_records = public_records::parse(&split.public_records);

    counter!("parse_accounts_total").increment(accounts.len() as u64);
    if accounts.is_empty() && inquiries.is_empty() {
        counter!("parse_empty_reports_total").increment(1);
        tracing::debug!(
            doc = %redact::anon_hash(text),
            "parser found no accounts or inquiries"
        );
    }

    CreditReportData {
        bureaus: detect_bureaus(text),
        personal_info,
        accounts,
        inquiries,
        public_records,
        raw_text: Some(redact::scrub_text(text)),
        source_was_pdf,
    }
}

/// Bureau markers can appear anywhere (letterhead, column headers), so this
/// scans the whole text rather than any one section.
fn detect_bureaus(text: &str) -> BureausPresent {
    let lower = text.to_ascii_lowercase();
    BureausPresent {
        experian: lower.contains("experian"),
        equifax: lower.contains("equifax"),
        transunion: lower.contains("transunion") || lower.contains("trans union"),
    }
}
