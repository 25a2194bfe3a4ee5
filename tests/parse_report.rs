// tests/parse_report.rs
// End-to-end parser behavior over realistic report text, including the
// silent-degradation failure mode.

use credit_report_analyzer::creditors::CreditorRegistry;
use credit_report_analyzer::parse::parse_report;
use credit_report_analyzer::report::{Bureau, InquiryKind};

fn reg() -> CreditorRegistry {
    CreditorRegistry::default_seed()
}

const THREE_BUREAU_REPORT: &str = "\
Tri-Merge Credit Report
Sources: Experian / Equifax / TransUnion

PERSONAL INFORMATION
Name: JANE R DOE
Address: 42 ELM AVE, PORTLAND, OR 97201
Date of Birth: 07/04/1985
SSN: 987-65-4321

ACCOUNTS
Account Name: CAPITAL ONE
Account Number: 4400123456781234
Balance: $2,310.55
Payment Status: 30 days late
Date Opened: 06/01/2018
Last Activity: 02/10/2024
Bureau: Experian

MIDLAND CREDIT MGMT
Account Number: ****5678
Balance: $640.00
Status: collection account
Bureau: Equifax

NAVIENT SOLUTIONS
Balance: $18,250.00
Payment Status: Current

NAVIENT SOLUTIONS LLC
Balance: $18,300.00
Payment Status: Current

INQUIRIES
CHASE 01/15/2024 Experian
CHASE 01/15/2024 Experian
CARMAX AUTO FINANCE 11/02/2023 TransUnion

PUBLIC RECORDS
Chapter 13 Bankruptcy filed 05/20/2021 dismissed
";

#[test]
fn parses_all_sections_of_a_tri_merge_report() {
    let data = parse_report(THREE_BUREAU_REPORT, false, &reg());

    assert!(data.bureaus.experian && data.bureaus.equifax && data.bureaus.transunion);

    assert_eq!(data.personal_info.name, "JANE R DOE");
    assert_eq!(data.personal_info.date_of_birth, "07/04/1985");
    assert_eq!(data.personal_info.ssn_masked, "XXX-XX-4321");

    assert_eq!(data.accounts.len(), 4);
    let cap1 = &data.accounts[0];
    assert_eq!(cap1.account_name, "CAPITAL ONE");
    assert_eq!(cap1.account_number, "****1234", "raw numbers must be masked");
    assert_eq!(cap1.balance, Some(2310.55));
    assert_eq!(cap1.payment_status, "30 days late");
    assert_eq!(cap1.bureau, Some(Bureau::Experian));

    // Duplicate inquiry collapsed, distinct one kept.
    assert_eq!(data.inquiries.len(), 2);
    assert!(data.inquiries.iter().all(|i| i.kind == InquiryKind::Hard));

    assert_eq!(data.public_records.len(), 1);
    assert_eq!(data.public_records[0].record_type, "Chapter 13 Bankruptcy");
    assert_eq!(data.public_records[0].status, "dismissed");
}

#[test]
fn raw_ssn_never_survives_in_stored_text() {
    let data = parse_report(THREE_BUREAU_REPORT, false, &reg());
    let raw = data.raw_text.as_deref().unwrap();
    assert!(!raw.contains("987-65-4321"));
    assert!(!raw.contains("4400123456781234"));
}

#[test]
fn missing_sections_produce_empty_collections() {
    let data = parse_report("PERSONAL INFORMATION\nName: SOLO PERSON\n", false, &reg());
    assert_eq!(data.personal_info.name, "SOLO PERSON");
    assert!(data.accounts.is_empty());
    assert!(data.inquiries.is_empty());
    assert!(data.public_records.is_empty());
}

#[test]
fn malformed_layout_degrades_silently() {
    let data = parse_report(
        "ACCOUNTS\n@@@@\n----\nBalance: $5.00 with no creditor\n",
        true,
        &reg(),
    );
    assert!(data.accounts.is_empty(), "no plausible creditor, no account");
    assert!(data.source_was_pdf);
}
