// tests/detect_duplicates.rs
// The pairwise student-loan duplicate scan, including a synthetic sweep to
// confirm the 1% tolerance boundary on both sides.

use credit_report_analyzer::analyze::duplicates::find_student_loan_duplicates;
use credit_report_analyzer::creditors::CreditorRegistry;
use credit_report_analyzer::report::{CreditReportAccount, IssueKind};
use rand::Rng;

fn reg() -> CreditorRegistry {
    CreditorRegistry::default_seed()
}

fn loan(name: &str, balance: f64) -> CreditReportAccount {
    CreditReportAccount::named(name).with_balance(balance)
}

#[test]
fn within_tolerance_pair_is_flagged() {
    let accounts = vec![
        loan("NAVIENT SOLUTIONS", 20_000.0),
        loan("NAVIENT SOLUTIONS LLC", 20_150.0), // 0.74% apart
    ];
    let issues = find_student_loan_duplicates(&accounts, &reg(), 0.01);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, IssueKind::DuplicateStudentLoan);
}

#[test]
fn beyond_tolerance_pair_is_not_flagged() {
    let accounts = vec![
        loan("NAVIENT SOLUTIONS", 20_000.0),
        loan("NAVIENT SOLUTIONS LLC", 20_500.0), // 2.4% apart
    ];
    assert!(find_student_loan_duplicates(&accounts, &reg(), 0.01).is_empty());
}

#[test]
fn accounts_without_balances_never_pair() {
    let accounts = vec![
        loan("NELNET LOAN A", 10_000.0),
        CreditReportAccount::named("NELNET LOAN B"),
    ];
    assert!(find_student_loan_duplicates(&accounts, &reg(), 0.01).is_empty());
}

#[test]
fn synthetic_sweep_respects_the_boundary() {
    let mut rng = rand::rng();

    for _ in 0..50 {
        let base: f64 = rng.random_range(1_000.0..50_000.0);
        // Clearly inside (0.5%) and clearly outside (5%) of tolerance; the
        // exact boundary is not asserted to avoid float-edge flakiness.
        let inside = base * 1.005;
        let outside = base * 1.05;

        let flagged = find_student_loan_duplicates(
            &[loan("MOHELA SERVICING A", base), loan("MOHELA SERVICING B", inside)],
            &reg(),
            0.01,
        );
        assert_eq!(flagged.len(), 1, "base={base} inside={inside}");

        let clean = find_student_loan_duplicates(
            &[loan("MOHELA SERVICING A", base), loan("MOHELA SERVICING B", outside)],
            &reg(),
            0.01,
        );
        assert!(clean.is_empty(), "base={base} outside={outside}");
    }
}

#[test]
fn scan_is_quadratic_but_bounded_by_suspects_only() {
    // Non-student accounts are filtered before the pairwise pass, so a big
    // card portfolio with identical balances produces nothing.
    let accounts: Vec<_> = (0..100)
        .map(|i| loan(&format!("RETAIL CARD {i}"), 500.0))
        .collect();
    assert!(find_student_loan_duplicates(&accounts, &reg(), 0.01).is_empty());
}
