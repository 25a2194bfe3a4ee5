//! Student-loan duplicate scan.
//!
//! Servicer transfers leave the same loan reported twice under different
//! names. The tell is a near-identical balance, so this runs a pairwise
//! O(n²) comparison across all suspected student-loan accounts. Reports
//! carry a few dozen tradelines at most, so the quadratic scan is fine.

use crate::creditors::CreditorRegistry;
use crate::report::{CreditReportAccount, IdentifiedIssue, ImpactLevel, IssueKind};

const STUDENT_MARKERS: [&str; 4] = ["student", "stu loan", "education", "univ"];

/// Minimum name similarity for a pair to count when balances alone are
/// ambiguous (two distinct loans can legitimately share a balance).
const NAME_SIMILARITY_MIN: f64 = 0.7;

pub fn find_student_loan_duplicates(
    accounts: &[CreditReportAccount],
    registry: &CreditorRegistry,
    balance_tolerance: f64,
) -> Vec<IdentifiedIssue> {
    let suspects: Vec<&CreditReportAccount> = accounts
        .iter()
        .filter(|a| is_student_loan(a, registry))
        .collect();

    let mut issues = Vec::new();
    for i in 0..suspects.len() {
        for j in (i + 1)..suspects.len() {
            let (a, b) = (suspects[i], suspects[j]);
            let (Some(ba), Some(bb)) = (a.balance, b.balance) else {
                continue;
            };
            if !balances_match(ba, bb, balance_tolerance) {
                continue;
            }
            let similarity = strsim::jaro_winkler(
                &a.account_name.to_ascii_lowercase(),
                &b.account_name.to_ascii_lowercase(),
            );
            if similarity < NAME_SIMILARITY_MIN {
                continue;
            }

            issues.push(
                IdentifiedIssue::new(
                    IssueKind::DuplicateStudentLoan,
                    format!("Possible duplicate student loan: {}", a.account_name),
                    format!(
                        "{} (balance ${:.2}) and {} (balance ${:.2}) report balances within {}% \
                         of each other and may be the same loan listed twice.",
                        a.account_name,
                        ba,
                        b.account_name,
                        bb,
                        balance_tolerance * 100.0
                    ),
                )
                .with_impact(ImpactLevel::High)
                .with_citations(super::statutes::citations_for(IssueKind::DuplicateStudentLoan))
                .for_account(a.account_name.clone()),
            );
        }
    }
    issues
}

fn is_student_loan(account: &CreditReportAccount, registry: &CreditorRegistry) -> bool {
    if registry.is_student_loan_servicer(&account.account_name) {
        return true;
    }
    let name = account.account_name.to_ascii_lowercase();
    STUDENT_MARKERS.iter().any(|m| name.contains(m))
}

/// Relative difference within tolerance (of the larger balance).
fn balances_match(a: f64, b: f64, tolerance: f64) -> bool {
    let max = a.abs().max(b.abs());
    if max == 0.0 {
        // Both zero: transferred/paid-out pairs, still worth flagging.
        return true;
    }
    ((a - b).abs() / max) <= tolerance
}
