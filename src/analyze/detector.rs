//! # Issue Detector
//! Pure, testable heuristics that map parsed report data → identified
//! issues. No I/O, suitable for unit tests and offline evaluation.
//!
//! Per account the checks run as an ordered chain and the first match wins,
//! so a collection tradeline is never double-reported as a late payment.

use super::{impact, statutes, Weights};
use crate::config::AnalyzerConfig;
use crate::creditors::CreditorRegistry;
use crate::report::{
    CreditReportAccount, CreditReportData, IdentifiedIssue, ImpactLevel, InquiryKind, IssueKind,
};

const LATE_MARKERS: [&str; 5] = ["late", "past due", "delinquent", "days", "missed payment"];

/// Ordered keyword chain over one account. Returns at most one issue.
pub fn classify_account(
    account: &CreditReportAccount,
    registry: &CreditorRegistry,
    cfg: &AnalyzerConfig,
    w: &Weights,
) -> Option<IdentifiedIssue> {
    let status = account.payment_status.to_ascii_lowercase();
    let name = &account.account_name;

    let kind = if status.contains("collect") || registry.is_collection_agency(name) {
        IssueKind::CollectionAccount
    } else if status.contains("charge") && status.contains("off") {
        IssueKind::ChargeOff
    } else if status.contains("repossess") {
        IssueKind::Repossession
    } else if LATE_MARKERS.iter().any(|m| status.contains(m)) && !status.contains("never late") {
        IssueKind::LatePayment
    } else if account
        .balance
        .is_some_and(|b| b > cfg.high_balance_threshold)
    {
        IssueKind::HighBalance
    } else {
        return None;
    };

    let (title, description) = describe(kind, account);
    Some(
        IdentifiedIssue::new(kind, title, description)
            .with_impact(impact::impact_for_account(
                kind,
                account,
                cfg.high_balance_threshold,
                w,
            ))
            .with_citations(statutes::citations_for(kind))
            .for_account(name.clone()),
    )
}

fn describe(kind: IssueKind, account: &CreditReportAccount) -> (String, String) {
    let name = &account.account_name;
    let status = &account.payment_status;
    match kind {
        IssueKind::CollectionAccount => (
            format!("Collection account: {name}"),
            format!(
                "{name} is reporting a collection account{}. Collection tradelines are \
                 frequently unvalidated and can be disputed with a demand for debt validation.",
                balance_clause(account)
            ),
        ),
        IssueKind::ChargeOff => (
            format!("Charge-off reported by {name}"),
            format!(
                "{name} reports this account as charged off{}. The balance, dates, and \
                 status must be accurate and verifiable to remain on the report.",
                balance_clause(account)
            ),
        ),
        IssueKind::Repossession => (
            format!("Repossession reported by {name}"),
            format!(
                "{name} reports a repossession. Deficiency balances and repossession \
                 status lines are commonly misreported and can be challenged."
            ),
        ),
        IssueKind::LatePayment => (
            format!("Late payment reported by {name}"),
            format!(
                "{name} reports the status \"{status}\". If any reported late date is \
                 inaccurate the entry must be corrected or deleted."
            ),
        ),
        IssueKind::HighBalance => (
            format!("High reported balance: {name}"),
            format!(
                "{name} reports a balance{} that may be inflated or stale; balance \
                 reporting errors are a common source of score damage.",
                balance_clause(account)
            ),
        ),
        _ => (
            format!("Disputable item: {name}"),
            format!("{name} reports an entry that warrants verification."),
        ),
    }
}

fn balance_clause(account: &CreditReportAccount) -> String {
    match account.balance {
        Some(b) => format!(" with a balance of ${b:.2}"),
        None => String::new(),
    }
}

/// Inquiry heuristics: each hard inquiry is a dispute candidate, and a pile
/// of them inside one report earns its own issue.
pub fn detect_inquiry_issues(data: &CreditReportData, cfg: &AnalyzerConfig) -> Vec<IdentifiedIssue> {
    let mut issues = Vec::new();

    let hard: Vec<_> = data
        .inquiries
        .iter()
        .filter(|i| i.kind == InquiryKind::Hard)
        .collect();

    for inq in &hard {
        issues.push(
            IdentifiedIssue::new(
                IssueKind::UnauthorizedInquiry,
                format!("Hard inquiry: {}", inq.inquirer),
                format!(
                    "A hard inquiry from {}{} appears on the report. If no application \
                     was made, it lacks a permissible purpose and must be removed.",
                    inq.inquirer,
                    if inq.date.is_empty() {
                        String::new()
                    } else {
                        format!(" dated {}", inq.date)
                    }
                ),
            )
            .with_impact(ImpactLevel::Medium)
            .with_citations(statutes::citations_for(IssueKind::UnauthorizedInquiry))
            .for_account(inq.inquirer.clone()),
        );
    }

    if hard.len() > cfg.max_hard_inquiries {
        issues.push(
            IdentifiedIssue::new(
                IssueKind::ExcessiveInquiries,
                "Excessive hard inquiries",
                format!(
                    "{} hard inquiries appear on this report (threshold {}). Inquiry \
                     volume alone depresses scores and unauthorized ones can be removed.",
                    hard.len(),
                    cfg.max_hard_inquiries
                ),
            )
            .with_impact(ImpactLevel::High)
            .with_citations(statutes::citations_for(IssueKind::ExcessiveInquiries)),
        );
    }

    issues
}

/// Public records always warrant a dispute candidate.
pub fn detect_public_record_issues(data: &CreditReportData, w: &Weights) -> Vec<IdentifiedIssue> {
    data.public_records
        .iter()
        .map(|rec| {
            let score = impact::impact_score(
                &impact::ImpactInputs::new(
                    impact::kind_severity(IssueKind::PublicRecord, &rec.status),
                    0.0,
                    0.5,
                ),
                w,
            );
            IdentifiedIssue::new(
                IssueKind::PublicRecord,
                format!("Public record: {}", rec.record_type),
                format!(
                    "A {} appears on the report{}. Public records are subject to strict \
                     accuracy and obsolescence limits.",
                    rec.record_type,
                    if rec.filed.is_empty() {
                        String::new()
                    } else {
                        format!(", filed {}", rec.filed)
                    }
                ),
            )
            .with_impact(impact::level_for_score(score))
            .with_citations(statutes::citations_for(IssueKind::PublicRecord))
        })
        .collect()
}

/// Missing/mismatched identity fields on an otherwise-populated report.
pub fn detect_personal_info_issues(data: &CreditReportData) -> Vec<IdentifiedIssue> {
    if data.accounts.is_empty() && data.inquiries.is_empty() {
        // Nothing parsed; the padding pass covers the generic advice.
        return Vec::new();
    }

    let mut missing = Vec::new();
    if data.personal_info.name.is_empty() {
        missing.push("name");
    }
    if data.personal_info.address.is_empty() {
        missing.push("address");
    }
    if data.personal_info.ssn_masked.is_empty() {
        missing.push("SSN");
    }
    if missing.is_empty() {
        return Vec::new();
    }

    vec![
        IdentifiedIssue::new(
            IssueKind::PersonalInfoMismatch,
            "Incomplete personal information",
            format!(
                "The report's identity section is missing or failed to match: {}. \
                 Mixed or incomplete files cause other consumers' items to appear.",
                missing.join(", ")
            ),
        )
        .with_impact(ImpactLevel::Medium)
        .with_citations(statutes::citations_for(IssueKind::PersonalInfoMismatch)),
    ]
}
