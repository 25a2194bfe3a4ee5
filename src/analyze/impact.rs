//! Impact scoring: three normalized signals blended under calibrated
//! weights, thresholded into `Medium`/`High`/`Critical`.
//!
//! Signals, each in [0,1]:
//! - `status_severity`  : how damaging the payment status / issue kind is
//! - `balance_magnitude`: balance relative to the high-balance threshold
//! - `recency`          : freshness of the last activity date

use super::Weights;
use crate::report::{CreditReportAccount, ImpactLevel, IssueKind};
use chrono::NaiveDate;

const CRITICAL_MIN: f32 = 0.75;
const HIGH_MIN: f32 = 0.45;

/// Normalized inputs in [0,1]. Keep it small and clear.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImpactInputs {
    pub status_severity: f32,
    pub balance_magnitude: f32,
    pub recency: f32,
}

impl ImpactInputs {
    pub fn new(status: f32, balance: f32, recency: f32) -> Self {
        Self {
            status_severity: status.clamp(0.0, 1.0),
            balance_magnitude: balance.clamp(0.0, 1.0),
            recency: recency.clamp(0.0, 1.0),
        }
    }
}

/// Weighted blend, normalized by the weight sum, clamped to [0,1].
pub fn impact_score(inputs: &ImpactInputs, w: &Weights) -> f32 {
    let raw = inputs.status_severity * w.w_status
        + inputs.balance_magnitude * w.w_balance
        + inputs.recency * w.w_recency;
    let denom = (w.w_status + w.w_balance + w.w_recency).max(1e-6);
    (raw / denom).clamp(0.0, 1.0)
}

pub fn level_for_score(score: f32) -> ImpactLevel {
    if score >= CRITICAL_MIN {
        ImpactLevel::Critical
    } else if score >= HIGH_MIN {
        ImpactLevel::High
    } else {
        ImpactLevel::Medium
    }
}

/// Impact for an account-backed issue.
pub fn impact_for_account(
    kind: IssueKind,
    account: &CreditReportAccount,
    high_balance_threshold: f64,
    w: &Weights,
) -> ImpactLevel {
    let inputs = ImpactInputs::new(
        kind_severity(kind, &account.payment_status),
        balance_magnitude(account.balance, high_balance_threshold),
        recency(&account.last_activity),
    );
    level_for_score(impact_score(&inputs, w))
}

/// Base severity per issue kind; late payments scale with the printed
/// days-late bucket.
pub fn kind_severity(kind: IssueKind, payment_status: &str) -> f32 {
    match kind {
        IssueKind::PublicRecord => 0.95,
        IssueKind::CollectionAccount => 0.9,
        IssueKind::Repossession => 0.9,
        IssueKind::ChargeOff => 0.85,
        IssueKind::DuplicateStudentLoan => 0.7,
        IssueKind::LatePayment => {
            let s = payment_status.to_ascii_lowercase();
            if s.contains("120") || s.contains("150") || s.contains("180") {
                0.85
            } else if s.contains("90") {
                0.75
            } else if s.contains("60") {
                0.65
            } else {
                0.55
            }
        }
        IssueKind::UnauthorizedInquiry => 0.5,
        IssueKind::ExcessiveInquiries => 0.45,
        IssueKind::HighBalance => 0.4,
        IssueKind::PersonalInfoMismatch => 0.35,
        IssueKind::GenericDispute => 0.3,
    }
}

/// Balance relative to the configured threshold, capped at 1.0.
fn balance_magnitude(balance: Option<f64>, threshold: f64) -> f32 {
    match balance {
        Some(b) if threshold > 0.0 => ((b / threshold) as f32).clamp(0.0, 1.0),
        _ => 0.0,
    }
}

/// Linear decay over two years from the last-activity date. Reports print
/// dates in a handful of shapes; anything unparsable is treated as neutral.
fn recency(last_activity: &str) -> f32 {
    let Some(date) = parse_printed_date(last_activity) else {
        return 0.5;
    };
    let today = chrono::Utc::now().date_naive();
    let age_days = (today - date).num_days().max(0) as f32;
    (1.0 - age_days / 730.0).clamp(0.0, 1.0)
}

fn parse_printed_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    for fmt in ["%m/%d/%Y", "%m/%d/%y", "%Y-%m-%d", "%b %d, %Y", "%b %d %Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}
