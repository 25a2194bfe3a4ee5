// src/analyze/statutes.rs
use crate::report::IssueKind;
use once_cell::sync::Lazy;
use std::collections::HashMap;

static CITATIONS: Lazy<HashMap<String, Vec<String>>> = Lazy::new(|| {
    let raw = include_str!("../../statute_citations.json");
    serde_json::from_str::<HashMap<String, Vec<String>>>(raw).expect("valid statute table")
});

/// Citation strings for an issue kind, from the bundled statute table.
/// Kinds without an entry fall back to the general reinvestigation section.
pub fn citations_for(kind: IssueKind) -> Vec<String> {
    match CITATIONS.get(kind.as_tag()) {
        Some(v) => v.clone(),
        None => vec![
            "FCRA Section 611 (15 U.S.C. 1681i) - Procedure in case of disputed accuracy".into(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_at_least_one_citation() {
        for kind in [
            IssueKind::CollectionAccount,
            IssueKind::LatePayment,
            IssueKind::ChargeOff,
            IssueKind::Repossession,
            IssueKind::HighBalance,
            IssueKind::DuplicateStudentLoan,
            IssueKind::UnauthorizedInquiry,
            IssueKind::ExcessiveInquiries,
            IssueKind::PublicRecord,
            IssueKind::PersonalInfoMismatch,
            IssueKind::GenericDispute,
        ] {
            assert!(!citations_for(kind).is_empty(), "no citations for {kind:?}");
        }
    }

    #[test]
    fn collections_cite_fdcpa_validation() {
        let cites = citations_for(IssueKind::CollectionAccount);
        assert!(cites.iter().any(|c| c.contains("FDCPA") && c.contains("1692g")));
    }
}
