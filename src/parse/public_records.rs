// src/parse/public_records.rs
//! Public records: bankruptcy, tax lien, and judgment rows.

use crate::parse::fields;
use crate::report::PublicRecord;

const RECORD_TYPES: [(&str, &str); 5] = [
    ("bankruptcy", "Bankruptcy"),
    ("chapter 7", "Chapter 7 Bankruptcy"),
    ("chapter 13", "Chapter 13 Bankruptcy"),
    ("tax lien", "Tax Lien"),
    ("judgment", "Civil Judgment"),
];

const STATUS_MARKERS: [&str; 5] = ["discharged", "dismissed", "satisfied", "released", "filed"];

pub fn parse(section: &str) -> Vec<PublicRecord> {
    let mut out = Vec::new();

    for line in section.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let lower = line.to_ascii_lowercase();

        // Most specific match wins (chapter 7/13 before plain bankruptcy).
        let record_type = RECORD_TYPES
            .iter()
            .filter(|(marker, _)| lower.contains(marker))
            .map(|(_, label)| *label)
            .max_by_key(|label| label.len());

        let Some(record_type) = record_type else {
            continue;
        };

        let status = STATUS_MARKERS
            .iter()
            .find(|m| lower.contains(*m))
            .map(|m| m.to_string())
            .unwrap_or_default();

        out.push(PublicRecord {
            record_type: record_type.to_string(),
            filed: fields::first_date(line),
            amount: fields::first_money_str(line),
            status,
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_chapter_over_plain_bankruptcy() {
        let recs = parse("Chapter 7 Bankruptcy filed 2023-11-02 discharged\n");
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].record_type, "Chapter 7 Bankruptcy");
        assert_eq!(recs[0].filed, "2023-11-02");
        assert_eq!(recs[0].status, "discharged");
    }

    #[test]
    fn liens_carry_amounts() {
        let recs = parse("State Tax Lien $4,250.00 filed 01/15/2022\n");
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].record_type, "Tax Lien");
        assert_eq!(recs[0].amount, "$4,250.00");
        assert_eq!(recs[0].status, "filed");
    }

    #[test]
    fn unrelated_lines_are_ignored() {
        assert!(parse("No public records on file\n").is_empty());
    }
}
