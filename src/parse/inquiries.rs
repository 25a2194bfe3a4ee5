// src/parse/inquiries.rs
//! Inquiry extraction: one inquiry per plausible line, hard/soft split by
//! keyword, exact (inquirer, date) duplicates collapsed.

use crate::creditors::CreditorRegistry;
use crate::parse::fields;
use crate::report::{Bureau, Inquiry, InquiryKind};
use std::collections::HashSet;

const SOFT_MARKERS: [&str; 4] = [
    "soft",
    "promotional",
    "account review",
    "prescreen",
];

pub fn parse(section: &str, registry: &CreditorRegistry) -> Vec<Inquiry> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut out = Vec::new();

    for line in section.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let date = fields::first_date(line);
        let inquirer = inquirer_name(line, &date);
        if inquirer.is_empty() || !registry.looks_like_creditor(&inquirer) {
            continue;
        }

        if !seen.insert((inquirer.to_ascii_lowercase(), date.clone())) {
            continue;
        }

        let lower = line.to_ascii_lowercase();
        let kind = if SOFT_MARKERS.iter().any(|m| lower.contains(m)) {
            InquiryKind::Soft
        } else {
            InquiryKind::Hard
        };

        out.push(Inquiry {
            inquirer,
            date,
            bureau: find_bureau(&lower),
            kind,
        });
    }

    out
}

/// The inquirer is the line minus its date and any bureau suffix.
fn inquirer_name(line: &str, date: &str) -> String {
    let mut name = line.to_string();
    if !date.is_empty() {
        name = name.replace(date, "");
    }
    for b in Bureau::all() {
        // Case-folded removal of a trailing bureau tag.
        let lower = name.to_ascii_lowercase();
        if let Some(pos) = lower.find(&b.name().to_ascii_lowercase()) {
            name.replace_range(pos..pos + b.name().len(), "");
        }
    }
    name.trim_matches(|c: char| c.is_whitespace() || c == '-' || c == ',' || c == '|')
        .to_string()
}

fn find_bureau(lower: &str) -> Option<Bureau> {
    Bureau::all()
        .into_iter()
        .find(|b| lower.contains(&b.name().to_ascii_lowercase()))
        .or_else(|| lower.contains("trans union").then_some(Bureau::TransUnion))
}
