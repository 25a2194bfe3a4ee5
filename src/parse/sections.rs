// src/parse/sections.rs
//! Section splitter: a sequential scan for the headers bureaus actually
//! print, bucketing the lines underneath. No grammar, no recovery; text
//! under an unrecognized header stays with the previous section, and a
//! report with no headers at all ends up entirely in the preamble.

use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Preamble,
    Personal,
    Accounts,
    Inquiries,
    PublicRecords,
    Summary,
}

static RE_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)^\s*
        (?:
          (?P<personal>personal\s+information|consumer\s+information)
        | (?P<accounts>accounts?|account\s+history|tradelines?|credit\s+accounts)
        | (?P<inquiries>(?:credit\s+|hard\s+)?inquiries)
        | (?P<public>public\s+records?)
        | (?P<summary>credit\s+summary|summary)
        )
        \s*:?\s*$",
    )
    .expect("section header regex")
});

/// Split normalized report text into per-section bodies, preserving line
/// order. Repeated headers append to the same bucket.
#[derive(Debug, Default)]
pub struct SplitReport {
    pub preamble: String,
    pub personal: String,
    pub accounts: String,
    pub inquiries: String,
    pub public_records: String,
    pub summary: String,
}

impl SplitReport {
    fn bucket(&mut self, section: Section) -> &mut String {
        match section {
            Section::Preamble => &mut self.preamble,
            Section::Personal => &mut self.personal,
            Section::Accounts => &mut self.accounts,
            Section::Inquiries => &mut self.inquiries,
            Section::PublicRecords => &mut self.public_records,
            Section::Summary => &mut self.summary,
        }
    }
}

pub fn split(text: &str) -> SplitReport {
    let mut out = SplitReport::default();
    let mut current = Section::Preamble;

    for line in text.lines() {
        if let Some(section) = header_section(line) {
            current = section;
            continue;
        }
        let bucket = out.bucket(current);
        bucket.push_str(line);
        bucket.push('\n');
    }

    out
}

fn header_section(line: &str) -> Option<Section> {
    let caps = RE_HEADER.captures(line)?;
    if caps.name("personal").is_some() {
        Some(Section::Personal)
    } else if caps.name("accounts").is_some() {
        Some(Section::Accounts)
    } else if caps.name("inquiries").is_some() {
        Some(Section::Inquiries)
    } else if caps.name("public").is_some() {
        Some(Section::PublicRecords)
    } else if caps.name("summary").is_some() {
        Some(Section::Summary)
    } else {
        None
    }
}
