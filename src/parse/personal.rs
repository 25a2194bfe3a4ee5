// src/parse/personal.rs
//! Personal information block. Labeled lines first, pattern fallbacks
//! second; a field nobody can find stays an empty string.

use crate::parse::fields;
use crate::redact;
use crate::report::PersonalInfo;
use once_cell::sync::Lazy;
use regex::Regex;

static RE_SSN_ANYWHERE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:\d{3}|[Xx*]{3})-?(?:\d{2}|[Xx*]{2})-?\d{4}\b").expect("ssn regex"));

// An all-caps name line: 2-4 words, letters only, no labels.
static RE_NAME_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Z.]*(?:\s+[A-Z][A-Z.]*){1,3}$").expect("name regex"));

pub fn parse(section: &str) -> PersonalInfo {
    let mut info = PersonalInfo::default();

    for line in section.lines() {
        if let Some((label, value)) = fields::labeled(line) {
            match label.as_str() {
                "name" | "consumer name" => set_if_empty(&mut info.name, value),
                "address" | "current address" | "addresses" => {
                    set_if_empty(&mut info.address, value)
                }
                "dob" | "date of birth" | "birth date" => {
                    set_if_empty(&mut info.date_of_birth, value)
                }
                "ssn" | "social security" | "social security number" => {
                    set_if_empty(&mut info.ssn_masked, &redact::mask_ssn(value))
                }
                _ => {}
            }
        }
    }

    // Fallbacks for reports that print values without labels.
    if info.ssn_masked.is_empty() {
        if let Some(m) = RE_SSN_ANYWHERE.find(section) {
            info.ssn_masked = redact::mask_ssn(m.as_str());
        }
    }
    if info.name.is_empty() {
        if let Some(line) = section.lines().map(str::trim).find(|l| RE_NAME_LINE.is_match(l)) {
            info.name = line.to_string();
        }
    }
    if info.date_of_birth.is_empty() {
        for line in section.lines() {
            let lower = line.to_ascii_lowercase();
            if lower.contains("birth") || lower.contains("dob") {
                let d = fields::first_date(line);
                if !d.is_empty() {
                    info.date_of_birth = d;
                    break;
                }
            }
        }
    }

    info
}

fn set_if_empty(slot: &mut String, value: &str) {
    if slot.is_empty() && !value.is_empty() {
        *slot = value.to_string();
    }
}
