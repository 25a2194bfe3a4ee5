// src/letters/templates.rs
//! Bundled letter template dictionary.
//!
//! Templates are keyed by a short family name; selection normalizes the
//! issue type tag and falls through exact match → substring match → the
//! general template, so every tag always resolves to something.

use once_cell::sync::Lazy;
use std::collections::HashMap;

static TEMPLATES: Lazy<HashMap<String, String>> = Lazy::new(|| {
    let raw = include_str!("../../letter_templates.json");
    serde_json::from_str::<HashMap<String, String>>(raw).expect("valid letter template dictionary")
});

pub const GENERAL_KEY: &str = "general";

/// Select the template for an issue type tag. Returns the matched key and
/// the template text.
pub fn select(issue_tag: &str) -> (&'static str, &'static str) {
    let tag = normalize_tag(issue_tag);
    if tag.is_empty() {
        return general();
    }

    // Exact key.
    if let Some((k, v)) = TEMPLATES.get_key_value(tag.as_str()) {
        return (k.as_str(), v.as_str());
    }

    // Keys in sorted order so multi-matches resolve the same way every run.
    let mut keys: Vec<&'static String> = TEMPLATES.keys().collect();
    keys.sort();

    // Substring either way ("collection_account" → "collection",
    // "inquiry" ← "unauthorized_inquiry").
    for k in &keys {
        if k.as_str() != GENERAL_KEY && (tag.contains(k.as_str()) || k.contains(tag.as_str())) {
            return (k.as_str(), TEMPLATES[k.as_str()].as_str());
        }
    }

    // Token pass with a light plural stem, so "excessive_inquiries" still
    // reaches the "inquiry" template.
    for token in tag.split('_') {
        let stemmed = token.strip_suffix("ies").map(|s| format!("{s}y"));
        let token_forms = [token, stemmed.as_deref().unwrap_or(token)];
        for k in &keys {
            if k.as_str() != GENERAL_KEY
                && token_forms
                    .iter()
                    .any(|t| !t.is_empty() && (t.contains(k.as_str()) || k.contains(*t)))
            {
                return (k.as_str(), TEMPLATES[k.as_str()].as_str());
            }
        }
    }

    general()
}

fn general() -> (&'static str, &'static str) {
    let (k, v) = TEMPLATES
        .get_key_value(GENERAL_KEY)
        .expect("general template present");
    (k.as_str(), v.as_str())
}

fn normalize_tag(tag: &str) -> String {
    tag.trim()
        .to_ascii_lowercase()
        .replace([' ', '-'], "_")
}
