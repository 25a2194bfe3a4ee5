// tests/extract_normalize.rs
// Normalization contract: line structure preserved, noise removed.

use credit_report_analyzer::extract::normalize_text;

#[test]
fn collapses_whitespace_within_lines() {
    let out = normalize_text("Account   Name:   FIRST\t BANK\n");
    assert_eq!(out, "Account Name: FIRST BANK");
}

#[test]
fn preserves_line_breaks_for_the_parser() {
    let out = normalize_text("ACCOUNTS\nFIRST BANK\nBalance: $5.00\n");
    assert_eq!(out.lines().count(), 3);
}

#[test]
fn collapses_blank_line_runs_to_single_separators() {
    let out = normalize_text("A\n\n\n\n\nB\n");
    assert_eq!(out, "A\n\nB");
}

#[test]
fn decodes_entities_and_folds_smart_quotes() {
    let out = normalize_text("Smith &amp; Sons \u{201C}charge\u{2019}d\u{201D}");
    assert_eq!(out, "Smith & Sons \"charge'd\"");
}

#[test]
fn strips_control_characters() {
    let out = normalize_text("FIRST\u{0000} BANK\u{0007}\n");
    assert_eq!(out, "FIRST BANK");
}

#[test]
fn empty_and_whitespace_only_input_yields_empty() {
    assert_eq!(normalize_text(""), "");
    assert_eq!(normalize_text(" \n \t \n"), "");
}
