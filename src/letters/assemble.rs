// src/letters/assemble.rs
//! Placeholder substitution and the fixed legal boilerplate block.

use crate::error::{AnalyzerError, Result};
use crate::report::Bureau;
use once_cell::sync::Lazy;
use regex::Regex;

/// Fixed closing block appended to every assembled letter.
pub const LEGAL_BOILERPLATE: &str = "\
Please note that under FCRA Section 611 (15 U.S.C. 1681i) you must complete \
your reinvestigation within 30 days of receipt of this dispute (45 days in \
limited circumstances), forward all relevant information I have provided to \
the furnisher, and provide me with written results including a free copy of \
my corrected file if any change is made. Failure to comply entitles me to \
pursue the remedies provided under FCRA Sections 616 and 617.\n\n\
I have retained a copy of this letter and a record of its delivery.\n\n\
Sincerely,\n\n{consumer_name}";

static RE_UNFILLED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[a-z_]+\}").expect("placeholder regex"));

/// Everything the templates can reference.
#[derive(Debug, Clone, Default)]
pub struct LetterContext {
    pub consumer_name: String,
    pub consumer_address: String,
    pub account_name: String,
    pub account_number: String,
    pub explanation: String,
    pub citations: Vec<String>,
}

impl LetterContext {
    /// Placeholder values, with display fallbacks so a sparse context still
    /// renders a complete letter.
    fn value(&self, key: &str, bureau: Bureau) -> Option<String> {
        let or = |s: &str, fallback: &str| {
            if s.trim().is_empty() {
                fallback.to_string()
            } else {
                s.to_string()
            }
        };
        match key {
            "date" => Some(chrono::Utc::now().format("%B %-d, %Y").to_string()),
            "consumer_name" => Some(or(&self.consumer_name, "[YOUR NAME]")),
            "consumer_address" => Some(or(&self.consumer_address, "[YOUR ADDRESS]")),
            "bureau_name" => Some(bureau.name().to_string()),
            "bureau_address" => Some(bureau.mailing_address().to_string()),
            "account_name" => Some(or(&self.account_name, "the referenced account")),
            "account_number" => Some(or(&self.account_number, "[unavailable]")),
            "explanation" => Some(or(
                &self.explanation,
                "The information is inaccurate as reported and I request its correction.",
            )),
            "citations" => Some(if self.citations.is_empty() {
                "- FCRA Section 611 (15 U.S.C. 1681i) - Procedure in case of disputed accuracy"
                    .to_string()
            } else {
                self.citations
                    .iter()
                    .map(|c| format!("- {c}"))
                    .collect::<Vec<_>>()
                    .join("\n")
            }),
            _ => None,
        }
    }
}

/// Substitute placeholders and append the boilerplate block. Any
/// placeholder the context cannot fill is a `Template` error for the
/// caller's fallback chain to absorb.
pub fn render(template: &str, bureau: Bureau, ctx: &LetterContext) -> Result<String> {
    let src = format!("{template}\n\n{LEGAL_BOILERPLATE}");

    // Single-pass substitution keeps replacement values inert: a value
    // containing braces is never re-expanded.
    let mut out = String::with_capacity(src.len() + 256);
    let mut last = 0usize;
    for m in RE_UNFILLED.find_iter(&src) {
        out.push_str(&src[last..m.start()]);
        let key = &src[m.start() + 1..m.end() - 1];
        match ctx.value(key, bureau) {
            Some(v) => out.push_str(&v),
            None => {
                return Err(AnalyzerError::Template(format!(
                    "unknown placeholder '{{{key}}}'"
                )))
            }
        }
        last = m.end();
    }
    out.push_str(&src[last..]);

    if RE_UNFILLED.is_match(&out) {
        // A substituted value smuggled in a placeholder; refuse rather than
        // ship a letter with holes.
        return Err(AnalyzerError::Template("unfilled placeholder after render".into()));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> LetterContext {
        LetterContext {
            consumer_name: "JOHN Q CONSUMER".into(),
            consumer_address: "123 MAIN ST, SPRINGFIELD, IL 62704".into(),
            account_name: "ABC COLLECTIONS AGENCY".into(),
            account_number: "****1234".into(),
            explanation: "I have no contract with this agency.".into(),
            citations: vec!["FDCPA Section 809 (15 U.S.C. 1692g) - Validation of debts".into()],
        }
    }

    #[test]
    fn renders_all_placeholders_and_appends_boilerplate() {
        let template = "{date}\n{consumer_name}\n{bureau_address}\nRe: {account_name} {account_number}\n{explanation}\n{citations}";
        let letter = render(template, Bureau::Equifax, &ctx()).unwrap();
        assert!(letter.contains("JOHN Q CONSUMER"));
        assert!(letter.contains("Equifax Information Services"));
        assert!(letter.contains("ABC COLLECTIONS AGENCY"));
        assert!(letter.contains("- FDCPA Section 809"));
        assert!(letter.contains("within 30 days"));
        assert!(!letter.contains("{consumer_name}"));
    }

    #[test]
    fn sparse_context_renders_with_fallback_text() {
        let letter = render("{consumer_name} {account_number} {explanation} {citations} {date} {bureau_name} {consumer_address} {account_name} {bureau_address}", Bureau::Experian, &LetterContext::default()).unwrap();
        assert!(letter.contains("[YOUR NAME]"));
        assert!(letter.contains("[unavailable]"));
        assert!(letter.contains("FCRA Section 611"));
    }

    #[test]
    fn unknown_placeholder_is_a_template_error() {
        let err = render("Dear {recipient_title}", Bureau::Experian, &ctx()).unwrap_err();
        assert!(matches!(err, AnalyzerError::Template(_)));
    }

    #[test]
    fn substituted_values_are_not_re_expanded() {
        let mut c = ctx();
        c.explanation = "my note says {date} literally".into();
        let err = render("{explanation}", Bureau::Experian, &c);
        // The smuggled brace survives one pass and is refused.
        assert!(err.is_err());
    }
}
