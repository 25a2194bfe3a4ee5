// src/letters/mod.rs
//! Dispute letter generation: template selection, assembly, and the
//! three-tier fallback chain.
//!
//! The chain never fails: the primary templated generator is preferred, a
//! plain manual generator covers template errors, and the emergency
//! generator is a constant that always produces usable content. A tier's
//! output is rejected when it errors or comes back suspiciously short.

pub mod assemble;
pub mod templates;

use crate::config::AnalyzerConfig;
use crate::error::Result;
use crate::report::{
    Bureau, CreditReportData, DisputeLetter, GeneratorTier, IdentifiedIssue,
};
use assemble::LetterContext;
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("letters_generated_total", "Letters produced, any tier.");
        describe_counter!(
            "letters_fallback_total",
            "Letters that fell past the primary generator."
        );
    });
}

/// Consumer-supplied inputs for a letter run.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct LetterRequest {
    pub consumer_name: String,
    pub consumer_address: String,
    pub explanation: String,
}

/// Generate one letter for an issue, addressed to one bureau.
pub fn generate_letter(
    issue: &IdentifiedIssue,
    bureau: Bureau,
    data: &CreditReportData,
    req: &LetterRequest,
    cfg: &AnalyzerConfig,
) -> DisputeLetter {
    ensure_metrics_described();

    let ctx = context_for(issue, data, req);
    let (body, tier) = generate_with_chain(
        || primary_letter(issue, bureau, &ctx),
        || manual_letter(issue, bureau, &ctx),
        bureau,
        cfg.min_letter_len,
    );

    counter!("letters_generated_total").increment(1);
    if tier != GeneratorTier::Primary {
        counter!("letters_fallback_total").increment(1);
    }

    DisputeLetter::new(bureau, body, tier)
        .for_account(ctx.account_name.clone(), ctx.account_number.clone())
        .with_explanation(req.explanation.clone())
}

/// One letter per (issue, bureau) pair. With no explicit bureau list, the
/// bureaus detected in the report are used; a report with none detected
/// still gets letters to all three (the original always offered all three).
pub fn generate_letters_for_issues(
    issues: &[IdentifiedIssue],
    bureaus: &[Bureau],
    data: &CreditReportData,
    req: &LetterRequest,
    cfg: &AnalyzerConfig,
) -> Vec<DisputeLetter> {
    let targets: Vec<Bureau> = if !bureaus.is_empty() {
        bureaus.to_vec()
    } else {
        let detected = data.bureaus.detected();
        if detected.is_empty() {
            Bureau::all().to_vec()
        } else {
            detected
        }
    };

    issues
        .iter()
        .flat_map(|issue| {
            targets
                .iter()
                .map(|b| generate_letter(issue, *b, data, req, cfg))
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Run the fallback chain over generator closures. Split out from
/// `generate_letter` so tests can inject failing tiers.
pub(crate) fn generate_with_chain<P, M>(
    primary: P,
    manual: M,
    bureau: Bureau,
    min_len: usize,
) -> (String, GeneratorTier)
where
    P: FnOnce() -> Result<String>,
    M: FnOnce() -> Result<String>,
{
    match primary() {
        Ok(body) if body.len() >= min_len => return (body, GeneratorTier::Primary),
        Ok(short) => {
            tracing::warn!(len = short.len(), min_len, "primary letter too short; falling back");
        }
        Err(e) => {
            tracing::warn!(error = %e, "primary letter generator failed; falling back");
        }
    }

    match manual() {
        Ok(body) if body.len() >= min_len => return (body, GeneratorTier::Manual),
        Ok(short) => {
            tracing::warn!(len = short.len(), min_len, "manual letter too short; falling back");
        }
        Err(e) => {
            tracing::warn!(error = %e, "manual letter generator failed; falling back");
        }
    }

    (emergency_letter(bureau), GeneratorTier::Emergency)
}

fn context_for(
    issue: &IdentifiedIssue,
    data: &CreditReportData,
    req: &LetterRequest,
) -> LetterContext {
    // Resolve the triggering account for its printed identifiers.
    let account = issue.account_ref.as_deref().and_then(|name| {
        data.accounts
            .iter()
            .find(|a| a.account_name.eq_ignore_ascii_case(name))
    });

    LetterContext {
        consumer_name: if req.consumer_name.trim().is_empty() {
            data.personal_info.name.clone()
        } else {
            req.consumer_name.clone()
        },
        consumer_address: if req.consumer_address.trim().is_empty() {
            data.personal_info.address.clone()
        } else {
            req.consumer_address.clone()
        },
        account_name: issue
            .account_ref
            .clone()
            .unwrap_or_default(),
        account_number: account.map(|a| a.account_number.clone()).unwrap_or_default(),
        explanation: if req.explanation.trim().is_empty() {
            issue.description.clone()
        } else {
            req.explanation.clone()
        },
        citations: issue.citations.clone(),
    }
}

/// Primary tier: dictionary template + full placeholder assembly.
fn primary_letter(issue: &IdentifiedIssue, bureau: Bureau, ctx: &LetterContext) -> Result<String> {
    let (_key, template) = templates::select(issue.kind.as_tag());
    assemble::render(template, bureau, ctx)
}

/// Manual tier: a plain formatted letter with no template machinery.
fn manual_letter(issue: &IdentifiedIssue, bureau: Bureau, ctx: &LetterContext) -> Result<String> {
    let date = chrono::Utc::now().format("%B %-d, %Y");
    let account_line = if ctx.account_name.is_empty() {
        String::new()
    } else {
        format!(
            "\nRe: {}{}\n",
            ctx.account_name,
            if ctx.account_number.is_empty() {
                String::new()
            } else {
                format!(", account {}", ctx.account_number)
            }
        )
    };
    let citations = if ctx.citations.is_empty() {
        String::new()
    } else {
        format!(
            "\nApplicable law:\n{}\n",
            ctx.citations
                .iter()
                .map(|c| format!("- {c}"))
                .collect::<Vec<_>>()
                .join("\n")
        )
    };

    Ok(format!(
        "{date}\n\n{addr}\n{account_line}\nTo Whom It May Concern:\n\n\
         I dispute the following item on my {bureau} credit report: {title}.\n\n\
         {explanation}\n\n\
         Under the Fair Credit Reporting Act, Section 611 (15 U.S.C. 1681i), you are \
         required to conduct a reasonable reinvestigation of this dispute within 30 days \
         and to delete any information that cannot be verified. Please send me the \
         written results of your reinvestigation and a corrected copy of my credit \
         report.\n{citations}\nSincerely,\n\n{name}",
        date = date,
        addr = bureau.mailing_address(),
        account_line = account_line,
        bureau = bureau.name(),
        title = issue.title,
        explanation = ctx.explanation,
        citations = citations,
        name = if ctx.consumer_name.is_empty() {
            "[YOUR NAME]"
        } else {
            ctx.consumer_name.as_str()
        },
    ))
}

/// Emergency tier: hardcoded, infallible, always non-empty.
pub(crate) fn emergency_letter(bureau: Bureau) -> String {
    format!(
        "To Whom It May Concern at {}:\n\n\
         I am writing to dispute inaccurate information appearing on my credit report. \
         After reviewing my file, I believe one or more items are inaccurate, incomplete, \
         or unverifiable.\n\n\
         Under the Fair Credit Reporting Act, Section 611 (15 U.S.C. 1681i), I request \
         that you conduct a reasonable reinvestigation of the disputed information, \
         forward this dispute to the furnishers involved, and delete any item that \
         cannot be fully verified. Please provide me with the written results of your \
         reinvestigation and a free corrected copy of my credit report.\n\n\
         I have retained a copy of this letter for my records.\n\n\
         Sincerely,\n\n[YOUR NAME]",
        bureau.name()
    )
}
