//! Custom detection rules engine (hot-reloaded from `config/rules.json`).
//!
//! Minimal JSON DSL for conditions over one account's combined text
//! (name + number + status, case-insensitive):
//! - `any_contains`: match if ANY of phrases appears
//! - `all_contains`: match if ALL of phrases appear
//! - `not_contains`: match if NONE of phrases appear
//! - `min_balance`:  match if the account balance >= min_balance
//!
//! Action when a rule matches (emits one extra issue for the account):
//! - `kind`:        issue type tag (unknown tags become `generic_dispute`)
//! - `title`:       issue title ("{account}" expands to the account name)
//! - `description`: issue body (same expansion)
//! - `impact`:      "medium" | "high" | "critical" (default medium)
//! - `citation`:    optional extra citation appended after the statute table
//!
//! The file is hot-reloaded on mtime change at each `current()` call.

use crate::report::{CreditReportAccount, IdentifiedIssue, ImpactLevel, IssueKind};
use serde::Deserialize;
use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::RwLock,
    time::SystemTime,
};

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RuleSet {
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Rule {
    pub name: Option<String>,
    #[serde(default)]
    pub when: When,
    #[serde(default)]
    pub then: Then,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct When {
    pub any_contains: Option<Vec<String>>,
    pub all_contains: Option<Vec<String>>,
    pub not_contains: Option<Vec<String>>,
    pub min_balance: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Then {
    pub kind: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub impact: Option<String>,
    pub citation: Option<String>,
}

#[derive(Debug)]
pub struct HotReloadRules {
    path: PathBuf,
    inner: RwLock<State>,
}

#[derive(Debug)]
struct State {
    rules: RuleSet,
    last_modified: Option<SystemTime>,
}

impl HotReloadRules {
    pub fn new(path: Option<&Path>) -> Self {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("config/rules.json"));
        Self {
            path,
            inner: RwLock::new(State {
                rules: RuleSet::default(),
                last_modified: None,
            }),
        }
    }

    pub fn current(&self) -> RuleSet {
        let needs_reload = match fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(mtime) => self.inner.read().unwrap().last_modified != Some(mtime),
            Err(_) => false,
        };

        if !needs_reload {
            return self.inner.read().unwrap().rules.clone();
        }

        let mut guard = self.inner.write().unwrap();
        if let Ok(mtime) = fs::metadata(&self.path).and_then(|m| m.modified()) {
            if guard.last_modified != Some(mtime) {
                if let Ok(rules) = load_rules_file(&self.path) {
                    guard.rules = rules;
                    guard.last_modified = Some(mtime);
                }
            }
        }
        guard.rules.clone()
    }
}

pub fn load_rules_file(path: &Path) -> io::Result<RuleSet> {
    let bytes = fs::read(path)?;
    let rules: RuleSet = serde_json::from_slice(&bytes)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(rules)
}

/// Apply the rule set to one account; each matching rule emits one issue.
pub fn apply_rules_to_account(
    account: &CreditReportAccount,
    rules: &RuleSet,
) -> Vec<IdentifiedIssue> {
    let text = normalize(&format!(
        "{} {} {}",
        account.account_name, account.account_number, account.payment_status
    ));

    let mut issues = Vec::new();
    for rule in &rules.rules {
        if !matches_when(&text, account, &rule.when) {
            continue;
        }

        let kind = rule
            .then
            .kind
            .as_deref()
            .and_then(IssueKind::from_tag)
            .unwrap_or(IssueKind::GenericDispute);
        let title = expand(
            rule.then.title.as_deref().unwrap_or("Custom rule match"),
            account,
        );
        let description = expand(
            rule.then
                .description
                .as_deref()
                .unwrap_or("A custom detection rule matched this account."),
            account,
        );

        let mut issue = IdentifiedIssue::new(kind, title, description)
            .with_impact(parse_impact(rule.then.impact.as_deref()))
            .with_citations(super::statutes::citations_for(kind))
            .for_account(account.account_name.clone());
        if let Some(extra) = &rule.then.citation {
            issue = issue.with_citation(extra.clone());
        }
        issues.push(issue);
    }
    issues
}

// --- internals ---

fn matches_when(text: &str, account: &CreditReportAccount, w: &When) -> bool {
    if let Some(min) = w.min_balance {
        match account.balance {
            Some(b) if b >= min => {}
            _ => return false,
        }
    }
    if let Some(v) = &w.any_contains {
        if !v.iter().any(|p| contains(text, p)) {
            return false;
        }
    }
    if let Some(v) = &w.all_contains {
        if !v.iter().all(|p| contains(text, p)) {
            return false;
        }
    }
    if let Some(v) = &w.not_contains {
        if v.iter().any(|p| contains(text, p)) {
            return false;
        }
    }
    true
}

fn contains(text: &str, pat: &str) -> bool {
    let p = normalize(pat);
    if p.is_empty() {
        return true;
    }
    text.contains(p.as_str())
}

fn expand(template: &str, account: &CreditReportAccount) -> String {
    template.replace("{account}", &account.account_name)
}

fn parse_impact(s: Option<&str>) -> ImpactLevel {
    match s.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("critical") => ImpactLevel::Critical,
        Some("high") => ImpactLevel::High,
        _ => ImpactLevel::Medium,
    }
}

fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last_space = false;
    for ch in input.chars() {
        let lc = ch.to_ascii_lowercase();
        if lc.is_whitespace() {
            if !last_space {
                out.push(' ');
                last_space = true;
            }
        } else {
            out.push(lc);
            last_space = false;
        }
    }
    out.trim().to_string()
}
