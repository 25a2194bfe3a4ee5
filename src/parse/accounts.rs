// src/parse/accounts.rs
//! Tradeline extraction. The section body is cut into blocks (a
//! creditor-looking line opens a block), then labeled lines and pattern
//! fallbacks fill the fields. Blocks whose name fails the
//! creditor-shape check are dropped; fields nobody can fill stay empty.

use crate::creditors::CreditorRegistry;
use crate::parse::fields;
use crate::report::{Bureau, CreditReportAccount};

const STATUS_KEYWORDS: [&str; 10] = [
    "in collections",
    "collection",
    "charge-off",
    "charged off",
    "charge off",
    "repossession",
    "past due",
    "late",
    "delinquent",
    "current",
];

pub fn parse(section: &str, registry: &CreditorRegistry) -> Vec<CreditReportAccount> {
    let mut blocks: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in section.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if starts_block(line, registry) && !current.is_empty() {
            blocks.push(std::mem::take(&mut current));
        }
        current.push(line);
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
        .into_iter()
        .filter_map(|block| account_from_block(&block, registry))
        .collect()
}

/// A block opens on an explicit "Account Name:" label or on a bare line
/// that plausibly names a creditor.
fn starts_block(line: &str, registry: &CreditorRegistry) -> bool {
    if let Some((label, _)) = fields::labeled(line) {
        return matches!(label.as_str(), "account name" | "creditor" | "creditor name");
    }
    registry.looks_like_creditor(line)
}

fn account_from_block(block: &[&str], registry: &CreditorRegistry) -> Option<CreditReportAccount> {
    let mut acc = CreditReportAccount::default();

    for line in block {
        if let Some((label, value)) = fields::labeled(line) {
            match label.as_str() {
                "account name" | "creditor" | "creditor name" => {
                    set_if_empty(&mut acc.account_name, value)
                }
                "account number" | "account #" | "acct" | "acct number" | "number" => {
                    set_if_empty(&mut acc.account_number, &fields::first_account_number(value))
                }
                "balance" | "current balance" | "balance owed" => {
                    if acc.balance.is_none() {
                        acc.balance = fields::first_money(value);
                    }
                }
                "payment status" | "status" | "pay status" => {
                    set_if_empty(&mut acc.payment_status, value)
                }
                "date opened" | "opened" | "open date" => {
                    set_if_empty(&mut acc.opened, &fields::first_date(value))
                }
                "last activity" | "last reported" | "date of last activity" => {
                    set_if_empty(&mut acc.last_activity, &fields::first_date(value))
                }
                "bureau" | "source" => {
                    if acc.bureau.is_none() {
                        acc.bureau = Bureau::parse(value);
                    }
                }
                _ => {}
            }
            continue;
        }

        // Unlabeled fallbacks.
        if acc.account_name.is_empty() && registry.looks_like_creditor(line) {
            acc.account_name = line.to_string();
            continue;
        }
        if acc.account_number.is_empty() {
            let n = fields::first_account_number(line);
            if !n.is_empty() {
                acc.account_number = n;
                continue;
            }
        }
        if acc.balance.is_none() && line.to_ascii_lowercase().contains("balance") {
            acc.balance = fields::first_money(line);
        }
        if acc.payment_status.is_empty() {
            let lower = line.to_ascii_lowercase();
            if let Some(kw) = STATUS_KEYWORDS.iter().find(|kw| lower.contains(*kw)) {
                // Keep the printed casing of the whole phrase when the line
                // is short enough to be a status line.
                acc.payment_status = if line.len() <= 40 {
                    line.to_string()
                } else {
                    (*kw).to_string()
                };
            }
        }
        if acc.bureau.is_none() {
            acc.bureau = find_bureau(line);
        }
    }

    // "Looks like a real creditor name" gate.
    if !registry.looks_like_creditor(&acc.account_name) {
        return None;
    }
    Some(acc)
}

fn find_bureau(line: &str) -> Option<Bureau> {
    let lower = line.to_ascii_lowercase();
    Bureau::all()
        .into_iter()
        .find(|b| lower.contains(&b.name().to_ascii_lowercase()))
        .or_else(|| lower.contains("trans union").then_some(Bureau::TransUnion))
}

fn set_if_empty(slot: &mut String, value: &str) {
    if slot.is_empty() && !value.is_empty() {
        *slot = value.to_string();
    }
}
