//! report.rs — Core data model: parsed report structures, identified issues,
//! and dispute letters.
//!
//! Everything here is plain serde data with builder-style constructors so the
//! parser, detector, and letter assembler can stay pure functions over these
//! types. Extraction failures leave string fields empty rather than driving
//! control flow through `Option`s.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// One of the three major US consumer credit reporting agencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bureau {
    Experian,
    Equifax,
    TransUnion,
}

impl Bureau {
    pub fn all() -> [Bureau; 3] {
        [Bureau::Experian, Bureau::Equifax, Bureau::TransUnion]
    }

    /// Display name as printed on letters and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Bureau::Experian => "Experian",
            Bureau::Equifax => "Equifax",
            Bureau::TransUnion => "TransUnion",
        }
    }

    /// Canonical dispute mailing address used by the letter assembler.
    pub fn mailing_address(&self) -> &'static str {
        match self {
            Bureau::Experian => "Experian\nP.O. Box 4500\nAllen, TX 75013",
            Bureau::Equifax => "Equifax Information Services LLC\nP.O. Box 740256\nAtlanta, GA 30374",
            Bureau::TransUnion => "TransUnion Consumer Solutions\nP.O. Box 2000\nChester, PA 19016",
        }
    }

    /// Lenient parse from user input or report text ("trans union", "TRANSUNION", ...).
    pub fn parse(s: &str) -> Option<Bureau> {
        let n = s.trim().to_ascii_lowercase().replace([' ', '-', '_'], "");
        match n.as_str() {
            "experian" => Some(Bureau::Experian),
            "equifax" => Some(Bureau::Equifax),
            "transunion" => Some(Bureau::TransUnion),
            _ => None,
        }
    }
}

/// Which bureaus the uploaded report carries data for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BureausPresent {
    pub experian: bool,
    pub equifax: bool,
    pub transunion: bool,
}

impl BureausPresent {
    pub fn contains(&self, b: Bureau) -> bool {
        match b {
            Bureau::Experian => self.experian,
            Bureau::Equifax => self.equifax,
            Bureau::TransUnion => self.transunion,
        }
    }

    pub fn detected(&self) -> Vec<Bureau> {
        Bureau::all().into_iter().filter(|b| self.contains(*b)).collect()
    }

    pub fn any(&self) -> bool {
        self.experian || self.equifax || self.transunion
    }
}

/// Consumer identity block. Fields stay `""` when extraction fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub name: String,
    pub address: String,
    pub date_of_birth: String,
    /// Masked form only (e.g. "XXX-XX-1234"); raw SSNs are never stored.
    pub ssn_masked: String,
}

impl PersonalInfo {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.address.is_empty()
            && self.date_of_birth.is_empty()
            && self.ssn_masked.is_empty()
    }
}

/// A single tradeline as printed in the report. Populated by regex
/// extraction; dates are kept verbatim as printed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditReportAccount {
    pub account_name: String,
    /// Masked account number as printed (e.g. "****1234").
    pub account_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    pub opened: String,
    pub last_activity: String,
    pub payment_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bureau: Option<Bureau>,
}

impl CreditReportAccount {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            account_name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.payment_status = status.into();
        self
    }

    pub fn with_balance(mut self, balance: f64) -> Self {
        self.balance = Some(balance);
        self
    }
}

/// Hard inquiries can be disputed; soft ones are informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryKind {
    Hard,
    Soft,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inquiry {
    pub inquirer: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bureau: Option<Bureau>,
    pub kind: InquiryKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicRecord {
    pub record_type: String,
    pub filed: String,
    pub amount: String,
    pub status: String,
}

/// Everything extracted from one uploaded report. Created once per upload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditReportData {
    pub bureaus: BureausPresent,
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub accounts: Vec<CreditReportAccount>,
    #[serde(default)]
    pub inquiries: Vec<Inquiry>,
    #[serde(default)]
    pub public_records: Vec<PublicRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
    #[serde(default)]
    pub source_was_pdf: bool,
}

/// Closed set of issue type tags produced by the detector and the rules DSL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    CollectionAccount,
    LatePayment,
    ChargeOff,
    Repossession,
    HighBalance,
    DuplicateStudentLoan,
    UnauthorizedInquiry,
    ExcessiveInquiries,
    PublicRecord,
    PersonalInfoMismatch,
    GenericDispute,
}

impl IssueKind {
    /// snake_case tag, stable across serialization and template lookup.
    pub fn as_tag(&self) -> &'static str {
        match self {
            IssueKind::CollectionAccount => "collection_account",
            IssueKind::LatePayment => "late_payment",
            IssueKind::ChargeOff => "charge_off",
            IssueKind::Repossession => "repossession",
            IssueKind::HighBalance => "high_balance",
            IssueKind::DuplicateStudentLoan => "duplicate_student_loan",
            IssueKind::UnauthorizedInquiry => "unauthorized_inquiry",
            IssueKind::ExcessiveInquiries => "excessive_inquiries",
            IssueKind::PublicRecord => "public_record",
            IssueKind::PersonalInfoMismatch => "personal_info_mismatch",
            IssueKind::GenericDispute => "generic_dispute",
        }
    }

    /// Lenient tag parse used by the custom rules file.
    pub fn from_tag(tag: &str) -> Option<IssueKind> {
        let t = tag.trim().to_ascii_lowercase();
        [
            IssueKind::CollectionAccount,
            IssueKind::LatePayment,
            IssueKind::ChargeOff,
            IssueKind::Repossession,
            IssueKind::HighBalance,
            IssueKind::DuplicateStudentLoan,
            IssueKind::UnauthorizedInquiry,
            IssueKind::ExcessiveInquiries,
            IssueKind::PublicRecord,
            IssueKind::PersonalInfoMismatch,
            IssueKind::GenericDispute,
        ]
        .into_iter()
        .find(|k| k.as_tag() == t)
    }
}

/// How damaging an issue is, as surfaced to the consumer. Ordered so the
/// issue list can be sorted most-severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    Medium,
    High,
    Critical,
}

/// A heuristically detected, possibly disputable item. Ephemeral: recomputed
/// on each analysis run, identified only by a timestamp-based id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifiedIssue {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub title: String,
    pub description: String,
    pub impact: ImpactLevel,
    /// FCRA/FDCPA citation strings attached from the statute table.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<String>,
    /// Back-reference to the triggering account, by account name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_ref: Option<String>,
}

impl IdentifiedIssue {
    pub fn new(kind: IssueKind, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: next_issue_id(),
            kind,
            title: title.into(),
            description: description.into(),
            impact: ImpactLevel::Medium,
            citations: Vec::new(),
            account_ref: None,
        }
    }

    pub fn with_impact(mut self, impact: ImpactLevel) -> Self {
        self.impact = impact;
        self
    }

    pub fn with_citation(mut self, citation: impl Into<String>) -> Self {
        self.citations.push(citation.into());
        self
    }

    pub fn with_citations(mut self, citations: Vec<String>) -> Self {
        self.citations.extend(citations);
        self
    }

    pub fn for_account(mut self, account_name: impl Into<String>) -> Self {
        self.account_ref = Some(account_name.into());
        self
    }
}

/// Lifecycle of a generated letter. Transitions are monotonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterStatus {
    Draft,
    Ready,
    Sent,
}

impl LetterStatus {
    fn rank(&self) -> u8 {
        match self {
            LetterStatus::Draft => 0,
            LetterStatus::Ready => 1,
            LetterStatus::Sent => 2,
        }
    }

    /// Draft → Ready → Sent only; no regressions.
    pub fn can_transition_to(&self, next: LetterStatus) -> bool {
        next.rank() >= self.rank()
    }
}

/// Which tier of the fallback chain produced the letter body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorTier {
    Primary,
    Manual,
    Emergency,
}

/// A templated dispute letter addressed to one bureau.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisputeLetter {
    pub id: String,
    pub bureau: Bureau,
    pub account_name: String,
    pub account_number: String,
    /// Free-text explanation supplied by the consumer.
    pub explanation: String,
    pub body: String,
    pub status: LetterStatus,
    pub generator: GeneratorTier,
    pub created_at: i64,
    pub updated_at: i64,
}

impl DisputeLetter {
    pub fn new(bureau: Bureau, body: impl Into<String>, generator: GeneratorTier) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            id: next_letter_id(),
            bureau,
            account_name: String::new(),
            account_number: String::new(),
            explanation: String::new(),
            body: body.into(),
            status: LetterStatus::Draft,
            generator,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn for_account(mut self, name: impl Into<String>, number: impl Into<String>) -> Self {
        self.account_name = name.into();
        self.account_number = number.into();
        self
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }
}

// Timestamp-based ids with a process-local sequence so same-millisecond
// issues stay distinct.
static ID_SEQ: AtomicU64 = AtomicU64::new(0);

fn next_id(prefix: &str) -> String {
    let seq = ID_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}-{}", prefix, chrono::Utc::now().timestamp_millis(), seq)
}

pub(crate) fn next_issue_id() -> String {
    next_id("iss")
}

pub(crate) fn next_letter_id() -> String {
    next_id("ltr")
}
