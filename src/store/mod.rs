//! store — per-session state for the upload → analyze → letters flow.
//!
//! The original client kept this in browser session storage under a handful
//! of well-known keys; here one `SessionEntry` carries the same trio
//! (report data, generated letters, pending letter) behind a server-side
//! session id. Entries are capped; the oldest-touched session is evicted
//! when the cap is exceeded.

pub mod persist;

use crate::error::{AnalyzerError, Result};
use crate::report::{CreditReportData, DisputeLetter, IdentifiedIssue, LetterStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<CreditReportData>,
    #[serde(default)]
    pub issues: Vec<IdentifiedIssue>,
    #[serde(default)]
    pub letters: Vec<DisputeLetter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_letter: Option<DisputeLetter>,
    pub touched_at: u64,
}

#[derive(Debug)]
pub struct SessionStore {
    inner: RwLock<HashMap<String, SessionEntry>>,
    cap: usize,
}

static SESSION_SEQ: AtomicU64 = AtomicU64::new(0);

impl SessionStore {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            cap: cap.clamp(1, 100_000),
        }
    }

    /// Create a fresh session and return its id.
    pub fn new_session(&self) -> String {
        let id = format!(
            "sess-{}-{}",
            chrono::Utc::now().timestamp_millis(),
            SESSION_SEQ.fetch_add(1, Ordering::Relaxed)
        );
        let mut map = self.inner.write().expect("session store poisoned");
        map.insert(
            id.clone(),
            SessionEntry {
                touched_at: now_unix(),
                ..Default::default()
            },
        );
        Self::evict_past_cap(&mut map, self.cap);
        id
    }

    pub fn put_analysis(
        &self,
        session_id: &str,
        report: CreditReportData,
        issues: Vec<IdentifiedIssue>,
    ) -> Result<()> {
        self.with_entry(session_id, |entry| {
            entry.report = Some(report);
            entry.issues = issues;
            Ok(())
        })
    }

    pub fn report(&self, session_id: &str) -> Result<Option<CreditReportData>> {
        let map = self.inner.read().expect("session store poisoned");
        let entry = map
            .get(session_id)
            .ok_or_else(|| AnalyzerError::UnknownSession(session_id.into()))?;
        Ok(entry.report.clone())
    }

    pub fn issues(&self, session_id: &str) -> Result<Vec<IdentifiedIssue>> {
        let map = self.inner.read().expect("session store poisoned");
        let entry = map
            .get(session_id)
            .ok_or_else(|| AnalyzerError::UnknownSession(session_id.into()))?;
        Ok(entry.issues.clone())
    }

    pub fn add_letters(&self, session_id: &str, letters: Vec<DisputeLetter>) -> Result<()> {
        self.with_entry(session_id, |entry| {
            entry.letters.extend(letters);
            Ok(())
        })
    }

    pub fn letters(&self, session_id: &str) -> Result<Vec<DisputeLetter>> {
        let map = self.inner.read().expect("session store poisoned");
        let entry = map
            .get(session_id)
            .ok_or_else(|| AnalyzerError::UnknownSession(session_id.into()))?;
        Ok(entry.letters.clone())
    }

    /// The one-letter handoff slot the original used between page views.
    pub fn set_pending_letter(&self, session_id: &str, letter: DisputeLetter) -> Result<()> {
        self.with_entry(session_id, |entry| {
            entry.pending_letter = Some(letter);
            Ok(())
        })
    }

    pub fn take_pending_letter(&self, session_id: &str) -> Result<Option<DisputeLetter>> {
        self.with_entry(session_id, |entry| Ok(entry.pending_letter.take()))
    }

    /// Monotonic Draft → Ready → Sent transition.
    pub fn update_letter_status(
        &self,
        session_id: &str,
        letter_id: &str,
        next: LetterStatus,
    ) -> Result<DisputeLetter> {
        self.with_entry(session_id, |entry| {
            let letter = entry
                .letters
                .iter_mut()
                .find(|l| l.id == letter_id)
                .ok_or_else(|| AnalyzerError::UnknownLetter(letter_id.into()))?;
            if !letter.status.can_transition_to(next) {
                return Err(AnalyzerError::InvalidStatusTransition {
                    from: format!("{:?}", letter.status).to_lowercase(),
                    to: format!("{next:?}").to_lowercase(),
                });
            }
            letter.status = next;
            letter.updated_at = chrono::Utc::now().timestamp();
            Ok(letter.clone())
        })
    }

    /// Redaction-safe JSON snapshot of every session, for the persistence
    /// sink. Report raw text is already scrubbed by the parser.
    pub fn snapshot_all(&self) -> Vec<(String, String)> {
        let map = self.inner.read().expect("session store poisoned");
        map.iter()
            .filter_map(|(id, entry)| {
                serde_json::to_string(entry).ok().map(|json| (id.clone(), json))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().expect("session store poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_entry<T>(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut SessionEntry) -> Result<T>,
    ) -> Result<T> {
        let mut map = self.inner.write().expect("session store poisoned");
        let entry = map
            .get_mut(session_id)
            .ok_or_else(|| AnalyzerError::UnknownSession(session_id.into()))?;
        entry.touched_at = now_unix();
        f(entry)
    }

    fn evict_past_cap(map: &mut HashMap<String, SessionEntry>, cap: usize) {
        while map.len() > cap {
            let oldest = map
                .iter()
                .min_by_key(|(_, e)| e.touched_at)
                .map(|(id, _)| id.clone());
            match oldest {
                Some(id) => {
                    tracing::debug!(session = %id, "evicting oldest session past cap");
                    map.remove(&id);
                }
                None => break,
            }
        }
    }
}

fn now_unix() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}
