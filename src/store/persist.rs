// src/store/persist.rs
//! Pluggable persistence for session blobs.
//!
//! The hosted-database tables of the original live behind this trait: the
//! service only ever hands over (key, JSON) pairs. `LocalDirSink` is the
//! shipping implementation; `MockSink` records calls for tests.

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[async_trait::async_trait]
pub trait PersistenceSink: Send + Sync {
    /// Store (key, JSON) pairs atomically (as best-effort).
    async fn store(&self, items: Vec<(String, String)>) -> Result<()>;
}

/// Writes each session to `<dir>/<key>.json`.
pub struct LocalDirSink {
    dir: PathBuf,
}

impl LocalDirSink {
    /// Initialize the sink, retrying directory creation with bounded
    /// exponential backoff (transient mount/permission hiccups at boot).
    pub async fn init_with_backoff(dir: impl AsRef<Path>, max_attempts: u32) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let mut delay = Duration::from_millis(100);
        let mut last_err: Option<std::io::Error> = None;

        for attempt in 1..=max_attempts.max(1) {
            match tokio::fs::create_dir_all(&dir).await {
                Ok(()) => return Ok(Self { dir }),
                Err(e) => {
                    tracing::warn!(error = %e, attempt, dir = %dir.display(), "sink init failed");
                    last_err = Some(e);
                    tokio::time::sleep(delay).await;
                    delay = delay.saturating_mul(2);
                }
            }
        }
        Err(anyhow::anyhow!(
            "could not initialize snapshot dir {}: {:?}",
            dir.display(),
            last_err
        ))
    }
}

#[async_trait::async_trait]
impl PersistenceSink for LocalDirSink {
    async fn store(&self, items: Vec<(String, String)>) -> Result<()> {
        for (key, json) in items {
            // Session ids are service-generated; still, never let a key
            // traverse out of the directory.
            let safe: String = key
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
                .collect();
            if safe.is_empty() {
                continue;
            }
            let path = self.dir.join(format!("{safe}.json"));
            if let Err(e) = tokio::fs::write(&path, json).await {
                tracing::warn!(error = %e, path = %path.display(), "snapshot write failed");
            }
        }
        Ok(())
    }
}

/// Periodic snapshot job. Wire this from app startup.
pub fn spawn_snapshot_task<S: PersistenceSink + 'static>(
    store: Arc<super::SessionStore>,
    sink: S,
    period: Duration,
) {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(period).await;
            let items = store.snapshot_all();
            if items.is_empty() {
                continue;
            }
            if let Err(e) = sink.store(items).await {
                tracing::warn!(error = %e, "session snapshot failed");
            }
        }
    });
}

// --- Test helper ---
pub struct MockSink {
    pub calls: std::sync::Mutex<Vec<Vec<(String, String)>>>,
}

impl MockSink {
    pub fn new() -> Self {
        Self {
            calls: std::sync::Mutex::new(vec![]),
        }
    }
}

impl Default for MockSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl PersistenceSink for MockSink {
    async fn store(&self, items: Vec<(String, String)>) -> Result<()> {
        self.calls.lock().unwrap().push(items);
        Ok(())
    }
}
