//! Service configuration: `config/analyzer.toml` with env overrides.
//!
//! Every knob has a sane default, so the service boots with no config file
//! at all (the common case in tests and local runs). The hot-reloaded JSON
//! files for detection rules and impact weights live in the `analyze` module;
//! this file covers the static, boot-time settings.

use serde::Deserialize;
use std::{env, fs, path::Path};

pub const DEFAULT_CONFIG_PATH: &str = "config/analyzer.toml";
pub const ENV_CONFIG_PATH: &str = "ANALYZER_CONFIG_PATH";
pub const ENV_ANALYSIS_TIMEOUT_MS: &str = "ANALYZER_ANALYSIS_TIMEOUT_MS";
pub const ENV_SNAPSHOT_DIR: &str = "ANALYZER_SNAPSHOT_DIR";

fn default_max_upload_mb() -> u64 {
    50
}
fn default_min_issues() -> usize {
    3
}
fn default_max_hard_inquiries() -> usize {
    6
}
fn default_high_balance_threshold() -> f64 {
    10_000.0
}
fn default_duplicate_balance_tolerance() -> f64 {
    0.01
}
fn default_analysis_timeout_ms() -> u64 {
    8_000
}
fn default_min_letter_len() -> usize {
    400
}
fn default_session_cap() -> usize {
    1_024
}
fn default_snapshot_interval_secs() -> u64 {
    15 * 60
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzerConfig {
    /// Upload size cap in megabytes.
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: u64,
    /// Issue list is padded with generic issues up to this count.
    #[serde(default = "default_min_issues")]
    pub min_issues: usize,
    /// Hard inquiries beyond this count raise an excessive-inquiries issue.
    #[serde(default = "default_max_hard_inquiries")]
    pub max_hard_inquiries: usize,
    /// Revolving balances above this raise a high-balance issue.
    #[serde(default = "default_high_balance_threshold")]
    pub high_balance_threshold: f64,
    /// Relative balance tolerance for the student-loan duplicate scan.
    #[serde(default = "default_duplicate_balance_tolerance")]
    pub duplicate_balance_tolerance: f64,
    /// Budget for one analysis run before the canned fallback wins the race.
    #[serde(default = "default_analysis_timeout_ms")]
    pub analysis_timeout_ms: u64,
    /// Rendered letters shorter than this fall through to the next tier.
    #[serde(default = "default_min_letter_len")]
    pub min_letter_len: usize,
    /// Session store entry cap; oldest sessions are evicted past it.
    #[serde(default = "default_session_cap")]
    pub session_cap: usize,
    /// Directory for periodic session snapshots; `None` disables them.
    #[serde(default)]
    pub snapshot_dir: Option<String>,
    #[serde(default = "default_snapshot_interval_secs")]
    pub snapshot_interval_secs: u64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        // serde defaults double as the programmatic defaults
        toml::from_str("").expect("empty config deserializes via defaults")
    }
}

impl AnalyzerConfig {
    /// Load from `ANALYZER_CONFIG_PATH` (or the default path), then apply
    /// env overrides. Missing file falls back to defaults; a malformed file
    /// is an error so typos don't silently vanish.
    pub fn load() -> anyhow::Result<Self> {
        let path = env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut cfg = match fs::read_to_string(Path::new(&path)) {
            Ok(raw) => toml::from_str::<AnalyzerConfig>(&raw)?,
            Err(_) => AnalyzerConfig::default(),
        };
        cfg.apply_env();
        cfg.sanitize();
        Ok(cfg)
    }

    fn apply_env(&mut self) {
        if let Some(ms) = env::var(ENV_ANALYSIS_TIMEOUT_MS)
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
        {
            self.analysis_timeout_ms = ms;
        }
        if let Ok(dir) = env::var(ENV_SNAPSHOT_DIR) {
            if !dir.trim().is_empty() {
                self.snapshot_dir = Some(dir);
            }
        }
    }

    fn sanitize(&mut self) {
        if self.max_upload_mb == 0 {
            self.max_upload_mb = default_max_upload_mb();
        }
        if self.min_issues == 0 {
            self.min_issues = default_min_issues();
        }
        if !(0.0..1.0).contains(&self.duplicate_balance_tolerance) {
            self.duplicate_balance_tolerance = default_duplicate_balance_tolerance();
        }
        if self.analysis_timeout_ms == 0 {
            self.analysis_timeout_ms = default_analysis_timeout_ms();
        }
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_mb * 1024 * 1024
    }
}
