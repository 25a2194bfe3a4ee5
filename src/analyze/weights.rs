//! Runtime-calibrated impact weights with hot-reload from
//! `config/weights.json`.
//!
//! JSON shape:
//! {
//!   "w_status": 1.0,
//!   "w_balance": 1.0,
//!   "w_recency": 1.0
//! }
//!
//! On each `current()` call we check the file's modified time and reload if
//! changed. Missing file keeps the defaults.

use serde::Deserialize;
use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::RwLock,
    time::SystemTime,
};

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Weights {
    pub w_status: f32,
    pub w_balance: f32,
    pub w_recency: f32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            w_status: 1.0,
            w_balance: 1.0,
            w_recency: 1.0,
        }
    }
}

/// Hot-reload wrapper: reloads when the config file mtime changes.
#[derive(Debug)]
pub struct HotReloadWeights {
    path: PathBuf,
    inner: RwLock<State>,
}

#[derive(Debug)]
struct State {
    weights: Weights,
    last_modified: Option<SystemTime>,
}

impl HotReloadWeights {
    /// Create with a path (defaults to "config/weights.json" if `None`).
    pub fn new(path: Option<&Path>) -> Self {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("config/weights.json"));
        Self {
            path,
            inner: RwLock::new(State {
                weights: Weights::default(),
                last_modified: None,
            }),
        }
    }

    /// Get the latest weights, reloading if the config file changed.
    pub fn current(&self) -> Weights {
        let needs_reload = match fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(mtime) => self.inner.read().unwrap().last_modified != Some(mtime),
            // File absent: keep defaults, no reload.
            Err(_) => false,
        };

        if !needs_reload {
            return self.inner.read().unwrap().weights;
        }

        let mut guard = self.inner.write().unwrap();
        if let Ok(mtime) = fs::metadata(&self.path).and_then(|m| m.modified()) {
            if guard.last_modified != Some(mtime) {
                match load_weights_file(&self.path) {
                    Ok(w) => {
                        guard.weights = w;
                        guard.last_modified = Some(mtime);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, path = %self.path.display(), "weights reload failed");
                    }
                }
            }
        }
        guard.weights
    }
}

/// Load weights directly (no caching). Public for tests/tools.
pub fn load_weights_file(path: &Path) -> io::Result<Weights> {
    let bytes = fs::read(path)?;
    let w: Weights = serde_json::from_slice(&bytes)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{io::Write, thread, time::Duration};

    fn unique_tmp_dir() -> PathBuf {
        let mut dir = std::env::temp_dir();
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        dir.push(format!("impact_weights_test_{}", nanos));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn loads_and_hot_reloads() {
        let tmpdir = unique_tmp_dir();
        let path = tmpdir.join("weights.json");

        {
            let mut f = fs::File::create(&path).unwrap();
            write!(f, r#"{{"w_status":1.2,"w_balance":0.8,"w_recency":1.5}}"#).unwrap();
            f.sync_all().unwrap();
        }

        let hot = HotReloadWeights::new(Some(&path));
        let w1 = hot.current();
        assert!((w1.w_status - 1.2).abs() < f32::EPSILON);
        assert!((w1.w_balance - 0.8).abs() < f32::EPSILON);

        // Ensure different mtime (coarse filesystem clocks).
        thread::sleep(Duration::from_millis(1100));

        {
            let mut f = fs::File::create(&path).unwrap();
            write!(f, r#"{{"w_status":2.0,"w_balance":2.0,"w_recency":2.0}}"#).unwrap();
            f.sync_all().unwrap();
        }

        let w2 = hot.current();
        assert!((w2.w_status - 2.0).abs() < f32::EPSILON);

        let _ = fs::remove_file(&path);
        let _ = fs::remove_dir_all(&tmpdir);
    }

    #[test]
    fn missing_file_keeps_defaults() {
        let hot = HotReloadWeights::new(Some(Path::new("/definitely/not/here.json")));
        let w = hot.current();
        assert!((w.w_status - 1.0).abs() < f32::EPSILON);
    }
}
