// tests/config_env.rs
// Env overrides for the service config. Serialized because the process
// environment is global state.

use credit_report_analyzer::config::{
    AnalyzerConfig, ENV_ANALYSIS_TIMEOUT_MS, ENV_CONFIG_PATH, ENV_SNAPSHOT_DIR,
};
use serial_test::serial;

fn clear_env() {
    std::env::remove_var(ENV_CONFIG_PATH);
    std::env::remove_var(ENV_ANALYSIS_TIMEOUT_MS);
    std::env::remove_var(ENV_SNAPSHOT_DIR);
}

#[test]
#[serial]
fn defaults_when_nothing_is_set() {
    clear_env();
    let cfg = AnalyzerConfig::load().unwrap();
    assert_eq!(cfg.max_upload_mb, 50);
    assert_eq!(cfg.min_issues, 3);
    assert!(cfg.snapshot_dir.is_none());
}

#[test]
#[serial]
fn env_overrides_timeout_and_snapshot_dir() {
    clear_env();
    std::env::set_var(ENV_ANALYSIS_TIMEOUT_MS, "2500");
    std::env::set_var(ENV_SNAPSHOT_DIR, "/tmp/snapshots");

    let cfg = AnalyzerConfig::load().unwrap();
    assert_eq!(cfg.analysis_timeout_ms, 2500);
    assert_eq!(cfg.snapshot_dir.as_deref(), Some("/tmp/snapshots"));

    clear_env();
}

#[test]
#[serial]
fn config_file_loads_and_env_still_wins() {
    clear_env();

    let mut dir = std::env::temp_dir();
    dir.push(format!(
        "cfg_test_{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("analyzer.toml");
    std::fs::write(&path, "min_issues = 5\nanalysis_timeout_ms = 9000\n").unwrap();

    std::env::set_var(ENV_CONFIG_PATH, path.to_str().unwrap());
    std::env::set_var(ENV_ANALYSIS_TIMEOUT_MS, "1234");

    let cfg = AnalyzerConfig::load().unwrap();
    assert_eq!(cfg.min_issues, 5, "file value");
    assert_eq!(cfg.analysis_timeout_ms, 1234, "env beats file");

    clear_env();
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
#[serial]
fn malformed_config_file_is_an_error() {
    clear_env();

    let mut dir = std::env::temp_dir();
    dir.push(format!(
        "cfg_bad_{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("analyzer.toml");
    std::fs::write(&path, "min_issues = \"not a number\"\n").unwrap();

    std::env::set_var(ENV_CONFIG_PATH, path.to_str().unwrap());
    assert!(AnalyzerConfig::load().is_err());

    clear_env();
    let _ = std::fs::remove_dir_all(&dir);
}
