//! Credit Report Analyzer — Binary Entrypoint
//! Boots the Axum HTTP server, wiring routes, shared state, metrics, and the
//! background snapshot task.

use credit_report_analyzer::api::{self, AppState};
use credit_report_analyzer::config::AnalyzerConfig;
use credit_report_analyzer::metrics::Metrics;
use credit_report_analyzer::store::persist::{spawn_snapshot_task, LocalDirSink};
use shuttle_axum::ShuttleAxum;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - ANALYZER_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("ANALYZER_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("credit_report_analyzer=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    // Initialize dev tracing early (no-op in production).
    enable_dev_tracing();

    let cfg = AnalyzerConfig::load().expect("Failed to load analyzer config");
    let metrics = Metrics::init(cfg.analysis_timeout_ms);

    let snapshot_dir = cfg.snapshot_dir.clone();
    let snapshot_period = Duration::from_secs(cfg.snapshot_interval_secs);

    let state = AppState::new(cfg);

    // Background persistence is best-effort: a sink that cannot initialize
    // is logged and skipped, never fatal to the request path.
    if let Some(dir) = snapshot_dir {
        match LocalDirSink::init_with_backoff(&dir, 4).await {
            Ok(sink) => spawn_snapshot_task(state.store.clone(), sink, snapshot_period),
            Err(e) => tracing::warn!(error = %e, "session snapshots disabled"),
        }
    }

    let router = api::router(state).merge(metrics.router());

    Ok(router.into())
}
