//! HTTP surface: upload → analyze → letters, plus session reads.
//!
//! Handlers favor degraded output over failure (fallback issues, fallback
//! letter tiers); a 4xx only comes back for invalid uploads and unknown
//! sessions, matching how the original client degraded everywhere else.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::analyze;
use crate::config::AnalyzerConfig;
use crate::creditors::CreditorRegistry;
use crate::error::AnalyzerError;
use crate::extract;
use crate::letters::{self, LetterRequest};
use crate::parse;
use crate::report::{
    Bureau, CreditReportData, DisputeLetter, IdentifiedIssue, LetterStatus,
};
use crate::store::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<AnalyzerConfig>,
    pub registry: Arc<CreditorRegistry>,
    pub store: Arc<SessionStore>,
}

impl AppState {
    pub fn new(cfg: AnalyzerConfig) -> Self {
        let store = SessionStore::with_capacity(cfg.session_cap);
        Self {
            cfg: Arc::new(cfg),
            registry: Arc::new(CreditorRegistry::load_from_file("config/creditors.json")),
            store: Arc::new(store),
        }
    }

    /// Config from file/env, defaults when absent. The test entrypoint.
    pub fn from_env() -> Self {
        Self::new(AnalyzerConfig::load().unwrap_or_default())
    }
}

pub fn router(state: AppState) -> Router {
    let body_limit = state.cfg.max_upload_bytes() as usize;

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/reports/upload", post(upload_report))
        .route("/analyze", post(analyze_text))
        .route("/letters/generate", post(generate_letters))
        .route("/letters", get(get_letters))
        .route("/letters/status", post(update_letter_status))
        .route("/debug/session", get(debug_session))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

// --- error mapping ---

struct ApiError(AnalyzerError);

impl From<AnalyzerError> for ApiError {
    fn from(e: AnalyzerError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AnalyzerError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AnalyzerError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AnalyzerError::UnknownSession(_) | AnalyzerError::UnknownLetter(_) => {
                StatusCode::NOT_FOUND
            }
            AnalyzerError::InvalidStatusTransition { .. } => StatusCode::CONFLICT,
            AnalyzerError::CsvParse(_) | AnalyzerError::PdfExtraction(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AnalyzerError::Io(_) | AnalyzerError::Template(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

// --- request/response shapes ---

#[derive(serde::Serialize)]
struct AnalysisResp {
    #[serde(skip_serializing_if = "Option::is_none")]
    session_id: Option<String>,
    report: CreditReportData,
    issues: Vec<IdentifiedIssue>,
}

#[derive(serde::Deserialize)]
struct AnalyzeReq {
    text: String,
    #[serde(default)]
    source_was_pdf: bool,
}

#[derive(serde::Deserialize)]
struct GenerateReq {
    session_id: String,
    /// Target bureaus by name; empty means "bureaus detected in the report".
    #[serde(default)]
    bureaus: Vec<String>,
    /// Issue ids to letter; empty means all stored issues.
    #[serde(default)]
    issue_ids: Vec<String>,
    #[serde(flatten)]
    letter: LetterRequest,
}

#[derive(serde::Deserialize)]
struct SessionQuery {
    session_id: String,
}

#[derive(serde::Deserialize)]
struct StatusReq {
    session_id: String,
    letter_id: String,
    status: LetterStatus,
}

// --- handlers ---

/// The upload-report flow: validate, extract, parse, analyze (with the
/// timeout race), and persist under a fresh session.
async fn upload_report(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResp>, ApiError> {
    let mut file_name = String::new();
    let mut bytes: Vec<u8> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError(AnalyzerError::UnsupportedFormat(format!("bad multipart body: {e}")))
    })? {
        if field.name() == Some("file") || file_name.is_empty() {
            file_name = field.file_name().unwrap_or("upload.txt").to_string();
            bytes = field
                .bytes()
                .await
                .map_err(|e| {
                    ApiError(AnalyzerError::UnsupportedFormat(format!(
                        "could not read upload: {e}"
                    )))
                })?
                .to_vec();
        }
    }

    let doc = extract::validate_upload(&file_name, bytes, state.cfg.max_upload_bytes())?;
    let text = extract::extract_text(&doc).await?;
    let source_was_pdf = doc.kind == extract::types::DocumentKind::Pdf;

    let report = parse::parse_report(&text, source_was_pdf, &state.registry);
    let issues = analyze::analyze_with_timeout(
        report.clone(),
        (*state.cfg).clone(),
        (*state.registry).clone(),
    )
    .await;

    let session_id = state.store.new_session();
    state
        .store
        .put_analysis(&session_id, report.clone(), issues.clone())?;

    tracing::info!(
        session = %session_id,
        accounts = report.accounts.len(),
        issues = issues.len(),
        "report analyzed"
    );

    Ok(Json(AnalysisResp {
        session_id: Some(session_id),
        report,
        issues,
    }))
}

/// Re-run analysis over raw text without touching any session.
async fn analyze_text(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeReq>,
) -> Json<AnalysisResp> {
    let text = extract::normalize_text(&body.text);
    let report = parse::parse_report(&text, body.source_was_pdf, &state.registry);
    let issues = analyze::analyze_with_timeout(
        report.clone(),
        (*state.cfg).clone(),
        (*state.registry).clone(),
    )
    .await;

    Json(AnalysisResp {
        session_id: None,
        report,
        issues,
    })
}

async fn generate_letters(
    State(state): State<AppState>,
    Json(body): Json<GenerateReq>,
) -> Result<Json<Vec<DisputeLetter>>, ApiError> {
    let report = state
        .store
        .report(&body.session_id)?
        .unwrap_or_default();
    let stored = state.store.issues(&body.session_id)?;

    let issues: Vec<IdentifiedIssue> = if body.issue_ids.is_empty() {
        stored
    } else {
        stored
            .into_iter()
            .filter(|i| body.issue_ids.iter().any(|id| *id == i.id))
            .collect()
    };

    let bureaus: Vec<Bureau> = body
        .bureaus
        .iter()
        .filter_map(|s| Bureau::parse(s))
        .collect();

    let letters = letters::generate_letters_for_issues(
        &issues,
        &bureaus,
        &report,
        &body.letter,
        &state.cfg,
    );

    state.store.add_letters(&body.session_id, letters.clone())?;
    tracing::info!(
        session = %body.session_id,
        letters = letters.len(),
        "dispute letters generated"
    );
    Ok(Json(letters))
}

/// The get-dispute-letters flow.
async fn get_letters(
    State(state): State<AppState>,
    Query(q): Query<SessionQuery>,
) -> Result<Json<Vec<DisputeLetter>>, ApiError> {
    Ok(Json(state.store.letters(&q.session_id)?))
}

async fn update_letter_status(
    State(state): State<AppState>,
    Json(body): Json<StatusReq>,
) -> Result<Json<DisputeLetter>, ApiError> {
    let letter = state
        .store
        .update_letter_status(&body.session_id, &body.letter_id, body.status)?;
    Ok(Json(letter))
}

/// Redacted session snapshot for dev diagnostics: counts and flags only,
/// never report content.
async fn debug_session(
    State(state): State<AppState>,
    Query(q): Query<SessionQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let report = state.store.report(&q.session_id)?;
    let issues = state.store.issues(&q.session_id)?;
    let letters = state.store.letters(&q.session_id)?;

    Ok(Json(serde_json::json!({
        "session_id": q.session_id,
        "has_report": report.is_some(),
        "bureaus": report.as_ref().map(|r| r.bureaus),
        "accounts": report.as_ref().map(|r| r.accounts.len()).unwrap_or(0),
        "issues": issues.len(),
        "letters": letters.len(),
    })))
}
