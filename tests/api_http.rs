// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - POST /reports/upload (multipart) → session with report + issues
// - POST /analyze (raw text, sessionless)
// - POST /letters/generate → GET /letters → POST /letters/status
// - upload validation failures (bad extension)

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::json;
use serde_json::Value as Json;
use tower::ServiceExt as _; // for `oneshot`

use credit_report_analyzer::api::{self, AppState};

const BODY_LIMIT: usize = 4 * 1024 * 1024; // plenty for tests

const SAMPLE_REPORT: &str = "\
Equifax Credit Report

PERSONAL INFORMATION
Name: JOHN Q CONSUMER
Address: 123 MAIN ST, SPRINGFIELD, IL 62704
SSN: 123-45-6789

ACCOUNTS
Account Name: ABC COLLECTIONS AGENCY
Account Number: ****9876
Balance: $432.00
Payment Status: in collections

Account Name: FIRST BANK CARD
Account Number: ****1234
Balance: $1,523.44
Payment Status: Current

INQUIRIES
AUTO FINANCE CO 03/12/2024
";

/// Build the same Router the binary uses (shared state across clones).
fn test_router() -> Router {
    let state = AppState::from_env();
    api::router(state)
}

fn multipart_body(file_name: &str, content: &str) -> (String, Vec<u8>) {
    let boundary = "test-boundary-7d81a0b4";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n\
         {content}\r\n\
         --{boundary}--\r\n"
    );
    (
        format!("multipart/form-data; boundary={boundary}"),
        body.into_bytes(),
    )
}

async fn json_body(resp: axum::response::Response) -> Json {
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    serde_json::from_slice(&bytes).expect("parse json body")
}

#[tokio::test]
async fn api_health_returns_200_and_ok_body() {
    let app = test_router();

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = app.oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK, "health should be 200");

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    let body = String::from_utf8(bytes).expect("utf8");
    assert_eq!(body.trim(), "OK", "health body should be 'OK'");
}

#[tokio::test]
async fn api_analyze_returns_report_and_minimum_issues() {
    let app = test_router();

    let payload = json!({ "text": SAMPLE_REPORT });
    let req = Request::builder()
        .method("POST")
        .uri("/analyze")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("build POST /analyze");

    let resp = app.oneshot(req).await.expect("oneshot /analyze");
    assert!(resp.status().is_success(), "got {}", resp.status());

    let v = json_body(resp).await;
    // Contract checks for UI consumers
    assert!(v.get("report").is_some(), "missing 'report'");
    assert!(v.get("issues").is_some(), "missing 'issues'");
    assert!(v.get("session_id").is_none(), "sessionless analyze must not mint a session");

    let issues = v["issues"].as_array().unwrap();
    assert!(issues.len() >= 3, "minimum-issue guarantee");
    assert!(issues
        .iter()
        .any(|i| i["type"] == json!("collection_account")));
}

#[tokio::test]
async fn api_upload_then_letters_full_flow() {
    let app = test_router();

    // 1) Upload.
    let (content_type, bytes) = multipart_body("report.txt", SAMPLE_REPORT);
    let req = Request::builder()
        .method("POST")
        .uri("/reports/upload")
        .header("content-type", content_type)
        .body(Body::from(bytes))
        .expect("build POST /reports/upload");

    let resp = app.clone().oneshot(req).await.expect("oneshot upload");
    assert!(resp.status().is_success(), "upload got {}", resp.status());
    let v = json_body(resp).await;
    let session_id = v["session_id"].as_str().expect("session id").to_string();
    assert!(v["report"]["bureaus"]["equifax"].as_bool().unwrap());
    assert!(v["issues"].as_array().unwrap().len() >= 3);

    // 2) Generate letters for everything, explicit bureau.
    let gen = json!({
        "session_id": session_id,
        "bureaus": ["equifax"],
        "consumer_name": "JOHN Q CONSUMER",
        "consumer_address": "123 MAIN ST, SPRINGFIELD, IL 62704",
        "explanation": "These items are inaccurate."
    });
    let req = Request::builder()
        .method("POST")
        .uri("/letters/generate")
        .header("content-type", "application/json")
        .body(Body::from(gen.to_string()))
        .expect("build POST /letters/generate");

    let resp = app.clone().oneshot(req).await.expect("oneshot generate");
    assert!(resp.status().is_success(), "generate got {}", resp.status());
    let letters = json_body(resp).await;
    let letters = letters.as_array().unwrap();
    assert!(!letters.is_empty());
    assert!(letters.iter().all(|l| l["bureau"] == json!("equifax")));
    assert!(letters.iter().all(|l| l["status"] == json!("draft")));
    let letter_id = letters[0]["id"].as_str().unwrap().to_string();

    // 3) Read letters back.
    let req = Request::builder()
        .method("GET")
        .uri(format!("/letters?session_id={session_id}"))
        .body(Body::empty())
        .expect("build GET /letters");
    let resp = app.clone().oneshot(req).await.expect("oneshot get letters");
    assert!(resp.status().is_success());
    let stored = json_body(resp).await;
    assert_eq!(stored.as_array().unwrap().len(), letters.len());

    // 4) Monotonic status update.
    let upd = json!({ "session_id": session_id, "letter_id": letter_id, "status": "ready" });
    let req = Request::builder()
        .method("POST")
        .uri("/letters/status")
        .header("content-type", "application/json")
        .body(Body::from(upd.to_string()))
        .expect("build POST /letters/status");
    let resp = app.clone().oneshot(req).await.expect("oneshot status");
    assert!(resp.status().is_success());
    let v = json_body(resp).await;
    assert_eq!(v["status"], json!("ready"));

    // Regression to draft must 409.
    let upd = json!({ "session_id": session_id, "letter_id": v["id"], "status": "draft" });
    let req = Request::builder()
        .method("POST")
        .uri("/letters/status")
        .header("content-type", "application/json")
        .body(Body::from(upd.to_string()))
        .expect("build POST /letters/status");
    let resp = app.oneshot(req).await.expect("oneshot status regression");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn api_upload_rejects_disallowed_extension() {
    let app = test_router();

    let (content_type, bytes) = multipart_body("report.docx", "not allowed");
    let req = Request::builder()
        .method("POST")
        .uri("/reports/upload")
        .header("content-type", content_type)
        .body(Body::from(bytes))
        .expect("build POST /reports/upload");

    let resp = app.oneshot(req).await.expect("oneshot upload");
    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let v = json_body(resp).await;
    assert!(v["error"].as_str().unwrap().contains("not allowed"));
}

#[tokio::test]
async fn api_letters_for_unknown_session_is_404() {
    let app = test_router();

    let req = Request::builder()
        .method("GET")
        .uri("/letters?session_id=sess-unknown")
        .body(Body::empty())
        .expect("build GET /letters");
    let resp = app.oneshot(req).await.expect("oneshot get letters");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
