//! Integration tests for the loantrack HTTP API.
//!
//! Uses axum-test to test the API handlers without starting a real server.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum::body::Body;
use axum::http::{HeaderValue, Request, StatusCode, header};
use axum_test::TestServer;
use loantrack::api::{
    AppState, ErrorResponse, HealthResponse, StagesResponse, TrackRequest, TrackerResponse,
    create_router,
};
use loantrack::config::AppConfig;
use loantrack_core::{ErrorKind, Indicator, Outcome, Stage, Theme, VisualState};
use serde_json::json;
use tower::ServiceExt;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Config with rate limiting off so tests never trip it.
fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.server.rate_limit = 0;
    config
}

fn create_test_server() -> TestServer {
    TestServer::new(create_router(AppState::new(test_config()))).unwrap()
}

fn create_test_server_with(config: AppConfig) -> TestServer {
    TestServer::new(create_router(AppState::new(config))).unwrap()
}

fn create_authed_test_server(key: &str) -> TestServer {
    let mut config = test_config();
    config.server.api_key = Some(key.to_string());
    create_test_server_with(config)
}

fn stages_of(response: &TrackerResponse) -> Vec<Stage> {
    response.stages.iter().map(|r| r.stage).collect()
}

// =============================================================================
// HEALTH ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let server = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

// =============================================================================
// STAGES ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_stages_lists_all_in_order() {
    let server = create_test_server();

    let response = server.get("/stages").await;

    response.assert_status_ok();
    let body: StagesResponse = response.json();
    let stages: Vec<Stage> = body.stages.iter().map(|s| s.stage).collect();
    assert_eq!(stages, Stage::ALL.to_vec());
    assert_eq!(body.stages[0].label, "Eligibility");
    assert!(body.stages[8].terminal);
    assert!(!body.stages[6].terminal);
}

// =============================================================================
// TRACKER ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_tracker_successful_loan() {
    let server = create_test_server();

    let response = server.get("/tracker/disbursement-successful").await;

    response.assert_status_ok();
    let body: TrackerResponse = response.json();
    assert_eq!(body.current, Stage::DisbursementSuccessful);
    assert_eq!(body.current_index, Some(6));
    assert_eq!(body.outcome, Outcome::Disbursed);
    assert_eq!(body.percent_complete, 100);
    assert_eq!(body.stages.len(), 7);
    assert!(!stages_of(&body).contains(&Stage::DisbursementProcessing));
    assert!(!stages_of(&body).contains(&Stage::DisbursementFailure));
}

#[tokio::test]
async fn test_tracker_failed_loan() {
    let server = create_test_server();

    let response = server.get("/tracker/disbursement-failure").await;

    response.assert_status_ok();
    let body: TrackerResponse = response.json();
    assert_eq!(body.outcome, Outcome::Failed);
    assert_eq!(body.stages.len(), 8);

    let failure = &body.stages[6];
    assert_eq!(failure.stage, Stage::DisbursementFailure);
    assert_eq!(failure.state, VisualState::Current);
    assert_eq!(failure.indicator, Indicator::Failure);
    assert_eq!(failure.icon, "x-circle");

    let success = &body.stages[7];
    assert_eq!(success.state, VisualState::Pending);
    assert_eq!(success.indicator, Indicator::Neutral);
}

#[tokio::test]
async fn test_tracker_accepts_upper_snake_case() {
    let server = create_test_server();

    let response = server.get("/tracker/DISBURSEMENT_PROCESSING").await;

    response.assert_status_ok();
    let body: TrackerResponse = response.json();
    assert_eq!(body.current, Stage::DisbursementProcessing);
    assert_eq!(body.stages[6].indicator, Indicator::InProgress);
}

#[tokio::test]
async fn test_tracker_unknown_stage_is_bad_request() {
    let server = create_test_server();

    let response = server.get("/tracker/loan-closed").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: ErrorResponse = response.json();
    assert_eq!(body.error_kind, ErrorKind::UnrecognizedStage);
    assert!(body.message.contains("loan-closed"));
}

#[tokio::test]
async fn test_tracker_post_body() {
    let server = create_test_server();

    let response = server
        .post("/tracker")
        .json(&TrackRequest {
            stage: "approval".to_string(),
            theme: Some("dark".to_string()),
        })
        .await;

    response.assert_status_ok();
    let body: TrackerResponse = response.json();
    assert_eq!(body.current, Stage::Approval);
    assert_eq!(body.theme, Theme::Dark);
    assert_eq!(body.stages.len(), Stage::COUNT);
    assert_eq!(body.stages[0].color, Theme::Dark.swatch(Indicator::Success).color);
}

#[tokio::test]
async fn test_tracker_post_unknown_stage() {
    let server = create_test_server();

    let response = server
        .post("/tracker")
        .json(&json!({ "stage": "funded" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: ErrorResponse = response.json();
    assert_eq!(body.error_kind, ErrorKind::UnrecognizedStage);
}

#[tokio::test]
async fn test_tracker_unknown_theme_is_invalid_theme() {
    let server = create_test_server();

    let response = server.get("/tracker/approval?theme=neon").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: ErrorResponse = response.json();
    assert_eq!(body.error_kind, ErrorKind::InvalidTheme);
    assert!(body.message.contains("neon"));
}

#[tokio::test]
async fn test_tracker_post_missing_stage_is_invalid_request() {
    let server = create_test_server();

    let response = server.post("/tracker").json(&json!({})).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: ErrorResponse = response.json();
    assert_eq!(body.error_kind, ErrorKind::InvalidRequest);
    assert!(body.message.contains("stage"));
}

#[tokio::test]
async fn test_tracker_post_mistyped_stage_is_invalid_request() {
    let server = create_test_server();

    let response = server.post("/tracker").json(&json!({ "stage": 7 })).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: ErrorResponse = response.json();
    assert_eq!(body.error_kind, ErrorKind::InvalidRequest);
}

#[tokio::test]
async fn test_tracker_post_malformed_json_is_invalid_request() {
    let server = create_test_server();

    let response = server
        .post("/tracker")
        .text("{\"stage\": ")
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: ErrorResponse = response.json();
    assert_eq!(body.error_kind, ErrorKind::InvalidRequest);
}

#[tokio::test]
async fn test_tracker_uses_configured_theme() {
    let mut config = test_config();
    config.display.theme = Theme::Dark;
    let server = create_test_server_with(config);

    let body: TrackerResponse = server.get("/tracker/eligibility").await.json();

    assert_eq!(body.theme, Theme::Dark);
}

#[tokio::test]
async fn test_tracker_is_idempotent() {
    let server = create_test_server();

    let first: TrackerResponse = server.get("/tracker/mandate-reference").await.json();
    let second: TrackerResponse = server.get("/tracker/mandate-reference").await.json();

    assert_eq!(first, second);
}

// =============================================================================
// AUTHENTICATION TESTS
// =============================================================================

#[tokio::test]
async fn test_auth_rejects_missing_key() {
    let server = create_authed_test_server("s3cret");

    let response = server.get("/stages").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: ErrorResponse = response.json();
    assert_eq!(body.error_kind, ErrorKind::Unauthorized);
}

#[tokio::test]
async fn test_auth_rejects_wrong_key() {
    let server = create_authed_test_server("s3cret");

    let response = server
        .get("/stages")
        .add_header(header::AUTHORIZATION, HeaderValue::from_static("Bearer nope"))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: ErrorResponse = response.json();
    assert_eq!(body.error_kind, ErrorKind::Unauthorized);
    assert!(!body.message.contains("s3cret"));
}

#[tokio::test]
async fn test_auth_accepts_bearer_key() {
    let server = create_authed_test_server("s3cret");

    let response = server
        .get("/tracker/approval")
        .add_header(header::AUTHORIZATION, HeaderValue::from_static("Bearer s3cret"))
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_auth_health_is_exempt() {
    let server = create_authed_test_server("s3cret");

    let response = server.get("/health").await;

    response.assert_status_ok();
}

// =============================================================================
// MIDDLEWARE TESTS
// =============================================================================

#[tokio::test]
async fn test_rate_limit_returns_429() {
    let mut config = AppConfig::default();
    config.server.rate_limit = 1;
    let server = create_test_server_with(config);

    server.get("/stages").await.assert_status_ok();
    let response = server.get("/stages").await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    let body: ErrorResponse = response.json();
    assert_eq!(body.error_kind, ErrorKind::RateLimited);
    let retry_after: u64 = response
        .header(header::RETRY_AFTER)
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!(retry_after >= 1);
}

#[tokio::test]
async fn test_router_oneshot_without_server() {
    let router = create_router(AppState::new(test_config()));

    let response = router
        .oneshot(
            Request::builder()
                .uri("/tracker/eligibility")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let server = create_test_server();

    let response = server.get("/loans").await;

    response.assert_status(StatusCode::NOT_FOUND);
}
