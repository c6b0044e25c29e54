//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.

use super::{
    AppState,
    types::{
        ApiError, HealthResponse, StagesResponse, TrackQuery, TrackRequest, TrackerResponse,
    },
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    response::IntoResponse,
};
use loantrack_core::{Stage, Theme, TrackerError};

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// STAGES HANDLER
// =============================================================================

/// List every stage in order.
pub async fn stages_handler() -> impl IntoResponse {
    Json(StagesResponse::default())
}

// =============================================================================
// TRACKER HANDLERS
// =============================================================================

/// Compute the tracker for a stage given in the path.
pub async fn tracker_path_handler(
    State(state): State<AppState>,
    Path(stage): Path<String>,
    query: Result<Query<TrackQuery>, QueryRejection>,
) -> Result<Json<TrackerResponse>, ApiError> {
    let Query(query) = query.map_err(|e| invalid_request(e.body_text()))?;
    track(&state, &stage, query.theme.as_deref()).map(Json)
}

/// Compute the tracker for a stage given in the JSON body.
pub async fn tracker_body_handler(
    State(state): State<AppState>,
    request: Result<Json<TrackRequest>, JsonRejection>,
) -> Result<Json<TrackerResponse>, ApiError> {
    let Json(request) = request.map_err(|e| invalid_request(e.body_text()))?;
    track(&state, &request.stage, request.theme.as_deref()).map(Json)
}

/// Extractor rejections become `invalid_request` instead of axum's plain-text body.
fn invalid_request(detail: String) -> ApiError {
    let err = TrackerError::InvalidRequest(detail);
    tracing::warn!(event = "invalid_request", error_kind = %err.kind(), "{}", err);
    ApiError(err)
}

/// Parse the boundary input and run the tracker.
fn track(
    state: &AppState,
    stage: &str,
    theme: Option<&str>,
) -> Result<TrackerResponse, ApiError> {
    let stage: Stage = stage.parse().inspect_err(|e: &TrackerError| {
        tracing::warn!(
            event = "unrecognized_stage",
            error_kind = %e.kind(),
            "Rejected tracker request: {}",
            e
        );
    })?;

    let theme = match theme {
        Some(t) => t.parse::<Theme>().inspect_err(|e: &TrackerError| {
            tracing::warn!(event = "invalid_theme", error_kind = %e.kind(), "{}", e);
        })?,
        None => state.theme(),
    };

    let view = state.tracker.view(stage);
    tracing::debug!(
        stage = %stage,
        shown = view.stages.len(),
        current_index = ?view.current_index,
        "Computed tracker view"
    );

    Ok(TrackerResponse::from_view(&view, theme))
}
