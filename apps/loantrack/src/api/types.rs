//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use loantrack_core::{
    ErrorKind, Indicator, Outcome, Stage, Theme, TrackerError, TrackerView, VisualState,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// STAGES RESPONSE
// =============================================================================

/// One entry of the stage list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageInfo {
    pub stage: Stage,
    pub label: String,
    pub position: usize,
    pub terminal: bool,
}

impl From<Stage> for StageInfo {
    fn from(stage: Stage) -> Self {
        Self {
            stage,
            label: stage.label().to_string(),
            position: stage.position(),
            terminal: stage.is_terminal(),
        }
    }
}

/// The complete, ordered stage list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagesResponse {
    pub stages: Vec<StageInfo>,
}

impl Default for StagesResponse {
    fn default() -> Self {
        Self {
            stages: Stage::ALL.into_iter().map(StageInfo::from).collect(),
        }
    }
}

// =============================================================================
// TRACKER REQUEST/RESPONSE
// =============================================================================

/// Tracker request body.
///
/// `stage` stays a string here so an unknown value is reported as
/// `unrecognized_stage` rather than a generic JSON rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackRequest {
    pub stage: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

/// Optional query parameters for `GET /tracker/{stage}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackQuery {
    pub theme: Option<String>,
}

/// One displayed row, with presentation tokens for the chosen theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRow {
    pub stage: Stage,
    pub label: String,
    pub state: VisualState,
    pub indicator: Indicator,
    pub color: String,
    pub icon: String,
}

/// Tracker response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerResponse {
    pub current: Stage,
    pub current_index: Option<usize>,
    pub outcome: Outcome,
    pub percent_complete: u8,
    pub theme: Theme,
    pub stages: Vec<StageRow>,
}

impl TrackerResponse {
    /// Build a response from a computed view.
    #[must_use]
    pub fn from_view(view: &TrackerView, theme: Theme) -> Self {
        let stages = view
            .stages
            .iter()
            .map(|row| {
                let swatch = theme.swatch(row.indicator);
                StageRow {
                    stage: row.stage,
                    label: row.label.clone(),
                    state: row.state,
                    indicator: row.indicator,
                    color: swatch.color.to_string(),
                    icon: swatch.icon.to_string(),
                }
            })
            .collect();

        Self {
            current: view.current,
            current_index: view.current_index,
            outcome: view.outcome(),
            percent_complete: view.percent_complete(),
            theme,
            stages,
        }
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error_kind: ErrorKind,
    pub message: String,
}

impl From<&TrackerError> for ErrorResponse {
    fn from(err: &TrackerError) -> Self {
        Self {
            error_kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// A [`TrackerError`] rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub TrackerError);

impl ApiError {
    /// HTTP status for the wrapped error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self.0.kind() {
            ErrorKind::UnrecognizedStage
            | ErrorKind::InvalidTheme
            | ErrorKind::InvalidRequest
            | ErrorKind::Config => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ErrorKind::Io => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TrackerError> for ApiError {
    fn from(err: TrackerError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.status(), Json(ErrorResponse::from(&self.0))).into_response();
        if let TrackerError::RateLimited { retry_after_secs } = self.0 {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
        }
        response
    }
}
