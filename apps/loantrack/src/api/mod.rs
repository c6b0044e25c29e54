//! # loantrack HTTP API Module
//!
//! This module implements the HTTP JSON API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /stages` - The ordered stage list
//! - `GET /tracker/{stage}` - Tracker view for a stage (`?theme=dark` optional)
//! - `POST /tracker` - Tracker view for `{"stage": "...", "theme": "..."}`
//!
//! Failures return `{"error_kind": "...", "message": "..."}`; clients
//! branch on `error_kind`. That covers handler errors, undecodable request
//! bodies (`invalid_request`), rejected API keys (`unauthorized`) and
//! throttled requests (`rate_limited`, with a `Retry-After` header).
//!
//! ## Security Configuration
//!
//! Taken from [`crate::config::ServerConfig`]:
//! - `cors_origins`: allowed origins, or `["*"]` for all (default: localhost only)
//! - `rate_limit`: requests per second (default: 100, 0 to disable)
//! - `api_key`: if set, requires Bearer token authentication

mod guards;
mod handlers;
mod types;

pub use guards::Throttle;
// Re-export handlers and types for integration tests (via `loantrack::api::*`)
pub use handlers::{health_handler, stages_handler, tracker_body_handler, tracker_path_handler};
pub use types::{
    ApiError, ErrorResponse, HealthResponse, StageInfo, StageRow, StagesResponse, TrackQuery,
    TrackRequest, TrackerResponse,
};

use crate::config::AppConfig;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use loantrack_core::{StageProgressTracker, Theme, TrackerError};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state, built once at startup and never mutated.
#[derive(Clone)]
pub struct AppState {
    /// The tracker every request runs through.
    pub tracker: Arc<StageProgressTracker>,
    /// Effective configuration.
    pub config: Arc<AppConfig>,
    /// Request budget from `server.rate_limit`; `None` when disabled.
    pub throttle: Option<Arc<Throttle>>,
}

impl AppState {
    /// Create app state from a configuration.
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let throttle = Throttle::per_second(config.server.rate_limit).map(Arc::new);
        Self {
            tracker: Arc::new(StageProgressTracker::new()),
            config: Arc::new(config),
            throttle,
        }
    }

    /// Default theme for responses.
    #[must_use]
    pub fn theme(&self) -> Theme {
        self.config.display.theme
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build CORS layer from the configured origins.
///
/// - `["*"]`: allows all origins (development mode)
/// - empty: localhost only
/// - otherwise: the listed origins; invalid entries are skipped
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS: Allowing ALL origins. This is insecure for production!");
        return CorsLayer::permissive();
    }

    if origins.is_empty() {
        tracing::info!("CORS: No origins configured, defaulting to localhost only");
        return build_localhost_cors();
    }

    let allowed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(hv) => {
                tracing::info!("CORS: Allowing origin: {}", origin);
                Some(hv)
            }
            Err(e) => {
                tracing::warn!("CORS: Invalid origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    if allowed_origins.is_empty() {
        tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
        build_localhost_cors()
    } else {
        CorsLayer::new()
            .allow_origin(allowed_origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:5173",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:5173",
    ]
    .into_iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
/// 4. Throttle (no-op when `rate_limit = 0`)
/// 5. API key (no-op when no key is configured)
pub fn create_router(state: AppState) -> Router {
    let server = &state.config.server;
    let cors = build_cors_layer(&server.cors_origins);

    match state.throttle.as_deref() {
        Some(throttle) => {
            tracing::info!("Rate limiting enabled: {} requests/second", throttle.limit());
        }
        None => tracing::info!("Rate limiting disabled"),
    }

    if server.api_key.is_some() {
        tracing::info!("API key authentication enabled");
    } else {
        tracing::warn!(
            "API key authentication DISABLED - all endpoints are publicly accessible! \
             Set LOANTRACK_API_KEY to enable authentication."
        );
    }

    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/stages", get(handlers::stages_handler))
        .route("/tracker", post(handlers::tracker_body_handler))
        .route("/tracker/{stage}", get(handlers::tracker_path_handler))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            guards::api_key_guard,
        ))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            guards::throttle_guard,
        ))
        .layer(axum::extract::DefaultBodyLimit::max(16 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server; returns after Ctrl+C.
pub async fn run_server(state: AppState) -> Result<(), TrackerError> {
    let addr = state.config.server.addr();
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| TrackerError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("loantrack HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| TrackerError::IoError(format!("Server error: {}", e)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}
