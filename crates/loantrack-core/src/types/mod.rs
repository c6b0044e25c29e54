//! # Core Type Definitions
//!
//! Error types shared by the tracker and every boundary that feeds it:
//! - `TrackerError`: the single error enum of the workspace
//! - `ErrorKind`: the closed, machine-readable classification of an error
//!
//! Callers branch on [`ErrorKind`], never on the human-readable message.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// ERROR KIND
// =============================================================================

/// Closed classification of a [`TrackerError`].
///
/// This is what API clients receive as `error_kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A stage identifier outside the fixed stage list.
    UnrecognizedStage,
    /// Invalid or unreadable configuration.
    Config,
    /// Underlying I/O failure (bind, read, write).
    Io,
    /// A theme name other than `light` or `dark`.
    InvalidTheme,
    /// Malformed request: not JSON, missing or mistyped fields.
    InvalidRequest,
    /// Missing or wrong API key.
    Unauthorized,
    /// Request rejected by the rate limiter.
    RateLimited,
}

impl ErrorKind {
    /// Stable identifier, identical to the serialized form.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnrecognizedStage => "unrecognized_stage",
            ErrorKind::Config => "config",
            ErrorKind::Io => "io",
            ErrorKind::InvalidTheme => "invalid_theme",
            ErrorKind::InvalidRequest => "invalid_request",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::RateLimited => "rate_limited",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// ERROR TYPE
// =============================================================================

/// Errors that can occur in loantrack operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    /// The supplied stage identifier is not one of the known stages.
    #[error("Unrecognized stage: {0:?}")]
    UnrecognizedStage(String),

    /// Configuration could not be parsed or holds an invalid value.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),

    /// The requested theme is not one of the known themes.
    #[error("Unknown theme {0:?} (expected light or dark)")]
    InvalidTheme(String),

    /// The request could not be decoded.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The request carried no API key or the wrong one.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Too many requests; retry after the given number of seconds.
    #[error("Rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
}

impl TrackerError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            TrackerError::UnrecognizedStage(_) => ErrorKind::UnrecognizedStage,
            TrackerError::ConfigError(_) => ErrorKind::Config,
            TrackerError::IoError(_) => ErrorKind::Io,
            TrackerError::InvalidTheme(_) => ErrorKind::InvalidTheme,
            TrackerError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            TrackerError::Unauthorized(_) => ErrorKind::Unauthorized,
            TrackerError::RateLimited { .. } => ErrorKind::RateLimited,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
