//! # Request Guards
//!
//! Admission checks that run before any handler: the global request
//! throttle (`server.rate_limit`) and the bearer-key check
//! (`LOANTRACK_API_KEY`). Both read their settings from [`AppState`] and
//! reject with an [`ApiError`], so every refusal carries the same
//! `{"error_kind", "message"}` body as a handler failure.
//!
//! ```text
//! Authorization: Bearer <your-api-key>
//! ```

use super::{AppState, types::ApiError};
use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use governor::{
    DefaultDirectRateLimiter, Quota, RateLimiter,
    clock::{Clock, DefaultClock},
};
use loantrack_core::TrackerError;
use std::num::NonZeroU32;
use std::time::Duration;
use subtle::ConstantTimeEq;

/// Path that stays reachable without a key, for load balancer checks.
const HEALTH_PATH: &str = "/health";

// =============================================================================
// THROTTLE
// =============================================================================

/// Process-wide request budget shared by every route.
#[derive(Debug)]
pub struct Throttle {
    limiter: DefaultDirectRateLimiter,
    clock: DefaultClock,
    per_second: NonZeroU32,
}

impl Throttle {
    /// Budget of `requests_per_second`; `None` when the limit is 0 (disabled).
    #[must_use]
    pub fn per_second(requests_per_second: u32) -> Option<Self> {
        let per_second = NonZeroU32::new(requests_per_second)?;
        let clock = DefaultClock::default();
        let limiter = RateLimiter::direct_with_clock(Quota::per_second(per_second), clock.clone());
        Some(Self {
            limiter,
            clock,
            per_second,
        })
    }

    /// Configured requests per second.
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.per_second.get()
    }

    /// Take one request from the budget.
    ///
    /// When the budget is spent the error carries the wait, rounded up to
    /// whole seconds and never below one.
    pub fn admit(&self) -> Result<(), TrackerError> {
        self.limiter.check().map_err(|not_until| {
            let wait = not_until.wait_time_from(self.clock.now());
            TrackerError::RateLimited {
                retry_after_secs: whole_seconds_up(wait),
            }
        })
    }
}

fn whole_seconds_up(wait: Duration) -> u64 {
    let secs = wait
        .as_secs()
        .saturating_add(u64::from(wait.subsec_nanos() > 0));
    secs.max(1)
}

/// Reject the request with `rate_limited` once the throttle is exhausted.
pub async fn throttle_guard(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(throttle) = state.throttle.as_deref() {
        throttle.admit().inspect_err(|e| {
            tracing::warn!(
                event = "rate_limited",
                error_kind = %e.kind(),
                path = %request.uri().path(),
                "Rejected request: {}",
                e
            );
        })?;
    }
    Ok(next.run(request).await)
}

// =============================================================================
// API KEY
// =============================================================================

/// Compare a provided key with the expected one in constant time.
///
/// Both keys are padded to the same length so the comparison always
/// covers the same number of bytes.
pub fn keys_match(provided: &str, expected: &str) -> bool {
    let provided_bytes = provided.as_bytes();
    let expected_bytes = expected.as_bytes();

    let max_len = provided_bytes.len().max(expected_bytes.len());
    let mut padded_provided = vec![0u8; max_len];
    let mut padded_expected = vec![0u8; max_len];
    padded_provided[..provided_bytes.len()].copy_from_slice(provided_bytes);
    padded_expected[..expected_bytes.len()].copy_from_slice(expected_bytes);

    let bytes_match: bool = padded_provided.ct_eq(&padded_expected).into();
    bytes_match && provided_bytes.len() == expected_bytes.len()
}

/// Check a raw `Authorization` header value against the expected key.
///
/// `Bearer <key>` and a bare `<key>` are both accepted.
fn check_credentials(header_value: Option<&str>, expected: &str) -> Result<(), TrackerError> {
    let Some(value) = header_value else {
        return Err(TrackerError::Unauthorized(
            "missing Authorization header".to_string(),
        ));
    };
    let provided = value.strip_prefix("Bearer ").unwrap_or(value);
    if keys_match(provided, expected) {
        Ok(())
    } else {
        Err(TrackerError::Unauthorized("invalid API key".to_string()))
    }
}

/// Require the configured API key on every path except `/health`.
///
/// A no-op when no key is configured.
pub async fn api_key_guard(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = state.config.server.api_key.as_deref() else {
        return Ok(next.run(request).await);
    };
    if request.uri().path() == HEALTH_PATH {
        return Ok(next.run(request).await);
    }

    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    check_credentials(header_value, expected).inspect_err(|e| {
        tracing::warn!(event = "auth_failure", error_kind = %e.kind(), "{}", e);
    })?;

    Ok(next.run(request).await)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_limit_disables_throttle() {
        assert!(Throttle::per_second(0).is_none());
    }

    #[test]
    fn burst_is_bounded() {
        let throttle = Throttle::per_second(2).expect("enabled");
        assert_eq!(throttle.limit(), 2);
        assert!(throttle.admit().is_ok());
        assert!(throttle.admit().is_ok());
        assert!(matches!(
            throttle.admit(),
            Err(TrackerError::RateLimited { retry_after_secs }) if retry_after_secs >= 1
        ));
    }

    #[test]
    fn wait_rounds_up_to_whole_seconds() {
        assert_eq!(whole_seconds_up(Duration::ZERO), 1);
        assert_eq!(whole_seconds_up(Duration::from_millis(300)), 1);
        assert_eq!(whole_seconds_up(Duration::from_secs(2)), 2);
        assert_eq!(whole_seconds_up(Duration::from_millis(2001)), 3);
    }

    #[test]
    fn equal_keys_match() {
        assert!(keys_match("s3cret", "s3cret"));
    }

    #[test]
    fn prefix_does_not_match() {
        assert!(!keys_match("s3c", "s3cret"));
        assert!(!keys_match("s3cret-and-more", "s3cret"));
    }

    #[test]
    fn credentials_accept_bearer_and_bare_key() {
        assert!(check_credentials(Some("Bearer s3cret"), "s3cret").is_ok());
        assert!(check_credentials(Some("s3cret"), "s3cret").is_ok());
    }

    #[test]
    fn credentials_reject_missing_and_empty() {
        for header_value in [None, Some(""), Some("Bearer ")] {
            assert!(matches!(
                check_credentials(header_value, "s3cret"),
                Err(TrackerError::Unauthorized(_))
            ));
        }
    }
}
