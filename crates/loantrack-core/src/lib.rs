//! # loantrack-core
//!
//! The deterministic loan stage tracker - THE TRACKER.
//!
//! A loan moves through a fixed, ordered list of stages, from eligibility
//! to disbursement. Given the stage a loan is at, this crate computes the
//! list a dashboard should display: which stages are completed, which one
//! is current, which are pending, and which are hidden because a
//! disbursement outcome superseded them.
//!
//! ## Architectural Constraints
//!
//! - Pure: no async, no network, no I/O
//! - Closed: stages and suppression rules are fixed enumerations
//! - Deterministic: same input, structurally equal output
//! - Integer arithmetic only
//!
//! ## Example
//!
//! ```
//! use loantrack_core::{Stage, StageProgressTracker, VisualState};
//!
//! let tracker = StageProgressTracker::new();
//! let rows = tracker.compute_display_stages(Stage::DisbursementSuccessful);
//!
//! assert_eq!(rows.len(), 7);
//! assert_eq!(rows.last().map(|r| r.state), Some(VisualState::Current));
//! ```

// =============================================================================
// MODULES
// =============================================================================

pub mod render;
pub mod system;
pub mod types;

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use render::{Swatch, Theme};
pub use system::{
    DisplayStage, Indicator, Outcome, Stage, StageProgressTracker, SuppressionRule, TrackerView,
    VisualState,
};
pub use types::{ErrorKind, TrackerError};
