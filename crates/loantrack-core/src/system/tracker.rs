//! # Stage Progress Tracker
//!
//! Maps a loan's current [`Stage`] to the ordered list of stages a
//! dashboard shows, each tagged completed, current, or pending.
//!
//! ## Algorithm
//!
//! 1. Start from [`Stage::ALL`].
//! 2. Drop every stage a [`SuppressionRule`] hides for the current stage.
//! 3. Find the current stage in what is left.
//! 4. Earlier stages are completed, the current one is current, later
//!    ones are pending.
//!
//! Filtering never reorders. If the current stage is itself filtered out
//! there is no current index and every remaining stage is pending.
//!
//! The tracker is a pure function of its input: no I/O, no hidden state.

use super::Stage;
use serde::{Deserialize, Serialize};

// =============================================================================
// VISUAL STATE & INDICATOR
// =============================================================================

/// Classification of a displayed stage relative to the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisualState {
    Completed,
    Current,
    Pending,
}

impl VisualState {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            VisualState::Completed => "completed",
            VisualState::Current => "current",
            VisualState::Pending => "pending",
        }
    }
}

impl std::fmt::Display for VisualState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cosmetic marker attached to a displayed stage.
///
/// Not part of the correctness contract; renderers map it to colours and
/// icons through [`crate::render::Theme`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Indicator {
    Success,
    Failure,
    InProgress,
    Neutral,
}

impl Indicator {
    /// Derive the indicator for a stage in a given visual state.
    #[must_use]
    pub fn for_stage(stage: Stage, state: VisualState) -> Self {
        if state == VisualState::Pending {
            return Indicator::Neutral;
        }
        match stage {
            Stage::DisbursementProcessing => Indicator::InProgress,
            Stage::DisbursementFailure => Indicator::Failure,
            _ => Indicator::Success,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Indicator::Success => "success",
            Indicator::Failure => "failure",
            Indicator::InProgress => "in-progress",
            Indicator::Neutral => "neutral",
        }
    }
}

// =============================================================================
// SUPPRESSION RULES
// =============================================================================

/// A condition under which a stage is hidden, given the current stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuppressionRule {
    /// Processing is hidden once either disbursement outcome is reached.
    ProcessingSupersededByOutcome,
    /// A successful loan never shows the failure stage.
    FailureHiddenOnSuccess,
}

impl SuppressionRule {
    /// Rules applied by [`StageProgressTracker::new`].
    pub const DEFAULT: [SuppressionRule; 2] = [
        SuppressionRule::ProcessingSupersededByOutcome,
        SuppressionRule::FailureHiddenOnSuccess,
    ];

    /// Check whether this rule hides `candidate` when the loan is at `current`.
    #[must_use]
    pub fn suppresses(&self, current: Stage, candidate: Stage) -> bool {
        match self {
            SuppressionRule::ProcessingSupersededByOutcome => {
                current.is_terminal() && candidate == Stage::DisbursementProcessing
            }
            SuppressionRule::FailureHiddenOnSuccess => {
                current == Stage::DisbursementSuccessful
                    && candidate == Stage::DisbursementFailure
            }
        }
    }
}

// =============================================================================
// OUTPUT TYPES
// =============================================================================

/// One row of the rendered tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayStage {
    pub stage: Stage,
    pub label: String,
    pub state: VisualState,
    pub indicator: Indicator,
}

impl DisplayStage {
    fn new(stage: Stage, state: VisualState) -> Self {
        Self {
            stage,
            label: stage.label().to_string(),
            state,
            indicator: Indicator::for_stage(stage, state),
        }
    }
}

/// Where the loan ended up, as far as disbursement is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    InFlight,
    Disbursed,
    Failed,
}

impl Outcome {
    #[must_use]
    pub fn of(stage: Stage) -> Self {
        match stage {
            Stage::DisbursementSuccessful => Outcome::Disbursed,
            Stage::DisbursementFailure => Outcome::Failed,
            _ => Outcome::InFlight,
        }
    }
}

/// Full tracker result for a current stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerView {
    /// The stage the view was computed for.
    pub current: Stage,
    /// Index of `current` within `stages`, `None` if it was suppressed.
    pub current_index: Option<usize>,
    /// Displayed stages, in list order.
    pub stages: Vec<DisplayStage>,
}

impl TrackerView {
    /// Number of stages marked completed.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.stages
            .iter()
            .filter(|s| s.state == VisualState::Completed)
            .count()
    }

    /// Completion percentage over the displayed stages (integer only).
    ///
    /// The current stage counts as done once the loan is disbursed.
    #[must_use]
    pub fn percent_complete(&self) -> u8 {
        let total = self.stages.len();
        if total == 0 {
            return 0;
        }
        let mut done = self.completed_count();
        if self.outcome() == Outcome::Disbursed && self.current_index.is_some() {
            done = done.saturating_add(1);
        }
        ((done.saturating_mul(100) / total) as u8).min(100)
    }

    #[must_use]
    pub fn outcome(&self) -> Outcome {
        Outcome::of(self.current)
    }

    /// The displayed row for the current stage, if it survived filtering.
    #[must_use]
    pub fn current_row(&self) -> Option<&DisplayStage> {
        self.current_index.and_then(|i| self.stages.get(i))
    }
}

// =============================================================================
// TRACKER
// =============================================================================

/// Stage Progress Tracker - pure mapping from current stage to display list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageProgressTracker {
    rules: Vec<SuppressionRule>,
}

impl Default for StageProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StageProgressTracker {
    /// Create a tracker with the default suppression rules.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: SuppressionRule::DEFAULT.to_vec(),
        }
    }

    /// Create a tracker with a custom rule set.
    #[must_use]
    pub fn with_rules(rules: Vec<SuppressionRule>) -> Self {
        Self { rules }
    }

    /// Rules applied by this tracker.
    #[must_use]
    pub fn rules(&self) -> &[SuppressionRule] {
        &self.rules
    }

    /// Check whether `candidate` is hidden when the loan is at `current`.
    #[must_use]
    pub fn is_suppressed(&self, current: Stage, candidate: Stage) -> bool {
        self.rules.iter().any(|r| r.suppresses(current, candidate))
    }

    /// Stages left after applying the suppression rules, in list order.
    #[must_use]
    pub fn visible_stages(&self, current: Stage) -> Vec<Stage> {
        Stage::ALL
            .into_iter()
            .filter(|candidate| !self.is_suppressed(current, *candidate))
            .collect()
    }

    /// Compute the ordered display list for `current`.
    #[must_use]
    pub fn compute_display_stages(&self, current: Stage) -> Vec<DisplayStage> {
        self.view(current).stages
    }

    /// Compute the full view for `current`.
    #[must_use]
    pub fn view(&self, current: Stage) -> TrackerView {
        let visible = self.visible_stages(current);
        let current_index = visible.iter().position(|s| *s == current);

        let stages = visible
            .into_iter()
            .enumerate()
            .map(|(index, stage)| {
                let state = match current_index {
                    Some(ci) if index < ci => VisualState::Completed,
                    Some(ci) if index == ci => VisualState::Current,
                    _ => VisualState::Pending,
                };
                DisplayStage::new(stage, state)
            })
            .collect();

        TrackerView {
            current,
            current_index,
            stages,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
