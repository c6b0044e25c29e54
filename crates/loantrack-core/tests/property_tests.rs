//! # Property-Based Tests
//!
//! Ordering, uniqueness and determinism invariants of the tracker,
//! checked over arbitrary stages and rule sets.

use loantrack_core::{Stage, StageProgressTracker, SuppressionRule, VisualState};
use proptest::prelude::*;
use proptest::sample::{select, subsequence};

fn any_stage() -> impl Strategy<Value = Stage> {
    select(Stage::ALL.to_vec())
}

fn any_rules() -> impl Strategy<Value = Vec<SuppressionRule>> {
    subsequence(SuppressionRule::DEFAULT.to_vec(), 0..=SuppressionRule::DEFAULT.len())
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// The display list is a non-empty subsequence of the stage list.
    #[test]
    fn display_is_ordered_subsequence(current in any_stage(), rules in any_rules()) {
        let rows = StageProgressTracker::with_rules(rules).compute_display_stages(current);

        prop_assert!(!rows.is_empty());
        for pair in rows.windows(2) {
            prop_assert!(pair[0].stage < pair[1].stage);
        }
    }

    /// At most one stage is current.
    #[test]
    fn at_most_one_current(current in any_stage(), rules in any_rules()) {
        let rows = StageProgressTracker::with_rules(rules).compute_display_stages(current);
        let currents = rows.iter().filter(|r| r.state == VisualState::Current).count();

        prop_assert!(currents <= 1);
    }

    /// The known rules never hide the stage the loan is at.
    #[test]
    fn current_survives_filtering(current in any_stage(), rules in any_rules()) {
        let view = StageProgressTracker::with_rules(rules).view(current);
        let row = view.current_row();

        prop_assert!(row.is_some());
        prop_assert_eq!(row.map(|r| r.stage), Some(current));
        prop_assert_eq!(row.map(|r| r.state), Some(VisualState::Current));
    }

    /// States are completed, then current, then pending, without interleaving.
    #[test]
    fn states_are_partitioned_around_current(current in any_stage()) {
        let view = StageProgressTracker::new().view(current);
        let ci = view.current_index.unwrap_or(usize::MAX);

        for (i, row) in view.stages.iter().enumerate() {
            let expected = if i < ci {
                VisualState::Completed
            } else if i == ci {
                VisualState::Current
            } else {
                VisualState::Pending
            };
            prop_assert_eq!(row.state, expected);
        }
    }

    /// Two calls with the same stage produce equal output.
    #[test]
    fn determinism_identical_input_produces_identical_output(current in any_stage()) {
        let a = StageProgressTracker::new().view(current);
        let b = StageProgressTracker::new().view(current);

        prop_assert_eq!(a, b);
    }

    /// Suppression only ever applies once a disbursement outcome is reached.
    #[test]
    fn non_terminal_stages_show_full_list(current in any_stage()) {
        let rows = StageProgressTracker::new().compute_display_stages(current);

        if !current.is_terminal() {
            prop_assert_eq!(rows.len(), Stage::COUNT);
        } else {
            prop_assert!(rows.len() < Stage::COUNT);
        }
    }

    /// Percent complete stays within 0..=100.
    #[test]
    fn percent_is_bounded(current in any_stage()) {
        let view = StageProgressTracker::new().view(current);
        prop_assert!(view.percent_complete() <= 100);
    }
}
