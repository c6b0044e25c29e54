//! # Loan Stages
//!
//! The fixed, totally ordered sequence of steps a loan moves through.
//!
//! | # | Identifier | Label |
//! |---|------------|-------|
//! | 0 | `eligibility` | Eligibility |
//! | 1 | `principal-amount-selection` | Principal Amount |
//! | 2 | `tenure-selection` | Tenure |
//! | 3 | `approval` | Approval |
//! | 4 | `confirmation` | Confirmation |
//! | 5 | `mandate-reference` | Mandate Reference |
//! | 6 | `disbursement-processing` | Disbursement Processing |
//! | 7 | `disbursement-failure` | Disbursement Failed |
//! | 8 | `disbursement-successful` | Disbursed |
//!
//! ## Ordering
//!
//! Declaration order is the stage order, so `Ord` on [`Stage`] is the
//! earlier/later relation. `disbursement-failure` sits before
//! `disbursement-successful`; the two outcomes are not a progression, but
//! the raw order is preserved.

use crate::TrackerError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// =============================================================================
// STAGE ENUM
// =============================================================================

/// One step of the loan workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    /// Borrower eligibility check.
    Eligibility,
    /// Borrower picks the principal amount.
    PrincipalAmountSelection,
    /// Borrower picks the repayment tenure.
    TenureSelection,
    /// Lender approval.
    Approval,
    /// Borrower confirms the offer.
    Confirmation,
    /// Repayment mandate reference is set up.
    MandateReference,
    /// Funds are being disbursed.
    DisbursementProcessing,
    /// Disbursement failed.
    DisbursementFailure,
    /// Disbursement succeeded.
    DisbursementSuccessful,
}

impl Stage {
    /// The complete stage list, in order.
    pub const ALL: [Stage; 9] = [
        Stage::Eligibility,
        Stage::PrincipalAmountSelection,
        Stage::TenureSelection,
        Stage::Approval,
        Stage::Confirmation,
        Stage::MandateReference,
        Stage::DisbursementProcessing,
        Stage::DisbursementFailure,
        Stage::DisbursementSuccessful,
    ];

    /// Number of stages in the list.
    pub const COUNT: usize = Self::ALL.len();

    /// Canonical kebab-case identifier.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Eligibility => "eligibility",
            Stage::PrincipalAmountSelection => "principal-amount-selection",
            Stage::TenureSelection => "tenure-selection",
            Stage::Approval => "approval",
            Stage::Confirmation => "confirmation",
            Stage::MandateReference => "mandate-reference",
            Stage::DisbursementProcessing => "disbursement-processing",
            Stage::DisbursementFailure => "disbursement-failure",
            Stage::DisbursementSuccessful => "disbursement-successful",
        }
    }

    /// Human-readable label for display.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Eligibility => "Eligibility",
            Stage::PrincipalAmountSelection => "Principal Amount",
            Stage::TenureSelection => "Tenure",
            Stage::Approval => "Approval",
            Stage::Confirmation => "Confirmation",
            Stage::MandateReference => "Mandate Reference",
            Stage::DisbursementProcessing => "Disbursement Processing",
            Stage::DisbursementFailure => "Disbursement Failed",
            Stage::DisbursementSuccessful => "Disbursed",
        }
    }

    /// Zero-based position in [`Stage::ALL`].
    #[must_use]
    pub fn position(&self) -> usize {
        *self as usize
    }

    /// Get the next stage in raw list order, if any.
    #[must_use]
    pub fn next(&self) -> Option<Stage> {
        Self::ALL.get(self.position().saturating_add(1)).copied()
    }

    /// Get the previous stage in raw list order, if any.
    #[must_use]
    pub fn previous(&self) -> Option<Stage> {
        self.position()
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// Check if this stage is a disbursement outcome (failure or success).
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Stage::DisbursementFailure | Stage::DisbursementSuccessful
        )
    }

    /// Check if this stage belongs to the disbursement phase.
    #[must_use]
    pub fn is_disbursement(&self) -> bool {
        matches!(
            self,
            Stage::DisbursementProcessing
                | Stage::DisbursementFailure
                | Stage::DisbursementSuccessful
        )
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a stage identifier.
///
/// Whitespace is trimmed, case is ignored, and `_` is read as `-`, so
/// `DISBURSEMENT_SUCCESSFUL` parses. Anything else is rejected with
/// [`TrackerError::UnrecognizedStage`].
impl FromStr for Stage {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");

        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str() == normalized)
            .ok_or_else(|| TrackerError::UnrecognizedStage(s.to_string()))
    }
}

// =============================================================================
// TESTS
// =============================================================================
