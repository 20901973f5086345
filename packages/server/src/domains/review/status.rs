//! Review lifecycle states and the explicit transition table.
//!
//! Every retailer application and submitted deal carries one of these
//! statuses. Transitions are validated here rather than implied by whichever
//! UPDATE happens to run, so double-approves and review reversals are
//! deliberate decisions with tests, not accidents.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::common::validation::ValidationErrors;

/// Review status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    /// Allowed transitions:
    /// - pending -> approved, pending -> rejected
    /// - approved -> rejected, rejected -> approved (re-review is permitted)
    ///
    /// Re-applying the current status is not a transition; callers treat it
    /// as an idempotent no-op.
    pub fn can_transition(self, to: ReviewStatus) -> bool {
        use ReviewStatus::*;
        matches!(
            (self, to),
            (Pending, Approved) | (Pending, Rejected) | (Approved, Rejected) | (Rejected, Approved)
        )
    }

    pub fn ensure_transition(self, to: ReviewStatus) -> Result<(), ApprovalError> {
        if self.can_transition(to) {
            Ok(())
        } else {
            Err(ApprovalError::InvalidTransition { from: self, to })
        }
    }
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewStatus::Pending => write!(f, "pending"),
            ReviewStatus::Approved => write!(f, "approved"),
            ReviewStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for ReviewStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(ReviewStatus::Pending),
            "approved" => Ok(ReviewStatus::Approved),
            "rejected" => Ok(ReviewStatus::Rejected),
            _ => Err(anyhow::anyhow!("Invalid review status: {}", s)),
        }
    }
}

/// Errors surfaced by the approval workflow.
///
/// Storage errors keep their full detail for server-side logging; the HTTP
/// layer maps them to a generic message.
#[derive(Debug, Error)]
pub enum ApprovalError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Admin access required")]
    Unauthorized,

    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition { from: ReviewStatus, to: ReviewStatus },

    #[error("Validation failed")]
    ValidationFailed { errors: ValidationErrors },

    #[error("Storage operation failed")]
    Persistence(#[from] anyhow::Error),
}

impl ApprovalError {
    /// Single-field validation failure.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::default();
        errors.add(field, message);
        ApprovalError::ValidationFailed { errors }
    }
}
