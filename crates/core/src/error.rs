use std::fmt;

use crate::types::{MilestoneId, ProjectId};

/// Reason a milestone cannot accept a payment right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotPayableReason {
    /// The milestone carries no payment obligation (amount is zero, e.g. a
    /// final delivery milestone). Such milestones are never payable.
    ZeroAmount,
    /// Construction has not started; pending milestones cannot be paid.
    NotStarted,
}

impl fmt::Display for NotPayableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroAmount => write!(f, "the milestone carries no payment obligation"),
            Self::NotStarted => write!(f, "construction has not started"),
        }
    }
}

/// Domain errors for the VEFA tracking core.
///
/// Every variant is a recoverable, user-correctable condition; operations
/// return these rather than panicking, and callers branch explicitly.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Project not found: {id}")]
    ProjectNotFound { id: ProjectId },

    #[error("Milestone not found: {id}")]
    MilestoneNotFound { id: MilestoneId },

    #[error("Milestone {id} is already paid")]
    AlreadyPaid { id: MilestoneId },

    #[error("Milestone {id} is not payable: {reason}")]
    NotPayable {
        id: MilestoneId,
        reason: NotPayableReason,
    },

    #[error("Bank transfer payments require an attached proof document")]
    MissingProof,

    #[error("Invalid proof file type: '{name}' (only PDF documents are accepted)")]
    InvalidFileType { name: String },

    #[error("Validation failed: {0}")]
    Validation(String),
}
