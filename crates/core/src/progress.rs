//! Progress aggregation over a project's milestones.
//!
//! Two progress figures coexist: the admin-declared percentage stored on
//! the project, and a derived percentage computed from milestone
//! completion. Callers choose a [`ProgressStrategy`]; the result carries
//! its provenance so the two are never mistaken for one another.
//!
//! Everything here recomputes from the ledger on each call. Nothing is
//! cached.

use serde::{Deserialize, Serialize};

use crate::milestone::{ConstructionStatus, Milestone};
use crate::project::Project;
use crate::types::Amount;

// ---------------------------------------------------------------------------
// Strategy and provenance-tagged value
// ---------------------------------------------------------------------------

/// Which progress figure a read should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStrategy {
    /// The project's admin-maintained percentage.
    Declared,
    /// Unweighted mean of milestone completion percentages.
    Derived,
}

impl ProgressStrategy {
    /// String value used in payloads and query parameters.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Declared => "declared",
            Self::Derived => "derived",
        }
    }

    /// Parse from a query-parameter value.
    pub fn from_str_value(value: &str) -> Option<Self> {
        match value {
            "declared" => Some(Self::Declared),
            "derived" => Some(Self::Derived),
            _ => None,
        }
    }
}

/// A progress percentage that remembers where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "source", content = "percent")]
pub enum Progress {
    Declared(u8),
    Derived(u8),
}

impl Progress {
    pub fn percent(self) -> u8 {
        match self {
            Self::Declared(pct) | Self::Derived(pct) => pct,
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Financial and physical rollup for one project.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummary {
    pub progress: Progress,
    pub total_paid: Amount,
    /// Sum of unpaid milestone amounts. A financial figure, not a payable
    /// one: pending milestones count even though they cannot be paid yet.
    pub total_remaining: Amount,
    pub milestones_completed: usize,
    pub milestones_in_progress: usize,
    pub milestones_pending: usize,
}

/// Unweighted mean of milestone completion percentages, rounded to the
/// nearest integer. An unrecorded percentage counts as 0; an empty ledger
/// reports 0.
pub fn derived_progress(milestones: &[Milestone]) -> u8 {
    if milestones.is_empty() {
        return 0;
    }
    let total: u32 = milestones
        .iter()
        .map(|m| u32::from(m.completion_pct.unwrap_or(0)))
        .sum();
    let mean = f64::from(total) / milestones.len() as f64;
    mean.round() as u8
}

/// Compute the rollup for a project under the chosen strategy.
pub fn project_summary(project: &Project, strategy: ProgressStrategy) -> ProjectSummary {
    let milestones = project.ledger.milestones();
    let progress = match strategy {
        ProgressStrategy::Declared => Progress::Declared(project.declared_progress),
        ProgressStrategy::Derived => Progress::Derived(derived_progress(milestones)),
    };
    let total_paid = project.ledger.total_paid();
    let total_remaining = project.ledger.total_scheduled() - total_paid;
    let count =
        |status: ConstructionStatus| milestones.iter().filter(|m| m.status == status).count();
    ProjectSummary {
        progress,
        total_paid,
        total_remaining,
        milestones_completed: count(ConstructionStatus::Completed),
        milestones_in_progress: count(ConstructionStatus::InProgress),
        milestones_pending: count(ConstructionStatus::Pending),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
