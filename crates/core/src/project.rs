//! Project aggregate: one VEFA property purchase and its milestone ledger.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::ledger::MilestoneLedger;
use crate::milestone::NewMilestone;
use crate::types::{Amount, CalendarDate, ProjectId};

// ---------------------------------------------------------------------------
// Validation constants
// ---------------------------------------------------------------------------

/// Maximum length for a project name (characters).
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length for a project location (characters).
pub const MAX_LOCATION_LENGTH: usize = 200;

/// Declared progress is a percentage, `0..=MAX_DECLARED_PROGRESS`.
pub const MAX_DECLARED_PROGRESS: u8 = 100;

// ---------------------------------------------------------------------------
// Property type
// ---------------------------------------------------------------------------

/// Kind of property sold off-plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Apartment,
    Villa,
    Duplex,
    Studio,
    Office,
}

impl PropertyType {
    /// String value used in payloads and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Apartment => "apartment",
            Self::Villa => "villa",
            Self::Duplex => "duplex",
            Self::Studio => "studio",
            Self::Office => "office",
        }
    }
}

// ---------------------------------------------------------------------------
// Entity and input types
// ---------------------------------------------------------------------------

/// Input for creating a project (admin action or seed data).
#[derive(Debug, Clone, Deserialize)]
pub struct NewProject {
    pub name: String,
    pub location: String,
    pub property_type: PropertyType,
    pub total_price: Amount,
    #[serde(default)]
    pub declared_progress: u8,
    pub start_date: CalendarDate,
    pub expected_completion: CalendarDate,
    #[serde(default)]
    pub milestones: Vec<NewMilestone>,
}

/// One off-plan purchase: contract terms plus the owned milestone ledger.
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub location: String,
    pub property_type: PropertyType,
    /// Contracted sale price in raw XOF. Compared against the milestone
    /// schedule via [`Project::schedule_drift`], never reconciled.
    pub total_price: Amount,
    /// Admin-maintained overall progress percentage, 0-100. The source
    /// behind the `declared` strategy.
    pub declared_progress: u8,
    pub start_date: CalendarDate,
    pub expected_completion: CalendarDate,
    #[serde(rename = "milestones")]
    pub ledger: MilestoneLedger,
}

impl Project {
    /// Create a project with its payment schedule. Milestone positions
    /// follow input order.
    pub fn create(input: NewProject) -> Result<Self, CoreError> {
        if input.name.trim().is_empty() {
            return Err(CoreError::Validation(
                "Project name must not be empty".to_string(),
            ));
        }
        if input.name.len() > MAX_NAME_LENGTH {
            return Err(CoreError::Validation(format!(
                "Project name exceeds maximum length of {MAX_NAME_LENGTH} characters (got {})",
                input.name.len()
            )));
        }
        if input.location.trim().is_empty() {
            return Err(CoreError::Validation(
                "Project location must not be empty".to_string(),
            ));
        }
        if input.location.len() > MAX_LOCATION_LENGTH {
            return Err(CoreError::Validation(format!(
                "Project location exceeds maximum length of {MAX_LOCATION_LENGTH} characters (got {})",
                input.location.len()
            )));
        }
        if input.total_price < 0 {
            return Err(CoreError::Validation(format!(
                "Project total price must not be negative, got {}",
                input.total_price
            )));
        }
        validate_declared_progress(input.declared_progress)?;
        if input.expected_completion < input.start_date {
            return Err(CoreError::Validation(format!(
                "Expected completion date {} falls before the start date {}",
                input.expected_completion, input.start_date
            )));
        }

        Ok(Self {
            id: Uuid::now_v7(),
            name: input.name,
            location: input.location,
            property_type: input.property_type,
            total_price: input.total_price,
            declared_progress: input.declared_progress,
            start_date: input.start_date,
            expected_completion: input.expected_completion,
            ledger: MilestoneLedger::new(input.milestones)?,
        })
    }

    /// Difference between the contracted price and the scheduled milestone
    /// total. Zero when the schedule covers the price exactly. Non-zero is
    /// legal; callers decide whether to surface it.
    pub fn schedule_drift(&self) -> Amount {
        self.total_price - self.ledger.total_scheduled()
    }

    /// Update the admin-maintained progress percentage.
    pub fn set_declared_progress(&mut self, pct: u8) -> Result<(), CoreError> {
        validate_declared_progress(pct)?;
        self.declared_progress = pct;
        Ok(())
    }
}

fn validate_declared_progress(pct: u8) -> Result<(), CoreError> {
    if pct > MAX_DECLARED_PROGRESS {
        return Err(CoreError::Validation(format!(
            "Declared progress must be between 0 and {MAX_DECLARED_PROGRESS}, got {pct}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
