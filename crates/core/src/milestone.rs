//! Milestone entity, construction status machine, and guarded mutations.
//!
//! A milestone is a discrete construction phase with its own completion
//! state and payment obligation. Construction status only ever moves
//! forward; the payment obligation flips from unpaid to paid exactly once,
//! and only through the ledger's payment submission path.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, NotPayableReason};
use crate::proof::{self, Proof, ProofKind};
use crate::types::{Amount, CalendarDate, MilestoneId, Timestamp};

// ---------------------------------------------------------------------------
// Validation constants
// ---------------------------------------------------------------------------

/// Maximum length for a milestone title (characters).
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum length for a milestone description (characters).
pub const MAX_DESCRIPTION_LENGTH: usize = 2_000;

/// Completion percentages are clamped to `0..=MAX_COMPLETION_PCT`.
pub const MAX_COMPLETION_PCT: u8 = 100;

// ---------------------------------------------------------------------------
// Status enums
// ---------------------------------------------------------------------------

/// Construction phase status. Advances monotonically; never regresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructionStatus {
    Pending,
    InProgress,
    Completed,
}

impl ConstructionStatus {
    /// String value used in payloads and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Statuses this one may advance to.
    ///
    /// The invariant is non-decreasing order, not single-stepping: a
    /// milestone may go straight from pending to completed.
    pub fn valid_transitions(self) -> &'static [ConstructionStatus] {
        match self {
            Self::Pending => &[Self::InProgress, Self::Completed],
            Self::InProgress => &[Self::Completed],
            Self::Completed => &[],
        }
    }
}

/// Validate a construction status change.
///
/// Setting the current status again is an idempotent `Ok`; any backward
/// move is rejected.
pub fn validate_status_transition(
    current: ConstructionStatus,
    next: ConstructionStatus,
) -> Result<(), CoreError> {
    if next == current {
        return Ok(());
    }
    if current.valid_transitions().contains(&next) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Cannot move milestone status from '{}' to '{}': status never regresses",
            current.as_str(),
            next.as_str()
        )))
    }
}

/// Payment state of a milestone's obligation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
}

impl PaymentStatus {
    /// String value used in payloads and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Paid => "paid",
        }
    }
}

// ---------------------------------------------------------------------------
// Entity and input types
// ---------------------------------------------------------------------------

/// Input for creating a milestone (admin action or seed data).
#[derive(Debug, Clone, Deserialize)]
pub struct NewMilestone {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub amount: Amount,
    pub start_date: Option<CalendarDate>,
    pub end_date: Option<CalendarDate>,
}

/// Partial update for a milestone (admin editor). `None` fields are left
/// unchanged.
///
/// An amount change is the "annuity edit" from the admin view; it is only
/// accepted while the milestone is unpaid because a paid amount is a fixed
/// financial fact.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MilestoneUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub amount: Option<Amount>,
    pub start_date: Option<CalendarDate>,
    pub end_date: Option<CalendarDate>,
    pub completion_pct: Option<u8>,
}

/// A discrete construction phase with its own completion state and payment
/// obligation.
#[derive(Debug, Clone, Serialize)]
pub struct Milestone {
    pub id: MilestoneId,
    pub title: String,
    pub description: String,
    /// 1-based timeline position. Fixed at creation; renumbered only when
    /// an earlier milestone is deleted.
    pub position: u32,
    pub status: ConstructionStatus,
    pub start_date: Option<CalendarDate>,
    pub end_date: Option<CalendarDate>,
    /// Recorded physical completion, 0-100. Independent of `status`; feeds
    /// the derived progress strategy.
    pub completion_pct: Option<u8>,
    /// Payment obligation in raw XOF. Zero-amount milestones (e.g. a final
    /// delivery milestone) are never payable.
    pub amount: Amount,
    pub payment_status: PaymentStatus,
    pub paid_at: Option<Timestamp>,
    pub receipt_reference: Option<String>,
    pub proofs: Vec<Proof>,
}

impl Milestone {
    /// Create a milestone at the given 1-based position: pending, unpaid,
    /// no proofs.
    pub fn create(position: u32, input: NewMilestone) -> Result<Self, CoreError> {
        validate_title(&input.title)?;
        validate_description(&input.description)?;
        validate_amount(input.amount)?;

        Ok(Self {
            id: Uuid::now_v7(),
            title: input.title,
            description: input.description,
            position,
            status: ConstructionStatus::Pending,
            start_date: input.start_date,
            end_date: input.end_date,
            completion_pct: None,
            amount: input.amount,
            payment_status: PaymentStatus::Unpaid,
            paid_at: None,
            receipt_reference: None,
            proofs: Vec::new(),
        })
    }

    /// Advance the construction status through the guarded transition.
    pub fn advance_status(&mut self, next: ConstructionStatus) -> Result<(), CoreError> {
        validate_status_transition(self.status, next)?;
        self.status = next;
        Ok(())
    }

    /// Record the physical completion percentage (0-100).
    pub fn set_completion_pct(&mut self, pct: u8) -> Result<(), CoreError> {
        if pct > MAX_COMPLETION_PCT {
            return Err(CoreError::Validation(format!(
                "Completion percentage must be between 0 and {MAX_COMPLETION_PCT}, got {pct}"
            )));
        }
        self.completion_pct = Some(pct);
        Ok(())
    }

    /// Append a proof record. Proofs are append-only and never removed.
    pub fn add_proof(
        &mut self,
        kind: ProofKind,
        name: String,
        now: Timestamp,
    ) -> Result<&Proof, CoreError> {
        proof::validate_proof_name(&name)?;
        self.proofs.push(Proof {
            kind,
            name,
            created_at: now,
        });
        Ok(self.proofs.last().expect("proof was just pushed"))
    }

    /// Check the payment preconditions for this milestone.
    ///
    /// Order matters for error reporting: an already-paid milestone reports
    /// `AlreadyPaid` regardless of its other fields, and a zero-amount
    /// milestone is `NotPayable` before its construction status is looked
    /// at (it is defined as never payable).
    pub fn validate_payable(&self) -> Result<(), CoreError> {
        if self.payment_status == PaymentStatus::Paid {
            return Err(CoreError::AlreadyPaid { id: self.id });
        }
        if self.amount == 0 {
            return Err(CoreError::NotPayable {
                id: self.id,
                reason: NotPayableReason::ZeroAmount,
            });
        }
        if self.status == ConstructionStatus::Pending {
            return Err(CoreError::NotPayable {
                id: self.id,
                reason: NotPayableReason::NotStarted,
            });
        }
        Ok(())
    }

    /// Apply an admin edit. Length/range checks run before anything is
    /// written, so a rejected update leaves the milestone untouched.
    pub fn apply_update(&mut self, update: MilestoneUpdate) -> Result<(), CoreError> {
        if let Some(title) = &update.title {
            validate_title(title)?;
        }
        if let Some(description) = &update.description {
            validate_description(description)?;
        }
        if let Some(amount) = update.amount {
            validate_amount(amount)?;
            if self.payment_status == PaymentStatus::Paid && amount != self.amount {
                return Err(CoreError::Validation(
                    "Cannot change the amount of a paid milestone".to_string(),
                ));
            }
        }
        if let Some(pct) = update.completion_pct {
            if pct > MAX_COMPLETION_PCT {
                return Err(CoreError::Validation(format!(
                    "Completion percentage must be between 0 and {MAX_COMPLETION_PCT}, got {pct}"
                )));
            }
        }

        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(amount) = update.amount {
            self.amount = amount;
        }
        if let Some(start_date) = update.start_date {
            self.start_date = Some(start_date);
        }
        if let Some(end_date) = update.end_date {
            self.end_date = Some(end_date);
        }
        if let Some(pct) = update.completion_pct {
            self.completion_pct = Some(pct);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Field validators
// ---------------------------------------------------------------------------

fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation(
            "Milestone title must not be empty".to_string(),
        ));
    }
    if title.len() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Milestone title exceeds maximum length of {MAX_TITLE_LENGTH} characters (got {})",
            title.len()
        )));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), CoreError> {
    if description.len() > MAX_DESCRIPTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Milestone description exceeds maximum length of {MAX_DESCRIPTION_LENGTH} characters (got {})",
            description.len()
        )));
    }
    Ok(())
}

fn validate_amount(amount: Amount) -> Result<(), CoreError> {
    if amount < 0 {
        return Err(CoreError::Validation(format!(
            "Milestone amount must not be negative, got {amount}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
