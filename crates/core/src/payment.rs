//! Payment methods and receipts.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{Amount, MilestoneId, Timestamp};

// ---------------------------------------------------------------------------
// Payment method
// ---------------------------------------------------------------------------

/// Accepted payment channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    MobileMoney,
    Card,
    BankTransfer,
}

impl PaymentMethod {
    /// String value used in payloads and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MobileMoney => "mobile-money",
            Self::Card => "card",
            Self::BankTransfer => "bank-transfer",
        }
    }

    /// Bank transfers settle out of band, so they require an uploaded
    /// transfer order as proof. The instant channels do not.
    pub fn requires_proof(self) -> bool {
        matches!(self, Self::BankTransfer)
    }
}

// ---------------------------------------------------------------------------
// Receipt
// ---------------------------------------------------------------------------

/// Issued on successful payment, one per milestone.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentReceipt {
    pub milestone_id: MilestoneId,
    pub amount: Amount,
    pub method: PaymentMethod,
    pub paid_at: Timestamp,
    pub reference: String,
}

/// Globally unique receipt reference, `RCPT-` followed by a random UUID
/// without hyphens.
pub(crate) fn new_receipt_reference() -> String {
    format!("RCPT-{}", Uuid::new_v4().simple())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
