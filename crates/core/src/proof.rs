//! Milestone proof records and payment-proof upload constraints.
//!
//! Proofs are append-only: once recorded against a milestone they are never
//! edited or removed. Payment proofs cross the boundary as metadata only
//! (file name and declared content type); file contents live with the
//! storage collaborator.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Content type accepted for payment proof uploads.
pub const PROOF_CONTENT_TYPE_PDF: &str = "application/pdf";

/// File extension accepted for payment proof uploads.
pub const PROOF_EXTENSION_PDF: &str = ".pdf";

/// Maximum length for a proof name (characters).
pub const MAX_PROOF_NAME_LENGTH: usize = 255;

// ---------------------------------------------------------------------------
// Proof records
// ---------------------------------------------------------------------------

/// Kind of evidence attached to a milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProofKind {
    /// A site photo or similar progress image.
    Image,
    /// A document (payment receipt, inspection report, ...).
    Document,
}

impl ProofKind {
    /// String value used in payloads and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Document => "document",
        }
    }
}

/// A single piece of evidence owned by a milestone.
#[derive(Debug, Clone, Serialize)]
pub struct Proof {
    pub kind: ProofKind,
    pub name: String,
    pub created_at: Timestamp,
}

/// Validate a proof name before it is recorded.
pub fn validate_proof_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Proof name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_PROOF_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Proof name exceeds maximum length of {MAX_PROOF_NAME_LENGTH} characters (got {})",
            name.len()
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Payment proof uploads
// ---------------------------------------------------------------------------

/// Metadata for a proof file crossing the upload boundary with a bank
/// transfer submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofUpload {
    pub file_name: String,
    pub content_type: String,
}

impl ProofUpload {
    /// Validate that the upload is an acceptable payment proof.
    ///
    /// Only PDF documents are accepted: the file name extension and the
    /// declared content type must both agree.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_proof_name(&self.file_name)?;

        let extension_ok = self
            .file_name
            .to_ascii_lowercase()
            .ends_with(PROOF_EXTENSION_PDF);
        let content_type_ok = self.content_type == PROOF_CONTENT_TYPE_PDF;

        if extension_ok && content_type_ok {
            Ok(())
        } else {
            Err(CoreError::InvalidFileType {
                name: self.file_name.clone(),
            })
        }
    }

    /// Convert into the document proof recorded against the milestone when
    /// the bank transfer submission succeeds.
    pub fn into_proof(self, now: Timestamp) -> Proof {
        Proof {
            kind: ProofKind::Document,
            name: self.file_name,
            created_at: now,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
