//! Payment submission workflow.
//!
//! A [`PaymentWorkflow`] is a short-lived value owned by one payment
//! attempt: pick a method, collect evidence when the method needs it,
//! submit. The state is computed from the collected fields, so an invalid
//! combination (say, ready-to-submit bank transfer without a proof) cannot
//! be represented. The ledger re-checks everything at submit; the workflow
//! guards exist to fail attempts early and keep the collected input
//! coherent.

use serde::Serialize;

use crate::error::CoreError;
use crate::ledger::MilestoneLedger;
use crate::milestone::Milestone;
use crate::payment::{PaymentMethod, PaymentReceipt};
use crate::proof::ProofUpload;
use crate::types::{Amount, MilestoneId, Timestamp};

// ---------------------------------------------------------------------------
// States
// ---------------------------------------------------------------------------

/// Where a payment attempt currently stands. Computed, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    /// No method chosen yet.
    MethodSelection,
    /// Bank transfer chosen, proof still missing.
    EvidenceCollection,
    /// All inputs collected; submit is allowed.
    ReadyToSubmit,
    /// Terminal: the payment went through.
    Submitted,
    /// Terminal: the purchaser abandoned the attempt.
    Cancelled,
}

impl WorkflowState {
    /// String value used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MethodSelection => "method_selection",
            Self::EvidenceCollection => "evidence_collection",
            Self::ReadyToSubmit => "ready_to_submit",
            Self::Submitted => "submitted",
            Self::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Submitted,
    Cancelled,
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

/// One payment attempt against one milestone.
#[derive(Debug, Clone)]
pub struct PaymentWorkflow {
    milestone_id: MilestoneId,
    /// Amount captured at start, fixed for this attempt. Display value;
    /// the ledger recomputes the authoritative amount at submit.
    amount: Amount,
    method: Option<PaymentMethod>,
    proof: Option<ProofUpload>,
    outcome: Option<Outcome>,
}

impl PaymentWorkflow {
    /// Open a workflow for a milestone.
    ///
    /// Fails with the same errors a submit would if the milestone cannot
    /// be paid at all, so dead workflows are never created.
    pub fn start(milestone: &Milestone) -> Result<Self, CoreError> {
        milestone.validate_payable()?;
        Ok(Self {
            milestone_id: milestone.id,
            amount: milestone.amount,
            method: None,
            proof: None,
            outcome: None,
        })
    }

    pub fn milestone_id(&self) -> MilestoneId {
        self.milestone_id
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn method(&self) -> Option<PaymentMethod> {
        self.method
    }

    /// Current state, derived from the collected fields.
    pub fn state(&self) -> WorkflowState {
        match self.outcome {
            Some(Outcome::Submitted) => WorkflowState::Submitted,
            Some(Outcome::Cancelled) => WorkflowState::Cancelled,
            None => match self.method {
                None => WorkflowState::MethodSelection,
                Some(method) if method.requires_proof() && self.proof.is_none() => {
                    WorkflowState::EvidenceCollection
                }
                Some(_) => WorkflowState::ReadyToSubmit,
            },
        }
    }

    pub fn can_submit(&self) -> bool {
        self.state() == WorkflowState::ReadyToSubmit
    }

    fn ensure_open(&self) -> Result<(), CoreError> {
        match self.outcome {
            None => Ok(()),
            Some(_) => Err(CoreError::Validation(
                "Payment workflow is closed and cannot be modified".to_string(),
            )),
        }
    }

    /// Choose the payment channel. Re-selecting the current method is a
    /// no-op; switching methods drops any attached proof, since the proof
    /// belongs to the bank-transfer flow.
    pub fn select_method(&mut self, method: PaymentMethod) -> Result<(), CoreError> {
        self.ensure_open()?;
        if self.method == Some(method) {
            return Ok(());
        }
        self.method = Some(method);
        self.proof = None;
        Ok(())
    }

    /// Attach the transfer-order document. Bank transfer only; exactly one
    /// file, PDF only; replaces any prior attachment.
    pub fn attach_proof(&mut self, upload: ProofUpload) -> Result<(), CoreError> {
        self.ensure_open()?;
        match self.method {
            Some(method) if method.requires_proof() => {}
            _ => {
                return Err(CoreError::Validation(
                    "Only bank transfer submissions take a proof attachment".to_string(),
                ));
            }
        }
        upload.validate()?;
        self.proof = Some(upload);
        Ok(())
    }

    /// Drop the attached document. Submit is disabled again until a new
    /// one is attached.
    pub fn remove_proof(&mut self) -> Result<(), CoreError> {
        self.ensure_open()?;
        self.proof = None;
        Ok(())
    }

    /// Abandon the attempt. The ledger is never touched.
    pub fn cancel(&mut self) -> Result<(), CoreError> {
        self.ensure_open()?;
        self.outcome = Some(Outcome::Cancelled);
        Ok(())
    }

    /// Submit the collected payment to the ledger.
    ///
    /// On success the workflow closes as submitted. On a ledger rejection
    /// (for example the milestone was paid elsewhere since start) the
    /// workflow stays open so the caller can correct or cancel.
    pub fn submit(
        &mut self,
        ledger: &mut MilestoneLedger,
        now: Timestamp,
    ) -> Result<PaymentReceipt, CoreError> {
        self.ensure_open()?;
        let Some(method) = self.method else {
            return Err(CoreError::Validation(
                "Select a payment method before submitting".to_string(),
            ));
        };
        if method.requires_proof() && self.proof.is_none() {
            return Err(CoreError::MissingProof);
        }

        let receipt = ledger.apply_payment(self.milestone_id, method, self.proof.clone(), now)?;
        self.outcome = Some(Outcome::Submitted);
        Ok(receipt)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotPayableReason;
    use crate::milestone::{ConstructionStatus, NewMilestone, PaymentStatus};
    use assert_matches::assert_matches;
    use chrono::Utc;

    fn ledger_with_started_milestone(amount: Amount) -> (MilestoneLedger, MilestoneId) {
        let mut ledger = MilestoneLedger::new(vec![NewMilestone {
            title: "Tranche 1".to_string(),
            description: String::new(),
            amount,
            start_date: None,
            end_date: None,
        }])
        .unwrap();
        let id = ledger.milestones()[0].id;
        ledger
            .advance_status(id, ConstructionStatus::InProgress)
            .unwrap();
        (ledger, id)
    }

    fn start(ledger: &MilestoneLedger, id: MilestoneId) -> PaymentWorkflow {
        PaymentWorkflow::start(ledger.get(id).unwrap()).unwrap()
    }

    fn pdf_upload(name: &str) -> ProofUpload {
        ProofUpload {
            file_name: name.to_string(),
            content_type: "application/pdf".to_string(),
        }
    }

    // -- Start guards --

    #[test]
    fn start_captures_milestone_and_amount() {
        let (ledger, id) = ledger_with_started_milestone(21_250_000);
        let flow = start(&ledger, id);
        assert_eq!(flow.milestone_id(), id);
        assert_eq!(flow.amount(), 21_250_000);
        assert_eq!(flow.state(), WorkflowState::MethodSelection);
        assert!(!flow.can_submit());
    }

    #[test]
    fn start_refuses_unpayable_milestones() {
        let mut ledger = MilestoneLedger::new(vec![
            NewMilestone {
                title: "Pending".to_string(),
                description: String::new(),
                amount: 1_000,
                start_date: None,
                end_date: None,
            },
            NewMilestone {
                title: "Livraison".to_string(),
                description: String::new(),
                amount: 0,
                start_date: None,
                end_date: None,
            },
        ])
        .unwrap();

        let pending = ledger.milestones()[0].id;
        assert_matches!(
            PaymentWorkflow::start(ledger.get(pending).unwrap()),
            Err(CoreError::NotPayable {
                reason: NotPayableReason::NotStarted,
                ..
            })
        );

        let zero = ledger.milestones()[1].id;
        ledger
            .advance_status(zero, ConstructionStatus::Completed)
            .unwrap();
        assert_matches!(
            PaymentWorkflow::start(ledger.get(zero).unwrap()),
            Err(CoreError::NotPayable {
                reason: NotPayableReason::ZeroAmount,
                ..
            })
        );
    }

    // -- Method selection and evidence --

    #[test]
    fn instant_method_goes_straight_to_ready() {
        let (ledger, id) = ledger_with_started_milestone(1_000);
        let mut flow = start(&ledger, id);
        flow.select_method(PaymentMethod::MobileMoney).unwrap();
        assert_eq!(flow.state(), WorkflowState::ReadyToSubmit);
        assert!(flow.can_submit());
    }

    #[test]
    fn bank_transfer_requires_evidence_before_ready() {
        let (ledger, id) = ledger_with_started_milestone(1_000);
        let mut flow = start(&ledger, id);
        flow.select_method(PaymentMethod::BankTransfer).unwrap();
        assert_eq!(flow.state(), WorkflowState::EvidenceCollection);
        assert!(!flow.can_submit());

        flow.attach_proof(pdf_upload("ordre-virement.pdf")).unwrap();
        assert_eq!(flow.state(), WorkflowState::ReadyToSubmit);

        flow.remove_proof().unwrap();
        assert_eq!(flow.state(), WorkflowState::EvidenceCollection);
    }

    #[test]
    fn switching_method_clears_proof() {
        let (ledger, id) = ledger_with_started_milestone(1_000);
        let mut flow = start(&ledger, id);
        flow.select_method(PaymentMethod::BankTransfer).unwrap();
        flow.attach_proof(pdf_upload("ordre-virement.pdf")).unwrap();

        flow.select_method(PaymentMethod::Card).unwrap();
        flow.select_method(PaymentMethod::BankTransfer).unwrap();
        // Back on bank transfer, the earlier attachment is gone.
        assert_eq!(flow.state(), WorkflowState::EvidenceCollection);
    }

    #[test]
    fn reselecting_same_method_keeps_proof() {
        let (ledger, id) = ledger_with_started_milestone(1_000);
        let mut flow = start(&ledger, id);
        flow.select_method(PaymentMethod::BankTransfer).unwrap();
        flow.attach_proof(pdf_upload("ordre-virement.pdf")).unwrap();

        flow.select_method(PaymentMethod::BankTransfer).unwrap();
        assert_eq!(flow.state(), WorkflowState::ReadyToSubmit);
    }

    #[test]
    fn attach_rejected_without_bank_transfer() {
        let (ledger, id) = ledger_with_started_milestone(1_000);
        let mut flow = start(&ledger, id);
        assert_matches!(
            flow.attach_proof(pdf_upload("x.pdf")),
            Err(CoreError::Validation(_))
        );

        flow.select_method(PaymentMethod::Card).unwrap();
        assert_matches!(
            flow.attach_proof(pdf_upload("x.pdf")),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn attach_rejects_non_pdf() {
        let (ledger, id) = ledger_with_started_milestone(1_000);
        let mut flow = start(&ledger, id);
        flow.select_method(PaymentMethod::BankTransfer).unwrap();
        let upload = ProofUpload {
            file_name: "virement.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
        };
        assert_matches!(
            flow.attach_proof(upload),
            Err(CoreError::InvalidFileType { .. })
        );
        assert_eq!(flow.state(), WorkflowState::EvidenceCollection);
    }

    // -- Submit --

    #[test]
    fn submit_pays_the_milestone() {
        let (mut ledger, id) = ledger_with_started_milestone(21_250_000);
        let mut flow = start(&ledger, id);
        flow.select_method(PaymentMethod::MobileMoney).unwrap();

        let receipt = flow.submit(&mut ledger, Utc::now()).unwrap();
        assert_eq!(receipt.amount, 21_250_000);
        assert_eq!(flow.state(), WorkflowState::Submitted);
        assert_eq!(
            ledger.get(id).unwrap().payment_status,
            PaymentStatus::Paid
        );
    }

    #[test]
    fn bank_submit_records_proof_in_ledger() {
        let (mut ledger, id) = ledger_with_started_milestone(5_000_000);
        let mut flow = start(&ledger, id);
        flow.select_method(PaymentMethod::BankTransfer).unwrap();
        flow.attach_proof(pdf_upload("ordre-virement.pdf")).unwrap();

        flow.submit(&mut ledger, Utc::now()).unwrap();
        let milestone = ledger.get(id).unwrap();
        assert_eq!(milestone.proofs.len(), 1);
        assert_eq!(milestone.proofs[0].name, "ordre-virement.pdf");
    }

    #[test]
    fn submit_without_method_is_rejected() {
        let (mut ledger, id) = ledger_with_started_milestone(1_000);
        let mut flow = start(&ledger, id);
        assert_matches!(
            flow.submit(&mut ledger, Utc::now()),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn bank_submit_without_proof_is_rejected() {
        let (mut ledger, id) = ledger_with_started_milestone(1_000);
        let mut flow = start(&ledger, id);
        flow.select_method(PaymentMethod::BankTransfer).unwrap();
        assert_matches!(
            flow.submit(&mut ledger, Utc::now()),
            Err(CoreError::MissingProof)
        );
        assert_eq!(
            ledger.get(id).unwrap().payment_status,
            PaymentStatus::Unpaid
        );
    }

    #[test]
    fn ledger_rejection_keeps_workflow_open() {
        let (mut ledger, id) = ledger_with_started_milestone(1_000);
        let mut flow = start(&ledger, id);
        flow.select_method(PaymentMethod::Card).unwrap();

        // Paid through another channel between start and submit.
        ledger
            .apply_payment(id, PaymentMethod::MobileMoney, None, Utc::now())
            .unwrap();

        assert_matches!(
            flow.submit(&mut ledger, Utc::now()),
            Err(CoreError::AlreadyPaid { .. })
        );
        assert_eq!(flow.state(), WorkflowState::ReadyToSubmit);
        assert!(flow.cancel().is_ok());
    }

    #[test]
    fn submitted_workflow_refuses_further_changes() {
        let (mut ledger, id) = ledger_with_started_milestone(1_000);
        let mut flow = start(&ledger, id);
        flow.select_method(PaymentMethod::Card).unwrap();
        flow.submit(&mut ledger, Utc::now()).unwrap();

        assert_matches!(
            flow.select_method(PaymentMethod::MobileMoney),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            flow.submit(&mut ledger, Utc::now()),
            Err(CoreError::Validation(_))
        );
    }

    // -- Cancel --

    #[test]
    fn cancel_closes_without_touching_ledger() {
        let (mut ledger, id) = ledger_with_started_milestone(1_000);
        let mut flow = start(&ledger, id);
        flow.select_method(PaymentMethod::BankTransfer).unwrap();
        flow.attach_proof(pdf_upload("ordre-virement.pdf")).unwrap();

        flow.cancel().unwrap();
        assert_eq!(flow.state(), WorkflowState::Cancelled);

        let milestone = ledger.get(id).unwrap();
        assert_eq!(milestone.payment_status, PaymentStatus::Unpaid);
        assert!(milestone.proofs.is_empty());

        assert_matches!(flow.cancel(), Err(CoreError::Validation(_)));
    }
}
