//! Milestone ledger: the ordered milestone collection of one project and
//! the single mutation path for payments.
//!
//! Every payment flows through [`MilestoneLedger::apply_payment`], which
//! enforces the payment preconditions, the proof rule for bank transfers,
//! and the once-only receipt issue. All checks run before any field is
//! written, so a rejected submission leaves the ledger exactly as it was.

use serde::Serialize;

use crate::error::CoreError;
use crate::milestone::{ConstructionStatus, Milestone, MilestoneUpdate, NewMilestone, PaymentStatus};
use crate::payment::{self, PaymentMethod, PaymentReceipt};
use crate::proof::{Proof, ProofKind, ProofUpload};
use crate::types::{Amount, MilestoneId, Timestamp};

/// Ordered milestones of one project, positions 1..=n.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct MilestoneLedger {
    milestones: Vec<Milestone>,
}

impl MilestoneLedger {
    /// Build a ledger from creation inputs, assigning timeline positions
    /// in input order.
    pub fn new(inputs: Vec<NewMilestone>) -> Result<Self, CoreError> {
        let mut milestones = Vec::with_capacity(inputs.len());
        for (i, input) in inputs.into_iter().enumerate() {
            milestones.push(Milestone::create(i as u32 + 1, input)?);
        }
        Ok(Self { milestones })
    }

    pub fn milestones(&self) -> &[Milestone] {
        &self.milestones
    }

    pub fn len(&self) -> usize {
        self.milestones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.milestones.is_empty()
    }

    pub fn get(&self, id: MilestoneId) -> Result<&Milestone, CoreError> {
        self.milestones
            .iter()
            .find(|m| m.id == id)
            .ok_or(CoreError::MilestoneNotFound { id })
    }

    fn get_mut(&mut self, id: MilestoneId) -> Result<&mut Milestone, CoreError> {
        self.milestones
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(CoreError::MilestoneNotFound { id })
    }

    /// Sum of all milestone amounts, paid or not.
    pub fn total_scheduled(&self) -> Amount {
        self.milestones.iter().map(|m| m.amount).sum()
    }

    /// Sum of the amounts already settled.
    pub fn total_paid(&self) -> Amount {
        self.milestones
            .iter()
            .filter(|m| m.payment_status == PaymentStatus::Paid)
            .map(|m| m.amount)
            .sum()
    }

    // -----------------------------------------------------------------------
    // Payment
    // -----------------------------------------------------------------------

    /// Settle a milestone's payment obligation and issue a receipt.
    ///
    /// Bank transfers must carry a PDF proof upload; the proof becomes a
    /// document record on the milestone. Attachments on the instant
    /// channels (mobile money, card) are ignored. All validation happens
    /// before any mutation.
    pub fn apply_payment(
        &mut self,
        milestone_id: MilestoneId,
        method: PaymentMethod,
        proof: Option<ProofUpload>,
        now: Timestamp,
    ) -> Result<PaymentReceipt, CoreError> {
        let milestone = self.get_mut(milestone_id)?;
        milestone.validate_payable()?;

        let attachment = if method.requires_proof() {
            let upload = proof.ok_or(CoreError::MissingProof)?;
            upload.validate()?;
            Some(upload)
        } else {
            None
        };

        let reference = payment::new_receipt_reference();
        milestone.payment_status = PaymentStatus::Paid;
        milestone.paid_at = Some(now);
        milestone.receipt_reference = Some(reference.clone());
        if let Some(upload) = attachment {
            milestone.proofs.push(upload.into_proof(now));
        }

        Ok(PaymentReceipt {
            milestone_id,
            amount: milestone.amount,
            method,
            paid_at: now,
            reference,
        })
    }

    // -----------------------------------------------------------------------
    // Milestone administration
    // -----------------------------------------------------------------------

    /// Append a milestone at the end of the timeline.
    pub fn add_milestone(&mut self, input: NewMilestone) -> Result<&Milestone, CoreError> {
        let position = self.milestones.len() as u32 + 1;
        let milestone = Milestone::create(position, input)?;
        self.milestones.push(milestone);
        Ok(self.milestones.last().expect("milestone was just pushed"))
    }

    /// Apply a partial edit to a milestone.
    pub fn update_milestone(
        &mut self,
        id: MilestoneId,
        update: MilestoneUpdate,
    ) -> Result<&Milestone, CoreError> {
        self.get_mut(id)?.apply_update(update)?;
        self.get(id)
    }

    /// Delete an unpaid milestone and close the gap in positions.
    ///
    /// A paid milestone is part of the payment record and cannot be
    /// deleted.
    pub fn remove_milestone(&mut self, id: MilestoneId) -> Result<(), CoreError> {
        let index = self
            .milestones
            .iter()
            .position(|m| m.id == id)
            .ok_or(CoreError::MilestoneNotFound { id })?;
        if self.milestones[index].payment_status == PaymentStatus::Paid {
            return Err(CoreError::Validation(
                "Cannot delete a paid milestone".to_string(),
            ));
        }
        self.milestones.remove(index);
        for (i, milestone) in self.milestones.iter_mut().enumerate() {
            milestone.position = i as u32 + 1;
        }
        Ok(())
    }

    /// Advance a milestone's construction status.
    pub fn advance_status(
        &mut self,
        id: MilestoneId,
        next: ConstructionStatus,
    ) -> Result<&Milestone, CoreError> {
        self.get_mut(id)?.advance_status(next)?;
        self.get(id)
    }

    /// Append a proof record to a milestone.
    pub fn add_proof(
        &mut self,
        id: MilestoneId,
        kind: ProofKind,
        name: String,
        now: Timestamp,
    ) -> Result<&Proof, CoreError> {
        self.get_mut(id)?.add_proof(kind, name, now)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotPayableReason;
    use assert_matches::assert_matches;
    use chrono::Utc;
    use uuid::Uuid;

    fn tranche(title: &str, amount: Amount) -> NewMilestone {
        NewMilestone {
            title: title.to_string(),
            description: String::new(),
            amount,
            start_date: None,
            end_date: None,
        }
    }

    fn ledger_with(amounts: &[Amount]) -> MilestoneLedger {
        let inputs = amounts
            .iter()
            .enumerate()
            .map(|(i, &amount)| tranche(&format!("Tranche {}", i + 1), amount))
            .collect();
        MilestoneLedger::new(inputs).unwrap()
    }

    fn pdf_upload(name: &str) -> ProofUpload {
        ProofUpload {
            file_name: name.to_string(),
            content_type: "application/pdf".to_string(),
        }
    }

    // -- Construction --

    #[test]
    fn new_assigns_positions_in_order() {
        let ledger = ledger_with(&[100, 200, 300]);
        let positions: Vec<u32> = ledger.milestones().iter().map(|m| m.position).collect();
        assert_eq!(positions, vec![1, 2, 3]);
    }

    #[test]
    fn totals_sum_amounts() {
        let mut ledger = ledger_with(&[100, 200, 300]);
        assert_eq!(ledger.total_scheduled(), 600);
        assert_eq!(ledger.total_paid(), 0);

        let id = ledger.milestones()[1].id;
        ledger
            .advance_status(id, ConstructionStatus::InProgress)
            .unwrap();
        ledger
            .apply_payment(id, PaymentMethod::Card, None, Utc::now())
            .unwrap();
        assert_eq!(ledger.total_paid(), 200);
        assert_eq!(ledger.total_scheduled(), 600);
    }

    // -- apply_payment: success paths --

    #[test]
    fn mobile_money_payment_succeeds_on_started_milestone() {
        let mut ledger = ledger_with(&[21_250_000]);
        let id = ledger.milestones()[0].id;
        ledger
            .advance_status(id, ConstructionStatus::InProgress)
            .unwrap();

        let now = Utc::now();
        let receipt = ledger
            .apply_payment(id, PaymentMethod::MobileMoney, None, now)
            .unwrap();

        assert_eq!(receipt.milestone_id, id);
        assert_eq!(receipt.amount, 21_250_000);
        assert_eq!(receipt.method, PaymentMethod::MobileMoney);
        assert_eq!(receipt.paid_at, now);
        assert!(receipt.reference.starts_with("RCPT-"));

        let milestone = ledger.get(id).unwrap();
        assert_eq!(milestone.payment_status, PaymentStatus::Paid);
        assert_eq!(milestone.paid_at, Some(now));
        assert_eq!(milestone.receipt_reference.as_deref(), Some(receipt.reference.as_str()));
        assert!(milestone.proofs.is_empty());
    }

    #[test]
    fn bank_transfer_with_pdf_records_proof_document() {
        let mut ledger = ledger_with(&[5_000_000]);
        let id = ledger.milestones()[0].id;
        ledger
            .advance_status(id, ConstructionStatus::Completed)
            .unwrap();

        let now = Utc::now();
        ledger
            .apply_payment(
                id,
                PaymentMethod::BankTransfer,
                Some(pdf_upload("ordre-virement.pdf")),
                now,
            )
            .unwrap();

        let milestone = ledger.get(id).unwrap();
        assert_eq!(milestone.proofs.len(), 1);
        assert_eq!(milestone.proofs[0].kind, ProofKind::Document);
        assert_eq!(milestone.proofs[0].name, "ordre-virement.pdf");
        assert_eq!(milestone.proofs[0].created_at, now);
    }

    #[test]
    fn stray_attachment_on_instant_channel_is_ignored() {
        let mut ledger = ledger_with(&[1_000]);
        let id = ledger.milestones()[0].id;
        ledger
            .advance_status(id, ConstructionStatus::InProgress)
            .unwrap();

        ledger
            .apply_payment(
                id,
                PaymentMethod::Card,
                Some(pdf_upload("inutile.pdf")),
                Utc::now(),
            )
            .unwrap();

        assert!(ledger.get(id).unwrap().proofs.is_empty());
    }

    // -- apply_payment: rejections --

    #[test]
    fn bank_transfer_without_proof_is_rejected() {
        let mut ledger = ledger_with(&[5_000_000]);
        let id = ledger.milestones()[0].id;
        ledger
            .advance_status(id, ConstructionStatus::InProgress)
            .unwrap();

        let result = ledger.apply_payment(id, PaymentMethod::BankTransfer, None, Utc::now());
        assert_matches!(result, Err(CoreError::MissingProof));

        let milestone = ledger.get(id).unwrap();
        assert_eq!(milestone.payment_status, PaymentStatus::Unpaid);
        assert!(milestone.paid_at.is_none());
        assert!(milestone.receipt_reference.is_none());
    }

    #[test]
    fn bank_transfer_with_non_pdf_is_rejected_without_mutation() {
        let mut ledger = ledger_with(&[5_000_000]);
        let id = ledger.milestones()[0].id;
        ledger
            .advance_status(id, ConstructionStatus::InProgress)
            .unwrap();

        let upload = ProofUpload {
            file_name: "virement.png".to_string(),
            content_type: "image/png".to_string(),
        };
        let result = ledger.apply_payment(id, PaymentMethod::BankTransfer, Some(upload), Utc::now());
        assert_matches!(result, Err(CoreError::InvalidFileType { .. }));

        let milestone = ledger.get(id).unwrap();
        assert_eq!(milestone.payment_status, PaymentStatus::Unpaid);
        assert!(milestone.proofs.is_empty());
    }

    #[test]
    fn second_payment_reports_already_paid() {
        let mut ledger = ledger_with(&[1_000]);
        let id = ledger.milestones()[0].id;
        ledger
            .advance_status(id, ConstructionStatus::InProgress)
            .unwrap();
        ledger
            .apply_payment(id, PaymentMethod::Card, None, Utc::now())
            .unwrap();

        let result = ledger.apply_payment(id, PaymentMethod::Card, None, Utc::now());
        assert_matches!(result, Err(CoreError::AlreadyPaid { id: reported }) if reported == id);
    }

    #[test]
    fn pending_milestone_payment_is_rejected() {
        let mut ledger = ledger_with(&[1_000]);
        let id = ledger.milestones()[0].id;
        let result = ledger.apply_payment(id, PaymentMethod::Card, None, Utc::now());
        assert_matches!(
            result,
            Err(CoreError::NotPayable {
                reason: NotPayableReason::NotStarted,
                ..
            })
        );
    }

    #[test]
    fn zero_amount_milestone_payment_is_rejected() {
        let mut ledger = ledger_with(&[0]);
        let id = ledger.milestones()[0].id;
        ledger
            .advance_status(id, ConstructionStatus::Completed)
            .unwrap();
        let result = ledger.apply_payment(id, PaymentMethod::MobileMoney, None, Utc::now());
        assert_matches!(
            result,
            Err(CoreError::NotPayable {
                reason: NotPayableReason::ZeroAmount,
                ..
            })
        );
    }

    #[test]
    fn unknown_milestone_payment_is_rejected() {
        let mut ledger = ledger_with(&[1_000]);
        let result = ledger.apply_payment(Uuid::now_v7(), PaymentMethod::Card, None, Utc::now());
        assert_matches!(result, Err(CoreError::MilestoneNotFound { .. }));
    }

    // -- Administration --

    #[test]
    fn add_milestone_appends_at_next_position() {
        let mut ledger = ledger_with(&[100, 200]);
        let added = ledger.add_milestone(tranche("Livraison", 0)).unwrap();
        assert_eq!(added.position, 3);
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn remove_milestone_renumbers_positions() {
        let mut ledger = ledger_with(&[100, 200, 300]);
        let second = ledger.milestones()[1].id;
        ledger.remove_milestone(second).unwrap();

        let positions: Vec<u32> = ledger.milestones().iter().map(|m| m.position).collect();
        assert_eq!(positions, vec![1, 2]);
        let amounts: Vec<Amount> = ledger.milestones().iter().map(|m| m.amount).collect();
        assert_eq!(amounts, vec![100, 300]);
    }

    #[test]
    fn remove_paid_milestone_is_rejected() {
        let mut ledger = ledger_with(&[100]);
        let id = ledger.milestones()[0].id;
        ledger
            .advance_status(id, ConstructionStatus::InProgress)
            .unwrap();
        ledger
            .apply_payment(id, PaymentMethod::Card, None, Utc::now())
            .unwrap();

        assert_matches!(
            ledger.remove_milestone(id),
            Err(CoreError::Validation(_))
        );
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn update_milestone_routes_through_entity_guard() {
        let mut ledger = ledger_with(&[100]);
        let id = ledger.milestones()[0].id;
        let updated = ledger
            .update_milestone(
                id,
                MilestoneUpdate {
                    completion_pct: Some(75),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.completion_pct, Some(75));
    }

    #[test]
    fn update_unknown_milestone_is_rejected() {
        let mut ledger = ledger_with(&[100]);
        let result = ledger.update_milestone(Uuid::now_v7(), MilestoneUpdate::default());
        assert_matches!(result, Err(CoreError::MilestoneNotFound { .. }));
    }
}
