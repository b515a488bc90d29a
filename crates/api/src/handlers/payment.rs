//! Handlers for milestone payment submission.
//!
//! A submission drives a [`PaymentWorkflow`] end-to-end inside the catalog
//! write guard: start, method selection, optional evidence, submit. The
//! workflow's guard rails apply to API clients exactly as they do to any
//! other caller, and holding the write guard for the whole sequence makes
//! the unpaid-to-paid transition atomic.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use vefa_core::payment::{PaymentMethod, PaymentReceipt};
use vefa_core::proof::ProofUpload;
use vefa_core::types::{MilestoneId, ProjectId};
use vefa_core::workflow::PaymentWorkflow;

use crate::error::AppResult;
use crate::state::AppState;

/// Payment submission payload.
#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub method: PaymentMethod,
    pub proof: Option<ProofUpload>,
}

/// POST /api/v1/projects/{project_id}/milestones/{id}/payments
pub async fn submit(
    State(state): State<AppState>,
    Path((project_id, milestone_id)): Path<(ProjectId, MilestoneId)>,
    Json(input): Json<PaymentRequest>,
) -> AppResult<(StatusCode, Json<PaymentReceipt>)> {
    let mut catalog = state.catalog.write().await;
    let project = catalog.get_mut(project_id)?;

    let mut workflow = PaymentWorkflow::start(project.ledger.get(milestone_id)?)?;
    workflow.select_method(input.method)?;
    if let Some(upload) = input.proof {
        workflow.attach_proof(upload)?;
    }
    let receipt = workflow.submit(&mut project.ledger, Utc::now())?;

    tracing::info!(
        %project_id,
        %milestone_id,
        method = input.method.as_str(),
        amount = receipt.amount,
        reference = %receipt.reference,
        "Milestone payment recorded"
    );
    Ok((StatusCode::CREATED, Json(receipt)))
}
