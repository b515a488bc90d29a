//! Handlers for project-scoped milestone administration.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use vefa_core::milestone::{ConstructionStatus, Milestone, MilestoneUpdate, NewMilestone};
use vefa_core::proof::{Proof, ProofKind};
use vefa_core::types::{MilestoneId, ProjectId};

use crate::error::AppResult;
use crate::state::AppState;

/// Construction status change payload.
#[derive(Debug, Deserialize)]
pub struct UpdateStatus {
    pub status: ConstructionStatus,
}

/// Proof record payload.
#[derive(Debug, Deserialize)]
pub struct CreateProof {
    pub kind: ProofKind,
    pub name: String,
}

/// GET /api/v1/projects/{project_id}/milestones
pub async fn list(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
) -> AppResult<Json<Vec<Milestone>>> {
    let catalog = state.catalog.read().await;
    let project = catalog.get(project_id)?;
    Ok(Json(project.ledger.milestones().to_vec()))
}

/// POST /api/v1/projects/{project_id}/milestones
pub async fn create(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
    Json(input): Json<NewMilestone>,
) -> AppResult<(StatusCode, Json<Milestone>)> {
    let mut catalog = state.catalog.write().await;
    let project = catalog.get_mut(project_id)?;
    let milestone = project.ledger.add_milestone(input)?;
    tracing::info!(
        %project_id,
        milestone_id = %milestone.id,
        position = milestone.position,
        "Milestone added"
    );
    Ok((StatusCode::CREATED, Json(milestone.clone())))
}

/// PUT /api/v1/projects/{project_id}/milestones/{id}
pub async fn update(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(ProjectId, MilestoneId)>,
    Json(input): Json<MilestoneUpdate>,
) -> AppResult<Json<Milestone>> {
    let mut catalog = state.catalog.write().await;
    let project = catalog.get_mut(project_id)?;
    let milestone = project.ledger.update_milestone(id, input)?;
    Ok(Json(milestone.clone()))
}

/// DELETE /api/v1/projects/{project_id}/milestones/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(ProjectId, MilestoneId)>,
) -> AppResult<StatusCode> {
    let mut catalog = state.catalog.write().await;
    let project = catalog.get_mut(project_id)?;
    project.ledger.remove_milestone(id)?;
    tracing::info!(%project_id, milestone_id = %id, "Milestone removed");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/projects/{project_id}/milestones/{id}/status
pub async fn set_status(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(ProjectId, MilestoneId)>,
    Json(input): Json<UpdateStatus>,
) -> AppResult<Json<Milestone>> {
    let mut catalog = state.catalog.write().await;
    let project = catalog.get_mut(project_id)?;
    let milestone = project.ledger.advance_status(id, input.status)?;
    tracing::info!(
        %project_id,
        milestone_id = %id,
        status = input.status.as_str(),
        "Milestone status advanced"
    );
    Ok(Json(milestone.clone()))
}

/// POST /api/v1/projects/{project_id}/milestones/{id}/proofs
pub async fn add_proof(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(ProjectId, MilestoneId)>,
    Json(input): Json<CreateProof>,
) -> AppResult<(StatusCode, Json<Proof>)> {
    let mut catalog = state.catalog.write().await;
    let project = catalog.get_mut(project_id)?;
    let proof = project.ledger.add_proof(id, input.kind, input.name, Utc::now())?;
    Ok((StatusCode::CREATED, Json(proof.clone())))
}
