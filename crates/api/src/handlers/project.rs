//! Handlers for the `/projects` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use vefa_core::catalog::ProjectOverview;
use vefa_core::progress::{self, ProgressStrategy, ProjectSummary};
use vefa_core::project::{NewProject, Project};
use vefa_core::types::ProjectId;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameter selecting the progress strategy for reads.
#[derive(Debug, Default, Deserialize)]
pub struct ProgressQuery {
    progress: Option<String>,
}

impl ProgressQuery {
    /// Resolve the strategy; unqualified reads use the derived figure.
    fn strategy(&self) -> Result<ProgressStrategy, AppError> {
        match self.progress.as_deref() {
            None => Ok(ProgressStrategy::Derived),
            Some(value) => ProgressStrategy::from_str_value(value).ok_or_else(|| {
                AppError::BadRequest(format!(
                    "Unknown progress strategy '{value}' (expected 'declared' or 'derived')"
                ))
            }),
        }
    }
}

/// Full project payload plus its financial rollup.
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub summary: ProjectSummary,
}

/// Declared progress update payload.
#[derive(Debug, Deserialize)]
pub struct UpdateProgress {
    pub declared_progress: u8,
}

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<NewProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    let mut catalog = state.catalog.write().await;
    let project = catalog.insert(input)?;

    let drift = project.schedule_drift();
    if drift != 0 {
        tracing::warn!(
            project_id = %project.id,
            drift,
            "Milestone schedule does not cover the contracted price"
        );
    }
    tracing::info!(project_id = %project.id, name = %project.name, "Project created");

    Ok((StatusCode::CREATED, Json(project.clone())))
}

/// GET /api/v1/projects
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ProgressQuery>,
) -> AppResult<Json<DataResponse<Vec<ProjectOverview>>>> {
    let strategy = query.strategy()?;
    let catalog = state.catalog.read().await;
    Ok(Json(DataResponse {
        data: catalog.overviews(strategy),
    }))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
    Query(query): Query<ProgressQuery>,
) -> AppResult<Json<ProjectDetail>> {
    let strategy = query.strategy()?;
    let catalog = state.catalog.read().await;
    let project = catalog.get(id)?;
    let summary = progress::project_summary(project, strategy);
    Ok(Json(ProjectDetail {
        project: project.clone(),
        summary,
    }))
}

/// DELETE /api/v1/projects/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
) -> AppResult<StatusCode> {
    let mut catalog = state.catalog.write().await;
    catalog.remove(id)?;
    tracing::info!(project_id = %id, "Project removed");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/projects/{id}/summary
pub async fn summary(
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
    Query(query): Query<ProgressQuery>,
) -> AppResult<Json<DataResponse<ProjectSummary>>> {
    let strategy = query.strategy()?;
    let catalog = state.catalog.read().await;
    let project = catalog.get(id)?;
    Ok(Json(DataResponse {
        data: progress::project_summary(project, strategy),
    }))
}

/// PUT /api/v1/projects/{id}/progress
pub async fn set_progress(
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
    Json(input): Json<UpdateProgress>,
) -> AppResult<Json<Project>> {
    let mut catalog = state.catalog.write().await;
    let project = catalog.get_mut(id)?;
    project.set_declared_progress(input.declared_progress)?;
    tracing::info!(
        project_id = %id,
        declared_progress = input.declared_progress,
        "Declared progress updated"
    );
    Ok(Json(project.clone()))
}
