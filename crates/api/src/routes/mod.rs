pub mod health;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                                         list, create
/// /projects/{id}                                    get, delete
/// /projects/{id}/summary                            financial rollup (GET)
/// /projects/{id}/progress                           set declared progress (PUT)
///
/// /projects/{project_id}/milestones                 list, create
/// /projects/{project_id}/milestones/{id}            update, delete
/// /projects/{project_id}/milestones/{id}/status     advance status (PUT)
/// /projects/{project_id}/milestones/{id}/proofs     append proof (POST)
/// /projects/{project_id}/milestones/{id}/payments   submit payment (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Project routes (also nest milestone administration and payments).
        .nest("/projects", project::router())
}
