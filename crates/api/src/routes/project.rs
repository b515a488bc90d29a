//! Route definitions for the `/projects` resource.
//!
//! Also nests milestone administration and payment submission under
//! `/projects/{project_id}/milestones/...`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{milestone, payment, project};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                                  -> list
/// POST   /                                  -> create
/// GET    /{id}                              -> get_by_id
/// DELETE /{id}                              -> delete
/// GET    /{id}/summary                      -> summary
/// PUT    /{id}/progress                     -> set_progress
///
/// GET    /{project_id}/milestones           -> list
/// POST   /{project_id}/milestones           -> create
/// PUT    /{project_id}/milestones/{id}      -> update
/// DELETE /{project_id}/milestones/{id}      -> delete
/// PUT    /{project_id}/milestones/{id}/status    -> set_status
/// POST   /{project_id}/milestones/{id}/proofs    -> add_proof
/// POST   /{project_id}/milestones/{id}/payments  -> submit payment
/// ```
pub fn router() -> Router<AppState> {
    let milestone_routes = Router::new()
        .route("/", get(milestone::list).post(milestone::create))
        .route(
            "/{id}",
            put(milestone::update).delete(milestone::delete),
        )
        .route("/{id}/status", put(milestone::set_status))
        .route("/{id}/proofs", post(milestone::add_proof))
        .route("/{id}/payments", post(payment::submit));

    Router::new()
        .route("/", get(project::list).post(project::create))
        .route("/{id}", get(project::get_by_id).delete(project::delete))
        .route("/{id}/summary", get(project::summary))
        .route("/{id}/progress", put(project::set_progress))
        .nest("/{project_id}/milestones", milestone_routes)
}
