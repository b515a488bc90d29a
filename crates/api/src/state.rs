use std::sync::Arc;

use tokio::sync::RwLock;
use vefa_core::catalog::ProjectCatalog;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (all fields are behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Every tracked project. All mutations run under the write guard, so
    /// the unpaid-to-paid check-and-set of a payment is atomic.
    pub catalog: Arc<RwLock<ProjectCatalog>>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
