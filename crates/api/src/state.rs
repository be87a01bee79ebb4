use std::sync::Arc;

use crate::config::ServerConfig;
use crate::uploads::UploadStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: campusdocs_db::DbPool,
    /// Server configuration (JWT secret, upload limits).
    pub config: Arc<ServerConfig>,
    /// Disk store for uploaded files.
    pub uploads: Arc<UploadStore>,
}
