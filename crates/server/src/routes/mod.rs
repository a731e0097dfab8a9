// crates/server/src/routes/mod.rs
//! API route handlers for the bioflow server.

pub mod health;
pub mod jobs;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// Create the combined API router with all routes under /api prefix.
///
/// Routes:
/// - GET /api/health - Health check
/// - GET /api/jobs - List all jobs, newest first
/// - GET /api/jobs/{uid} - Job detail with persisted logs
/// - GET /api/jobs/{uid}/status - Poll endpoint; ?state=N echoes the last observed state code
pub fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", health::router())
        .nest("/api", jobs::router())
        .with_state(state)
}
