// crates/server/src/lib.rs
//! Bioflow server library.
//!
//! Axum-based HTTP server for the bioflow recipes subsystem. Serves the job
//! status poll endpoint plus the listing/detail surface around it. Job
//! execution itself happens in an external worker; this server only observes
//! the records and artifacts that worker leaves behind.

pub mod error;
pub mod gate;
pub mod poll;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult, ErrorResponse};
pub use gate::{AccessGate, ClosedGate, OpenGate, SharedGate};
pub use poll::StatusSnapshot;
pub use routes::api_routes;
pub use state::AppState;

use axum::Router;
use bioflow_db::Database;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the Axum application with all routes and middleware.
///
/// This sets up:
/// - API routes (health, jobs)
/// - CORS for development (allows any origin)
/// - Request tracing
pub fn create_app(db: Database) -> Router {
    create_app_with_gate(db, std::sync::Arc::new(OpenGate))
}

/// Create the application with an externally-provided authorization gate.
pub fn create_app_with_gate(db: Database, gate: SharedGate) -> Router {
    let state = AppState::with_gate(db, gate);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api_routes(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
