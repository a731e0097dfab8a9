// crates/server/src/state.rs
//! Application state for the Axum server.

use std::sync::Arc;
use std::time::Instant;

use bioflow_db::Database;

use crate::gate::{OpenGate, SharedGate};

/// Shared application state accessible from all route handlers.
pub struct AppState {
    /// Server start time for uptime tracking.
    pub start_time: Instant,
    /// Database handle for job queries.
    pub db: Database,
    /// Authorization gate consulted before serving job data.
    pub gate: SharedGate,
}

impl AppState {
    /// Create a new application state wrapped in an Arc for sharing.
    ///
    /// Uses the open gate; the embedding platform swaps in its own policy
    /// via [`AppState::with_gate`].
    pub fn new(db: Database) -> Arc<Self> {
        Self::with_gate(db, Arc::new(OpenGate))
    }

    /// Create with an externally-provided authorization gate.
    pub fn with_gate(db: Database, gate: SharedGate) -> Arc<Self> {
        Arc::new(Self {
            start_time: Instant::now(),
            db,
            gate,
        })
    }

    /// Seconds since the server started.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
