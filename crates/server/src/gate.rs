// crates/server/src/gate.rs
//! Authorization seam in front of the job endpoints.
//!
//! The surrounding platform decides who may see a job; this server only
//! needs a yes/no answer before it builds a snapshot. Handlers consult the
//! gate held on `AppState` and return 403 on refusal, keeping permission
//! policy out of the poll logic itself.

use std::sync::Arc;

/// Capability check performed before any job endpoint does work.
pub trait AccessGate: Send + Sync {
    /// May the current request observe the job with this uid?
    fn allows(&self, uid: &str) -> bool;
}

/// Shared gate handle as stored on `AppState`.
pub type SharedGate = Arc<dyn AccessGate>;

/// Allows everything. Job status checks are public in the platform, so this
/// is the production default.
#[derive(Debug, Default)]
pub struct OpenGate;

impl AccessGate for OpenGate {
    fn allows(&self, _uid: &str) -> bool {
        true
    }
}

/// Refuses everything. Used in tests to exercise the 403 path.
#[derive(Debug, Default)]
pub struct ClosedGate;

impl AccessGate for ClosedGate {
    fn allows(&self, _uid: &str) -> bool {
        false
    }
}
