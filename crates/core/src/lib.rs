// crates/core/src/lib.rs
//! Domain logic for the bioflow job subsystem.
//!
//! A recipe (analysis template) is instantiated into a job that an external
//! executor runs out of process. This crate holds the pieces the web layer
//! needs to observe that job: the state enumeration and its derived flags,
//! the persisted record type, and the artifact reader that merges on-disk
//! stdout/stderr into the record. Nothing here ever advances a job's state —
//! the executor owns transitions; we only classify and report.

pub mod artifacts;
pub mod job;
pub mod state;

pub use artifacts::{reconcile, JobLogs, STDERR_FILE, STDOUT_FILE};
pub use job::JobRecord;
pub use state::{has_changed, JobState};
