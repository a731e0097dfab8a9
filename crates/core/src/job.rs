// crates/core/src/job.rs
//! The persisted job record.

use std::path::PathBuf;

use serde::Serialize;

use crate::state::JobState;

/// One execution instance of a recipe.
///
/// Owned by the execution subsystem: the executor writes `state` and the
/// artifact files under `path`; the web layer only reads the record and
/// writes back reconciled log fields. `uid` and `path` are fixed at
/// creation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub uid: String,
    pub name: String,
    pub state: JobState,
    pub path: PathBuf,
    /// Last reconciled stdout contents. Last-writer-wins.
    pub stdout_log: String,
    /// Last reconciled stderr contents. Last-writer-wins.
    pub stderr_log: String,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds, bumped on log reconciliation and state writes.
    pub updated_at: i64,
}

impl JobRecord {
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Canonical detail view for this job, used as the poll redirect target
    /// once the job reaches a terminal state.
    pub fn url(&self) -> String {
        format!("/job/view/{}/", self.uid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(state: JobState) -> JobRecord {
        JobRecord {
            uid: "j-abc123".into(),
            name: "qc-trim".into(),
            state,
            path: PathBuf::from("/data/jobs/j-abc123"),
            stdout_log: String::new(),
            stderr_log: String::new(),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn url_points_at_detail_view() {
        assert_eq!(record(JobState::Completed).url(), "/job/view/j-abc123/");
    }

    #[test]
    fn flags_delegate_to_state() {
        assert!(record(JobState::Running).is_running());
        assert!(record(JobState::Error).is_finished());
        assert!(!record(JobState::Queued).is_running());
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(record(JobState::Spooled)).unwrap();
        assert!(json.get("stdoutLog").is_some());
        assert!(json.get("createdAt").is_some());
    }
}
