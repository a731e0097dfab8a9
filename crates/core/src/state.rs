// crates/core/src/state.rs
//! Job state enumeration and derived display flags.
//!
//! States are written exclusively by the executor; this module only
//! classifies them. The integer codes are the wire/storage representation
//! and are echoed back by polling clients as opaque strings.

use serde::Serialize;

/// Lifecycle state of a job, in progress order.
///
/// `Completed` and `Error` are terminal. The web layer never initiates a
/// transition; it re-reads the persisted state on every poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Spooled = 1,
    Queued = 2,
    Running = 3,
    Completed = 4,
    Error = 5,
}

impl JobState {
    /// All states, in lifecycle order.
    pub const ALL: [JobState; 5] = [
        JobState::Spooled,
        JobState::Queued,
        JobState::Running,
        JobState::Completed,
        JobState::Error,
    ];

    /// Integer code stored in the database and echoed by clients.
    pub fn code(self) -> i64 {
        self as i64
    }

    /// Parse a stored integer code back into a state.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(JobState::Spooled),
            2 => Some(JobState::Queued),
            3 => Some(JobState::Running),
            4 => Some(JobState::Completed),
            5 => Some(JobState::Error),
            _ => None,
        }
    }

    /// True while the executor is actively working on the job.
    ///
    /// `Queued` is excluded: the job is waiting for pickup, not running.
    pub fn is_running(self) -> bool {
        matches!(self, JobState::Spooled | JobState::Running)
    }

    /// True once the job has reached a terminal state.
    pub fn is_finished(self) -> bool {
        matches!(self, JobState::Completed | JobState::Error)
    }

    /// Human-readable display label.
    pub fn label(self) -> &'static str {
        match self {
            JobState::Spooled => "Spooled",
            JobState::Queued => "Queued",
            JobState::Running => "Running",
            JobState::Completed => "Completed",
            JobState::Error => "Error",
        }
    }

    /// Semantic color class used by the status widgets.
    pub fn color(self) -> &'static str {
        match self {
            JobState::Spooled => "spooled",
            JobState::Queued => "queued",
            JobState::Running => "running",
            JobState::Completed => "completed",
            JobState::Error => "errored",
        }
    }
}

/// Compare the client's last-observed state against the current one.
///
/// `previous` comes straight off the query string and may be absent or
/// unparseable; polling must stay resilient to that, so malformed input
/// degrades to `false` (no change) rather than erroring. A parseable code
/// that is not a known state still counts as a change — the client clearly
/// saw something different from what is stored now.
pub fn has_changed(previous: Option<&str>, current: JobState) -> bool {
    match previous.map(str::trim).and_then(|p| p.parse::<i64>().ok()) {
        Some(code) => code != current.code(),
        None => {
            if previous.is_some() {
                tracing::debug!(previous = ?previous, "unparseable previous state, treating as unchanged");
            }
            false
        }
    }
}
