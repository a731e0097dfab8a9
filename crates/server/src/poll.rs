// crates/server/src/poll.rs
//! The poll coordinator: one best-effort status snapshot per client request.
//!
//! Clients re-request this on a timer until `is_finished` flips; the
//! `changed` flag tells them whether anything moved since the state they
//! echo back. The coordinator is stateless between calls — every poll
//! re-reads the record, reconciles artifacts, and derives everything fresh.
//! Its only write is persisting reconciled log content.

use bioflow_core::{has_changed, reconcile, JobLogs, JobRecord};
use bioflow_db::Database;
use serde::Serialize;

use crate::error::{ApiError, ApiResult};

/// Render-ready job status returned from the poll endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct StatusSnapshot {
    /// Display label for the current state (e.g. "Running").
    pub state: String,
    /// Semantic color class for the status widget.
    pub color: String,
    pub is_running: bool,
    pub is_finished: bool,
    /// True when the state differs from what the client last observed.
    pub changed: bool,
    /// Full stdout text, present only once both artifact files exist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    /// Full stderr text, present only once both artifact files exist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
    /// Detail view to navigate to, set only for terminal states.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

impl StatusSnapshot {
    fn assemble(job: &JobRecord, changed: bool, logs: Option<JobLogs>) -> Self {
        let (stdout, stderr) = match logs {
            Some(logs) => (Some(logs.stdout), Some(logs.stderr)),
            None => (None, None),
        };
        Self {
            state: job.state.label().to_string(),
            color: job.state.color().to_string(),
            is_running: job.is_running(),
            is_finished: job.is_finished(),
            changed,
            stdout,
            stderr,
            redirect: job.is_finished().then(|| job.url()),
        }
    }
}

/// Serve one poll: resolve the record, classify its state, reconcile
/// artifacts, and assemble the snapshot.
///
/// `previous` is the state code the client last observed, straight off the
/// query string; malformed values degrade to `changed = false`. Reconciled
/// log content is written back only when it differs from what is already
/// persisted, so re-merging stable files is a no-op. A failed write-back is
/// logged and absorbed — the snapshot still reflects the on-disk content and
/// the next poll retries the persist.
pub async fn poll(db: &Database, uid: &str, previous: Option<&str>) -> ApiResult<StatusSnapshot> {
    let job = db
        .get_job(uid)
        .await?
        .ok_or_else(|| ApiError::JobNotFound(uid.to_string()))?;

    let changed = has_changed(previous, job.state);

    let logs = reconcile(&job.path).await;
    if let Some(logs) = &logs {
        if logs.stdout != job.stdout_log || logs.stderr != job.stderr_log {
            if let Err(e) = db.update_job_logs(uid, &logs.stdout, &logs.stderr).await {
                tracing::warn!(job_uid = %uid, error = %e, "failed to persist reconciled logs");
            }
        }
    }

    Ok(StatusSnapshot::assemble(&job, changed, logs))
}
