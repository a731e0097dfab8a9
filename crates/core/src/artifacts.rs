// crates/core/src/artifacts.rs
//! Reads the executor's on-disk stdout/stderr artifacts.
//!
//! The executor writes two files into the job directory as it runs. A poll
//! merges them into the persisted record, but only once **both** exist —
//! partial availability is "not ready yet", never a half-merged result mixing
//! stale and fresh output. Absence is not an error; the next poll retries.

use std::path::Path;

use tracing::warn;

/// Stdout artifact file name inside the job directory.
pub const STDOUT_FILE: &str = "stdout.txt";
/// Stderr artifact file name inside the job directory.
pub const STDERR_FILE: &str = "stderr.txt";

/// Fully-read artifact contents for one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobLogs {
    pub stdout: String,
    pub stderr: String,
}

/// Read both artifact files under `dir`, if both are present.
///
/// Returns `None` when either file is missing or either read fails
/// (permission, transient I/O, non-UTF-8 content). Read failures are logged
/// for operators but never propagated: the caller keeps whatever log content
/// it already has and retries on the next poll.
///
/// Files are read in full; the surrounding system keeps executor output
/// bounded, so no size cap is enforced here.
pub async fn reconcile(dir: &Path) -> Option<JobLogs> {
    let stdout_path = dir.join(STDOUT_FILE);
    let stderr_path = dir.join(STDERR_FILE);

    // Both-files gate: the executor may write stderr lazily, so a lone
    // stdout file means the pair is not yet stable.
    for path in [&stdout_path, &stderr_path] {
        match tokio::fs::try_exists(path).await {
            Ok(true) => {}
            Ok(false) => return None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "artifact existence check failed");
                return None;
            }
        }
    }

    let stdout = match tokio::fs::read_to_string(&stdout_path).await {
        Ok(text) => text,
        Err(e) => {
            warn!(path = %stdout_path.display(), error = %e, "failed to read stdout artifact");
            return None;
        }
    };
    let stderr = match tokio::fs::read_to_string(&stderr_path).await {
        Ok(text) => text,
        Err(e) => {
            warn!(path = %stderr_path.display(), error = %e, "failed to read stderr artifact");
            return None;
        }
    };

    Some(JobLogs { stdout, stderr })
}
