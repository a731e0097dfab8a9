// crates/db/src/queries.rs
// Job record CRUD for the bioflow SQLite database.
//
// The poll path only ever calls `get_job` and `update_job_logs`; the state
// column is written through `set_job_state` by the executor side alone.

use std::path::PathBuf;

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use bioflow_core::{JobRecord, JobState};

use crate::{Database, DbError, DbResult};

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

fn job_from_row(row: &SqliteRow) -> DbResult<JobRecord> {
    let code: i64 = row.try_get("state")?;
    let state = JobState::from_code(code).ok_or(DbError::UnknownState(code))?;
    let path: String = row.try_get("path")?;
    Ok(JobRecord {
        uid: row.try_get("uid")?,
        name: row.try_get("name")?,
        state,
        path: PathBuf::from(path),
        stdout_log: row.try_get("stdout_log")?,
        stderr_log: row.try_get("stderr_log")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

impl Database {
    /// Insert a freshly spooled job. Called by the execution subsystem when a
    /// recipe is submitted; the web layer never creates jobs.
    pub async fn insert_job(&self, record: &JobRecord) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO jobs (uid, name, state, path, stdout_log, stderr_log, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.uid)
        .bind(&record.name)
        .bind(record.state.code())
        .bind(record.path.to_string_lossy().into_owned())
        .bind(&record.stdout_log)
        .bind(&record.stderr_log)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Fetch one job by uid. `Ok(None)` when no such job exists.
    pub async fn get_job(&self, uid: &str) -> DbResult<Option<JobRecord>> {
        let row = sqlx::query("SELECT * FROM jobs WHERE uid = ?")
            .bind(uid)
            .fetch_optional(self.pool())
            .await?;
        row.as_ref().map(job_from_row).transpose()
    }

    /// All jobs, newest first.
    pub async fn list_jobs(&self) -> DbResult<Vec<JobRecord>> {
        let rows = sqlx::query("SELECT * FROM jobs ORDER BY created_at DESC, uid")
            .fetch_all(self.pool())
            .await?;
        rows.iter().map(job_from_row).collect()
    }

    /// Write reconciled artifact contents back onto the record.
    ///
    /// Last-writer-wins: concurrent polls racing here carry identical content
    /// once both artifact files are stable, so no locking is needed.
    pub async fn update_job_logs(&self, uid: &str, stdout: &str, stderr: &str) -> DbResult<()> {
        sqlx::query("UPDATE jobs SET stdout_log = ?, stderr_log = ?, updated_at = ? WHERE uid = ?")
            .bind(stdout)
            .bind(stderr)
            .bind(now_ms())
            .bind(uid)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    /// Advance the executor-owned state column.
    ///
    /// Exists for the executor side and for tests; the poll path never calls
    /// this.
    pub async fn set_job_state(&self, uid: &str, state: JobState) -> DbResult<()> {
        sqlx::query("UPDATE jobs SET state = ?, updated_at = ? WHERE uid = ?")
            .bind(state.code())
            .bind(now_ms())
            .bind(uid)
            .execute(self.pool())
            .await?;
        Ok(())
    }
}

/// Build a new spooled record with timestamps set to now.
///
/// Convenience for the execution subsystem and tests.
pub fn new_spooled_job(uid: impl Into<String>, name: impl Into<String>, path: PathBuf) -> JobRecord {
    let now = now_ms();
    JobRecord {
        uid: uid.into(),
        name: name.into(),
        state: JobState::Spooled,
        path,
        stdout_log: String::new(),
        stderr_log: String::new(),
        created_at: now,
        updated_at: now,
    }
}
