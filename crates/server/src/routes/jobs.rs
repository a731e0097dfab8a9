// crates/server/src/routes/jobs.rs
//! API routes for observing jobs.
//!
//! - GET /jobs — list all jobs, newest first
//! - GET /jobs/{uid} — full detail for one job
//! - GET /jobs/{uid}/status — the poll endpoint clients hit on a timer

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use bioflow_core::JobRecord;

use crate::error::{ApiError, ApiResult};
use crate::poll::{poll, StatusSnapshot};
use crate::state::AppState;

/// Listing entry: the record without its (potentially large) log blobs.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct JobSummary {
    pub uid: String,
    pub name: String,
    pub state: String,
    pub color: String,
    pub is_running: bool,
    pub is_finished: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<&JobRecord> for JobSummary {
    fn from(job: &JobRecord) -> Self {
        Self {
            uid: job.uid.clone(),
            name: job.name.clone(),
            state: job.state.label().to_string(),
            color: job.state.color().to_string(),
            is_running: job.is_running(),
            is_finished: job.is_finished(),
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }
}

/// Detail payload backing the job view page the poll redirect points at.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetail {
    #[serde(flatten)]
    pub summary: JobSummary,
    pub stdout_log: String,
    pub stderr_log: String,
    pub url: String,
}

/// GET /api/jobs — List all jobs the caller may see, newest first.
async fn list_jobs(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<JobSummary>>> {
    let jobs = state.db.list_jobs().await?;
    let summaries = jobs
        .iter()
        .filter(|job| state.gate.allows(&job.uid))
        .map(JobSummary::from)
        .collect();
    Ok(Json(summaries))
}

/// GET /api/jobs/{uid} — Full detail for one job, including persisted logs.
async fn get_job(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> ApiResult<Json<JobDetail>> {
    if !state.gate.allows(&uid) {
        return Err(ApiError::Forbidden(format!("job {uid} is not visible")));
    }
    let job = state
        .db
        .get_job(&uid)
        .await?
        .ok_or_else(|| ApiError::JobNotFound(uid))?;
    Ok(Json(JobDetail {
        summary: JobSummary::from(&job),
        stdout_log: job.stdout_log.clone(),
        stderr_log: job.stderr_log.clone(),
        url: job.url(),
    }))
}

/// Query parameters for the poll endpoint.
#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    /// State code the client last observed. Opaque to the client; may be
    /// absent or malformed, which degrades to `changed = false`.
    pub state: Option<String>,
}

/// GET /api/jobs/{uid}/status?state=N — Poll a job's status.
///
/// The client keeps re-requesting this while `isRunning` is true, echoing
/// back the state code from the previous response.
async fn job_status(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
    Query(query): Query<StatusQuery>,
) -> ApiResult<Json<StatusSnapshot>> {
    if !state.gate.allows(&uid) {
        return Err(ApiError::Forbidden(format!("job {uid} is not visible")));
    }
    let snapshot = poll(&state.db, &uid, query.state.as_deref()).await?;
    Ok(Json(snapshot))
}

/// Build the jobs router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/jobs", get(list_jobs))
        .route("/jobs/{uid}", get(get_job))
        .route("/jobs/{uid}/status", get(job_status))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use bioflow_core::{JobState, STDERR_FILE, STDOUT_FILE};
    use bioflow_db::{new_spooled_job, Database};
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::gate::ClosedGate;
    use crate::{create_app, create_app_with_gate};

    async fn seed_job(db: &Database, uid: &str, state: JobState, dir: &TempDir) {
        let job = new_spooled_job(uid, "rna-quant", dir.path().to_path_buf());
        db.insert_job(&job).await.unwrap();
        db.set_job_state(uid, state).await.unwrap();
    }

    async fn do_get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_status_unknown_job_is_404() {
        let db = Database::new_in_memory().await.unwrap();
        let app = create_app(db);
        let (status, json) = do_get(app, "/api/jobs/nope/status").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Job not found");
    }

    #[tokio::test]
    async fn test_status_running_unchanged() {
        let dir = TempDir::new().unwrap();
        let db = Database::new_in_memory().await.unwrap();
        seed_job(&db, "j-run", JobState::Running, &dir).await;
        let app = create_app(db);

        let code = JobState::Running.code();
        let (status, json) = do_get(app, &format!("/api/jobs/j-run/status?state={code}")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["state"], "Running");
        assert_eq!(json["changed"], false);
        assert_eq!(json["isRunning"], true);
        assert_eq!(json["isFinished"], false);
        assert!(json.get("redirect").is_none());
        assert!(json.get("stdout").is_none());
    }

    #[tokio::test]
    async fn test_status_completion_redirects() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(STDOUT_FILE), "all done\n").unwrap();
        fs::write(dir.path().join(STDERR_FILE), "").unwrap();

        let db = Database::new_in_memory().await.unwrap();
        seed_job(&db, "j-done", JobState::Completed, &dir).await;
        let app = create_app(db);

        let stale = JobState::Running.code();
        let (status, json) = do_get(app, &format!("/api/jobs/j-done/status?state={stale}")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["changed"], true);
        assert_eq!(json["isFinished"], true);
        assert_eq!(json["redirect"], "/job/view/j-done/");
        assert_eq!(json["stdout"], "all done\n");
        assert_eq!(json["stderr"], "");
    }

    #[tokio::test]
    async fn test_status_malformed_state_param_is_ok() {
        let dir = TempDir::new().unwrap();
        let db = Database::new_in_memory().await.unwrap();
        seed_job(&db, "j-run", JobState::Running, &dir).await;
        let app = create_app(db);

        let (status, json) = do_get(app, "/api/jobs/j-run/status?state=garbage").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["changed"], false);
    }

    #[tokio::test]
    async fn test_status_errored_job_color() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(STDOUT_FILE), "step output\n").unwrap();
        fs::write(dir.path().join(STDERR_FILE), "traceback\n").unwrap();

        let db = Database::new_in_memory().await.unwrap();
        seed_job(&db, "j-err", JobState::Error, &dir).await;
        let app = create_app(db);

        let (status, json) = do_get(app, "/api/jobs/j-err/status").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["color"], "errored");
        assert_eq!(json["isFinished"], true);
        assert_eq!(json["stderr"], "traceback\n");
    }

    #[tokio::test]
    async fn test_list_jobs_empty() {
        let db = Database::new_in_memory().await.unwrap();
        let app = create_app(db);
        let (status, json) = do_get(app, "/api/jobs").await;

        assert_eq!(status, StatusCode::OK);
        assert!(json.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_jobs_newest_first_without_logs() {
        let dir = TempDir::new().unwrap();
        let db = Database::new_in_memory().await.unwrap();
        for (uid, created) in [("j-a", 100), ("j-b", 200)] {
            let mut job = new_spooled_job(uid, "qc", dir.path().to_path_buf());
            job.created_at = created;
            db.insert_job(&job).await.unwrap();
        }
        let app = create_app(db);

        let (status, json) = do_get(app, "/api/jobs").await;
        assert_eq!(status, StatusCode::OK);

        let jobs = json.as_array().unwrap();
        assert_eq!(jobs[0]["uid"], "j-b");
        assert_eq!(jobs[1]["uid"], "j-a");
        assert!(jobs[0].get("stdoutLog").is_none());
    }

    #[tokio::test]
    async fn test_job_detail_includes_logs() {
        let dir = TempDir::new().unwrap();
        let db = Database::new_in_memory().await.unwrap();
        seed_job(&db, "j-d", JobState::Completed, &dir).await;
        db.update_job_logs("j-d", "persisted out\n", "persisted err\n")
            .await
            .unwrap();
        let app = create_app(db);

        let (status, json) = do_get(app, "/api/jobs/j-d").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["stdoutLog"], "persisted out\n");
        assert_eq!(json["stderrLog"], "persisted err\n");
        assert_eq!(json["url"], "/job/view/j-d/");
        assert_eq!(json["state"], "Completed");
    }

    #[tokio::test]
    async fn test_closed_gate_hides_jobs() {
        let dir = TempDir::new().unwrap();
        let db = Database::new_in_memory().await.unwrap();
        seed_job(&db, "j-x", JobState::Running, &dir).await;
        let app = create_app_with_gate(db, Arc::new(ClosedGate));

        let (status, _) = do_get(app.clone(), "/api/jobs/j-x/status").await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, json) = do_get(app, "/api/jobs").await;
        assert_eq!(status, StatusCode::OK);
        assert!(json.as_array().unwrap().is_empty());
    }
}
