// crates/db/src/migrations.rs
/// Inline SQL migrations for the bioflow database schema.
///
/// We use simple inline migrations rather than sqlx migration files
/// because the schema is small and self-contained.

pub const MIGRATIONS: &[&str] = &[
    // Migration 1: jobs table. `state` holds the integer code owned by the
    // executor; `stdout_log`/`stderr_log` are only written by reconciliation.
    r#"
CREATE TABLE IF NOT EXISTS jobs (
    uid        TEXT PRIMARY KEY,
    name       TEXT NOT NULL DEFAULT '',
    state      INTEGER NOT NULL,
    path       TEXT NOT NULL,
    stdout_log TEXT NOT NULL DEFAULT '',
    stderr_log TEXT NOT NULL DEFAULT '',
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);
"#,
    // Migration 2: listing is newest-first
    r#"
CREATE INDEX IF NOT EXISTS idx_jobs_created ON jobs(created_at DESC);
"#,
];
