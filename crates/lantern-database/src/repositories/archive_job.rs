//! Archive job repository implementation.
//!
//! The durable bundle-request queue: jobs are claimed strictly oldest
//! first among those whose retry time has elapsed, exactly one per call,
//! and the claim/update sequence shares a single transaction with the
//! caller's callback.

use std::future::Future;

use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use sqlx::types::Json;

use lantern_core::error::{AppError, ErrorKind};
use lantern_core::result::AppResult;
use lantern_entity::job::{ArchiveJob, CreateArchiveJob};

/// What happened to the job claimed by a [`ArchiveJobRepository::process`]
/// call.
#[derive(Debug, Clone)]
pub enum ProcessOutcome {
    /// The callback succeeded; the job is terminally processed and
    /// retained as an audit record.
    Completed(ArchiveJob),
    /// The callback reported failure; the job was pushed back with its
    /// `next_attempt_at` advanced by the backoff interval.
    Deferred(ArchiveJob),
}

/// Repository for persisted bundle requests.
#[derive(Debug, Clone)]
pub struct ArchiveJobRepository {
    pool: SqlitePool,
}

impl ArchiveJobRepository {
    /// Create a new archive job repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a job by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<ArchiveJob>> {
        sqlx::query_as::<_, ArchiveJob>("SELECT * FROM archive_jobs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find job", e))
    }

    /// Persist a new job, immediately eligible for processing.
    ///
    /// List validation (non-empty files and recipients) belongs to the
    /// queue layer; this method only writes.
    pub async fn create(
        &self,
        data: &CreateArchiveJob,
        now: DateTime<Utc>,
    ) -> AppResult<ArchiveJob> {
        sqlx::query_as::<_, ArchiveJob>(
            "INSERT INTO archive_jobs (created_at, next_attempt_at, files, notification_emails, processed) \
             VALUES (?, ?, ?, ?, 0) RETURNING *",
        )
        .bind(now)
        .bind(now)
        .bind(Json(&data.files))
        .bind(Json(&data.notification_emails))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create job", e))
    }

    /// Claim the single oldest ready job and run `callback` on it.
    ///
    /// A job is ready when `processed` is false and its `next_attempt_at`
    /// is at or before `now`. If no job is ready the callback is not
    /// invoked and the call is a no-op success. The callback's boolean is
    /// a business signal, not an error: true marks the job processed
    /// (terminal), false advances `next_attempt_at` by `backoff` and
    /// leaves the job eligible later.
    ///
    /// Claim, callback, and status update share one transaction; any
    /// storage error rolls the whole operation back.
    pub async fn process<F, Fut>(
        &self,
        now: DateTime<Utc>,
        backoff: Duration,
        callback: F,
    ) -> AppResult<Option<ProcessOutcome>>
    where
        F: FnOnce(ArchiveJob) -> Fut,
        Fut: Future<Output = bool>,
    {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let job = sqlx::query_as::<_, ArchiveJob>(
            "SELECT * FROM archive_jobs WHERE processed = 0 AND next_attempt_at <= ? \
             ORDER BY created_at ASC, id ASC LIMIT 1",
        )
        .bind(now)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to claim job", e))?;

        let Some(mut job) = job else {
            return Ok(None);
        };

        let succeeded = callback(job.clone()).await;

        let outcome = if succeeded {
            sqlx::query("UPDATE archive_jobs SET processed = 1 WHERE id = ?")
                .bind(job.id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to mark job processed", e)
                })?;
            job.processed = true;
            ProcessOutcome::Completed(job)
        } else {
            let next_attempt_at = now + backoff;
            sqlx::query("UPDATE archive_jobs SET next_attempt_at = ? WHERE id = ?")
                .bind(next_attempt_at)
                .bind(job.id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to defer job", e)
                })?;
            job.next_attempt_at = next_attempt_at;
            ProcessOutcome::Deferred(job)
        };

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        Ok(Some(outcome))
    }

    /// Count jobs that have not yet completed.
    pub async fn count_unprocessed(&self) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM archive_jobs WHERE processed = 0")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count jobs", e))
    }
}
