//! Archive-job queue policy.

use std::sync::Arc;

use chrono::Duration;
use tracing::debug;

use lantern_core::clock::Clock;
use lantern_core::error::AppError;
use lantern_core::result::AppResult;
use lantern_database::repositories::ArchiveJobRepository;
use lantern_database::repositories::archive_job::ProcessOutcome;
use lantern_entity::job::{ArchiveJob, CreateArchiveJob};

use crate::handler::BundleHandler;

/// Durable FIFO-with-backoff queue of bundle requests.
///
/// Wraps the job repository with the policy layer: enqueue validation,
/// the injected clock, and the fixed retry backoff.
#[derive(Debug, Clone)]
pub struct ArchiveQueue {
    repo: Arc<ArchiveJobRepository>,
    clock: Arc<dyn Clock>,
    backoff: Duration,
}

impl ArchiveQueue {
    /// Create a new queue with the given clock and retry backoff.
    pub fn new(repo: Arc<ArchiveJobRepository>, clock: Arc<dyn Clock>, backoff: Duration) -> Self {
        Self {
            repo,
            clock,
            backoff,
        }
    }

    /// Enqueue a bundle request, immediately eligible for processing.
    ///
    /// A job must always have a destination and a payload: an empty
    /// recipient or file list fails validation and writes nothing.
    pub async fn enqueue(
        &self,
        notification_emails: Vec<String>,
        files: Vec<String>,
    ) -> AppResult<ArchiveJob> {
        if files.is_empty() {
            return Err(AppError::validation("Archive job has no files to bundle"));
        }
        if notification_emails.is_empty() {
            return Err(AppError::validation(
                "Archive job has no notification addresses",
            ));
        }

        let job = self
            .repo
            .create(
                &CreateArchiveJob {
                    files,
                    notification_emails,
                },
                self.clock.now(),
            )
            .await?;

        debug!(
            job_id = job.id,
            files = job.files.len(),
            recipients = job.notification_emails.len(),
            "Enqueued archive job"
        );
        Ok(job)
    }

    /// Claim the single oldest ready job, if any, and run the handler
    /// on it.
    ///
    /// Returns `Ok(None)` when no job is ready. On handler success the
    /// job is marked processed and retained; on failure its next attempt
    /// is pushed back by the backoff interval. Exactly one job is claimed
    /// per call.
    pub async fn process(&self, handler: &dyn BundleHandler) -> AppResult<Option<ProcessOutcome>> {
        let outcome = self
            .repo
            .process(self.clock.now(), self.backoff, |job| async move {
                handler.handle(&job).await
            })
            .await?;

        match &outcome {
            Some(ProcessOutcome::Completed(job)) => {
                debug!(job_id = job.id, "Archive job completed");
            }
            Some(ProcessOutcome::Deferred(job)) => {
                debug!(
                    job_id = job.id,
                    next_attempt_at = %job.next_attempt_at,
                    "Archive job deferred"
                );
            }
            None => {}
        }
        Ok(outcome)
    }
}
