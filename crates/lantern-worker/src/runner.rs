//! Worker runner: main loop that polls the queue and processes jobs.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

use lantern_core::config::WorkerConfig;
use lantern_database::repositories::archive_job::ProcessOutcome;

use crate::handler::BundleHandler;
use crate::queue::ArchiveQueue;

/// Polls the archive-job queue on an interval, dispatching ready jobs to
/// the bundle handler, until the cancel signal is received.
pub struct WorkerRunner {
    queue: Arc<ArchiveQueue>,
    handler: Arc<dyn BundleHandler>,
    config: WorkerConfig,
}

impl WorkerRunner {
    /// Create a new worker runner.
    pub fn new(queue: Arc<ArchiveQueue>, handler: Arc<dyn BundleHandler>, config: WorkerConfig) -> Self {
        Self {
            queue,
            handler,
            config,
        }
    }

    /// Run until the cancel signal flips to true.
    ///
    /// One job is claimed per poll and polls are spaced by the configured
    /// interval, so bundle construction stays throttled even with a
    /// backlog.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        tracing::info!(
            poll_interval = self.config.poll_interval_seconds,
            retry_backoff = self.config.retry_backoff_seconds,
            "Archive worker started"
        );

        let poll_interval = Duration::from_secs(self.config.poll_interval_seconds);

        loop {
            // Covers a cancel that arrives before the first poll or
            // while the previous one was running.
            if *cancel.borrow() {
                break;
            }

            self.poll_once().await;

            tokio::select! {
                // A dropped sender means the owner is gone; stop too.
                changed = cancel.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = time::sleep(poll_interval) => {}
            }
        }

        tracing::info!("Archive worker shut down");
    }

    /// Poll the queue once.
    async fn poll_once(&self) {
        match self.queue.process(self.handler.as_ref()).await {
            Ok(Some(ProcessOutcome::Completed(job))) => {
                tracing::info!(job_id = job.id, "Archive job processed");
            }
            Ok(Some(ProcessOutcome::Deferred(job))) => {
                tracing::warn!(
                    job_id = job.id,
                    next_attempt_at = %job.next_attempt_at,
                    "Archive job failed, will retry"
                );
            }
            Ok(None) => {
                tracing::trace!("No archive jobs ready");
            }
            Err(e) => {
                tracing::error!("Failed to process archive job: {e}");
            }
        }
    }
}
