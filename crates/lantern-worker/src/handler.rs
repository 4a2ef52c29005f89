//! Bundle handler seam.

use async_trait::async_trait;

use lantern_entity::job::ArchiveJob;

/// Builds the requested bundle from `job.files` and notifies
/// `job.notification_emails`.
///
/// Implementations live outside the queue: the queue only decides *when*
/// and *for whom* the work happens. The return value is a business
/// signal, not an error: `true` marks the job done, `false` requeues it
/// after the backoff interval. A handler may block on slow I/O; the
/// worker claims one job per poll so this never starves the queue.
#[async_trait]
pub trait BundleHandler: Send + Sync {
    /// Attempt to build and deliver the bundle for one job.
    async fn handle(&self, job: &ArchiveJob) -> bool;
}
