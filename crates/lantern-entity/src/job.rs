//! Archive job entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted bundle request.
///
/// `created_at` and the two lists are immutable after creation;
/// `next_attempt_at` only ever moves forward; `processed` flips to true
/// exactly once and the row is then retained as an audit record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ArchiveJob {
    /// Unique job identifier.
    pub id: i64,
    /// When the job was enqueued. Never changes.
    pub created_at: DateTime<Utc>,
    /// Earliest time the job may next be attempted.
    pub next_attempt_at: DateTime<Utc>,
    /// Ordered list of absolute file paths to bundle.
    #[sqlx(json)]
    pub files: Vec<String>,
    /// Ordered list of notification email addresses.
    #[sqlx(json)]
    pub notification_emails: Vec<String>,
    /// Whether the bundle was built and delivered successfully.
    pub processed: bool,
}

impl ArchiveJob {
    /// Check if the job is eligible for processing at the given time.
    pub fn is_ready(&self, now: DateTime<Utc>) -> bool {
        !self.processed && self.next_attempt_at <= now
    }
}

/// Data required to enqueue a new archive job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateArchiveJob {
    /// Ordered list of absolute file paths to bundle.
    pub files: Vec<String>,
    /// Ordered list of notification email addresses.
    pub notification_emails: Vec<String>,
}
