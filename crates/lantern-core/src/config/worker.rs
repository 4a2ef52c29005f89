//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Archive-job worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the worker is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Interval in seconds between job queue polls.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// Delay in seconds before a failed job becomes eligible again.
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_seconds: u64,
    /// External command invoked to build and deliver a bundle. It receives
    /// the job id and notification addresses as arguments and the file
    /// list on stdin; exit status 0 marks the job done.
    #[serde(default)]
    pub bundle_command: Option<String>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            poll_interval_seconds: default_poll_interval(),
            retry_backoff_seconds: default_retry_backoff(),
            bundle_command: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_poll_interval() -> u64 {
    60
}

fn default_retry_backoff() -> u64 {
    3600
}
