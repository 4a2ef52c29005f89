//! External bundle command handler.
//!
//! Bundle construction and notification delivery are not this process's
//! job: the worker hands each ready job to a configured external command
//! and treats its exit status as the success signal. The command receives
//! the notification addresses as arguments and the file list on stdin,
//! one path per line.

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use lantern_entity::job::ArchiveJob;
use lantern_worker::handler::BundleHandler;

/// Runs the configured bundle command for each claimed job.
pub struct ExecBundleHandler {
    command: String,
}

impl ExecBundleHandler {
    /// Create a handler spawning `command` per job.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

#[async_trait]
impl BundleHandler for ExecBundleHandler {
    async fn handle(&self, job: &ArchiveJob) -> bool {
        let mut child = match Command::new(&self.command)
            .arg(job.id.to_string())
            .args(&job.notification_emails)
            .stdin(std::process::Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                tracing::error!(job_id = job.id, "Failed to spawn bundle command: {e}");
                return false;
            }
        };

        if let Some(mut stdin) = child.stdin.take() {
            let payload = job.files.join("\n") + "\n";
            if let Err(e) = stdin.write_all(payload.as_bytes()).await {
                tracing::error!(job_id = job.id, "Failed to write file list: {e}");
                return false;
            }
        }

        match child.wait().await {
            Ok(status) => status.success(),
            Err(e) => {
                tracing::error!(job_id = job.id, "Bundle command did not exit cleanly: {e}");
                false
            }
        }
    }
}
