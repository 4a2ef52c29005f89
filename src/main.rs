//! Lantern: archive catalog and bundle-request daemon.
//!
//! Entry point that wires the crates together: configuration, logging,
//! database, ingestion, and the archive-job worker.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use lantern_core::clock::SystemClock;
use lantern_core::config::{AppConfig, WorkerConfig};
use lantern_core::error::AppError;
use lantern_database::DatabasePool;
use lantern_database::repositories::{
    ArchiveJobRepository, CategoryRepository, FileRepository, FolderRepository,
};
use lantern_service::collapse::{PathCollapser, PathGrammar};
use lantern_service::ingest::IngestService;
use lantern_worker::{ArchiveQueue, WorkerRunner};

mod bundler;

#[derive(Parser)]
#[command(name = "lantern-server", about = "Archive catalog and bundle-request daemon")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register physical paths (one per line on stdin; directories end
    /// with a trailing slash) into the catalog.
    Ingest,
    /// Poll the archive-job queue until shut down.
    Work,
    /// Run pending database migrations and exit.
    Migrate,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let env = std::env::var("LANTERN_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(cli, config).await {
        tracing::error!("Fatal: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt().json().with_env_filter(filter).with_target(true).init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

async fn run(cli: Cli, config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Lantern v{}", env!("CARGO_PKG_VERSION"));

    // The grammar is validated before any path or job is touched.
    let grammar = PathGrammar::parse(&config.archive.path_grammar)?;

    let db = DatabasePool::connect(&config.database).await?;
    lantern_database::migration::run_migrations(db.pool()).await?;
    let pool = db.pool().clone();

    let result = match cli.command {
        Commands::Migrate => Ok(()),
        Commands::Ingest => {
            let categories = Arc::new(CategoryRepository::new(pool.clone()));
            let folders = Arc::new(FolderRepository::new(pool.clone()));
            let files = Arc::new(FileRepository::new(pool.clone()));
            let ingest = IngestService::new(
                PathCollapser::new(grammar),
                config.archive.root.clone(),
                categories,
                folders,
                files,
            );

            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            let mut count = 0u64;
            while let Some(line) = lines
                .next_line()
                .await
                .map_err(|e| AppError::internal(format!("Failed to read input: {e}")))?
            {
                let path = line.trim();
                if path.is_empty() {
                    continue;
                }
                if let Some(dir) = path.strip_suffix('/') {
                    ingest.register_directory(dir).await?;
                } else {
                    ingest.register_file(path).await?;
                }
                count += 1;
            }
            tracing::info!(count, "Ingest complete");
            Ok(())
        }
        Commands::Work => {
            let Some(command) = worker_command(&config.worker)? else {
                tracing::info!("Worker disabled by configuration");
                db.close().await;
                return Ok(());
            };

            let repo = Arc::new(ArchiveJobRepository::new(pool.clone()));
            let queue = Arc::new(ArchiveQueue::new(
                repo,
                Arc::new(SystemClock),
                chrono::Duration::seconds(config.worker.retry_backoff_seconds as i64),
            ));
            let handler = Arc::new(bundler::ExecBundleHandler::new(command));
            let runner = WorkerRunner::new(queue, handler, config.worker.clone());

            let (shutdown_tx, shutdown_rx) = watch::channel(false);
            let worker = tokio::spawn(async move {
                runner.run(shutdown_rx).await;
            });

            shutdown_signal().await;
            tracing::info!("Shutdown signal received");
            let _ = shutdown_tx.send(true);
            let _ = tokio::time::timeout(std::time::Duration::from_secs(30), worker).await;

            tracing::info!("Lantern shut down gracefully");
            Ok(())
        }
    };

    db.close().await;
    result
}

/// Resolve the worker's bundle command. A disabled worker needs no
/// command at all; an enabled one must have it configured.
fn worker_command(worker: &WorkerConfig) -> Result<Option<String>, AppError> {
    if !worker.enabled {
        return Ok(None);
    }
    match &worker.bundle_command {
        Some(command) => Ok(Some(command.clone())),
        None => Err(AppError::configuration(
            "worker.bundle_command must be set to run the worker",
        )),
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lantern_core::error::ErrorKind;

    #[test]
    fn disabled_worker_needs_no_bundle_command() {
        let worker = WorkerConfig {
            enabled: false,
            bundle_command: None,
            ..WorkerConfig::default()
        };
        assert!(worker_command(&worker).unwrap().is_none());
    }

    #[test]
    fn enabled_worker_without_bundle_command_is_a_configuration_error() {
        let worker = WorkerConfig {
            enabled: true,
            bundle_command: None,
            ..WorkerConfig::default()
        };
        let err = worker_command(&worker).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn enabled_worker_resolves_its_bundle_command() {
        let worker = WorkerConfig {
            enabled: true,
            bundle_command: Some("/usr/local/bin/build-bundle".to_string()),
            ..WorkerConfig::default()
        };
        assert_eq!(
            worker_command(&worker).unwrap().as_deref(),
            Some("/usr/local/bin/build-bundle")
        );
    }
}
