//! Shared test helpers.

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use lantern_database::migration::run_migrations;

/// In-memory SQLite pool with the full schema applied.
///
/// A single connection keeps the in-memory database alive for the whole
/// test.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    run_migrations(&pool).await.expect("Failed to run migrations");
    pool
}
