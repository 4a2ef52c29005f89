//! # lantern-database
//!
//! SQLite database connection management and concrete repository
//! implementations for all Lantern entities.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
