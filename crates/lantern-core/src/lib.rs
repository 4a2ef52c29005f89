//! # lantern-core
//!
//! Core crate for Lantern. Contains configuration schemas, the clock
//! abstraction, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Lantern crates.

pub mod clock;
pub mod config;
pub mod error;
pub mod result;

pub use error::AppError;
pub use result::AppResult;
