//! Archive-job processing for Lantern.
//!
//! This crate provides:
//! - The [`queue::ArchiveQueue`] enforcing enqueue validation and the
//!   clock/backoff retry policy over the job repository
//! - The [`handler::BundleHandler`] seam the bundle builder plugs into
//! - A [`runner::WorkerRunner`] that polls the queue until shut down

pub mod handler;
pub mod queue;
pub mod runner;

pub use handler::BundleHandler;
pub use queue::ArchiveQueue;
pub use runner::WorkerRunner;
