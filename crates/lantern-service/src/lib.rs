//! # lantern-service
//!
//! Domain services for Lantern:
//! - the pure path-collapsing resolver that maps physical archive paths
//!   onto (category, public path) pairs via a configurable path grammar
//! - the ingest service that registers physical directories and files
//!   into the catalog through the collapser
//! - the batch file fetcher used to resolve bundle selections

pub mod collapse;
pub mod fetch;
pub mod ingest;

pub use collapse::{CollapsedPath, PathCollapser, PathGrammar, SegmentRole};
pub use fetch::BatchFileFetcher;
pub use ingest::IngestService;
