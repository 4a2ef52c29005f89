//! Batch file lookup.

use std::sync::Arc;

use lantern_core::result::AppResult;
use lantern_database::repositories::{CategoryRepository, FileRepository};
use lantern_entity::file::File;

/// Bulk, order-independent lookup of file records by identifier.
///
/// The underlying query mechanism imposes a parameter-count ceiling, so
/// the file repository fetches in chunks; the combined result comes back
/// re-sorted by (depth asc, public path case-insensitive asc) with
/// categories resolved, never in request order.
#[derive(Debug, Clone)]
pub struct BatchFileFetcher {
    files: Arc<FileRepository>,
    categories: Arc<CategoryRepository>,
}

impl BatchFileFetcher {
    /// Create a new batch fetcher.
    pub fn new(files: Arc<FileRepository>, categories: Arc<CategoryRepository>) -> Self {
        Self { files, categories }
    }

    /// Fetch the files for the given ids.
    ///
    /// The output contains exactly the subset of requested ids that
    /// exist, each exactly once, in the catalog's deterministic order.
    pub async fn get_files_by_ids(&self, ids: &[i64]) -> AppResult<Vec<File>> {
        let mut files = self.files.find_by_ids(ids).await?;
        self.categories
            .populate_categories(&mut files, &mut [])
            .await?;
        Ok(files)
    }
}
