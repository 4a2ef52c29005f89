//! File entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::category::Category;

/// An indexed archive file.
///
/// Produced by the ingestion pipeline from inventory records; the catalog
/// treats file rows as read-mostly after creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Unique file identifier.
    pub id: i64,
    /// The category this file belongs to.
    pub category_id: i64,
    /// Containing logical folder (None for top-level files).
    pub folder_id: Option<i64>,
    /// Collapsed, user-facing path within the category.
    pub public_path: String,
    /// True archive-relative location of the file.
    pub full_path: String,
    /// Number of path separators in `public_path`.
    pub depth: i64,
    /// The owning category, filled in by `populate_categories`.
    #[sqlx(skip)]
    pub category: Option<Category>,
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// The owning category.
    pub category_id: i64,
    /// Containing logical folder (None for top-level files).
    pub folder_id: Option<i64>,
    /// Collapsed public path.
    pub public_path: String,
    /// Archive-relative physical path.
    pub full_path: String,
    /// Depth in the tree.
    pub depth: i64,
}
