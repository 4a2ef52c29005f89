//! Folder entity models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::category::Category;

/// A logical folder in the collapsed tree.
///
/// Many physical directories may collapse onto a single logical folder;
/// the `(category_id, public_path)` pair uniquely determines it. An
/// existing folder is never reparented.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: i64,
    /// The category this folder belongs to.
    pub category_id: i64,
    /// Parent folder ID (None for top-level folders).
    pub parent_id: Option<i64>,
    /// Folder name (final path segment).
    pub name: String,
    /// Collapsed, user-facing path within the category.
    pub public_path: String,
    /// Number of path separators in `public_path`.
    pub depth: i64,
    /// The owning category, filled in by `populate_categories`.
    #[sqlx(skip)]
    pub category: Option<Category>,
}

impl Folder {
    /// Check if this is a top-level folder (no parent).
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// A physical directory that collapses onto a logical [`Folder`].
///
/// The relation is strictly many-to-one: a given `full_path` always maps
/// to the same folder once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RealFolder {
    /// Unique identifier.
    pub id: i64,
    /// The logical folder this physical directory collapses into.
    pub folder_id: i64,
    /// Archive-root-relative physical directory path.
    pub full_path: String,
}
