//! Category entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A top-level named grouping of the archive hierarchy (e.g., a project).
///
/// Categories are created lazily on first reference and are never deleted
/// or renamed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Category {
    /// Unique category identifier.
    pub id: i64,
    /// Category name, unique across the archive.
    pub name: String,
}
