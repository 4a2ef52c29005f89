//! Category repository implementation.

use std::collections::HashMap;

use sqlx::SqlitePool;

use lantern_core::error::{AppError, ErrorKind};
use lantern_core::result::AppResult;
use lantern_entity::category::Category;
use lantern_entity::file::File;
use lantern_entity::folder::Folder;

/// Repository for category lookup and lazy creation.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Create a new category repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a category by exact (case-sensitive) name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find category", e))
    }

    /// Find the category with the given name, creating it if absent.
    ///
    /// Lookup and insert share one transaction so a failed create never
    /// leaves a half-visible row. Idempotent for a single writer.
    pub async fn find_or_create(&self, name: &str) -> AppResult<Category> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let existing = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE name = ?")
            .bind(name)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find category", e)
            })?;

        let category = match existing {
            Some(category) => category,
            None => sqlx::query_as::<_, Category>(
                "INSERT INTO categories (name) VALUES (?) RETURNING *",
            )
            .bind(name)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to create category", e)
            })?,
        };

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        Ok(category)
    }

    /// List all categories, ordered case-insensitively by name.
    pub async fn list_all(&self) -> AppResult<Vec<Category>> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name COLLATE NOCASE ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list categories", e)
            })
    }

    /// Fill in the category data for all passed-in files and folders.
    ///
    /// One full category listing builds an id lookup map, avoiding a
    /// query per record.
    pub async fn populate_categories(
        &self,
        files: &mut [File],
        folders: &mut [Folder],
    ) -> AppResult<()> {
        let lookup: HashMap<i64, Category> = self
            .list_all()
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        for file in files.iter_mut() {
            file.category = lookup.get(&file.category_id).cloned();
        }
        for folder in folders.iter_mut() {
            folder.category = lookup.get(&folder.category_id).cloned();
        }
        Ok(())
    }
}
