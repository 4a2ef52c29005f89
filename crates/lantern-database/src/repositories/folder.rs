//! Folder repository implementation.

use sqlx::SqlitePool;

use lantern_core::error::{AppError, ErrorKind};
use lantern_core::result::AppResult;
use lantern_entity::category::Category;
use lantern_entity::folder::{Folder, RealFolder};

use super::{contains_pattern, escape_like};

/// Repository for the collapsed logical folder tree and the mapping from
/// physical directories onto it.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: SqlitePool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a folder by category and public path.
    pub async fn find_by_path(
        &self,
        category: &Category,
        public_path: &str,
    ) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE category_id = ? AND public_path = ?",
        )
        .bind(category.id)
        .bind(public_path)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder by path", e))
    }

    /// Find the folder at `public_path` under `parent`, creating it if absent.
    ///
    /// The `(category, public_path)` pair uniquely determines a folder. If
    /// a folder already exists there under a *different* parent, this is a
    /// data-integrity violation (an ingestion or grammar bug silently
    /// reparenting history) and the operation fails without touching the
    /// existing row. Lookup and insert share one transaction.
    pub async fn find_or_create(
        &self,
        category: &Category,
        parent: Option<&Folder>,
        public_path: &str,
    ) -> AppResult<Folder> {
        let parent_id = parent.map(|f| f.id);

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let existing = sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE category_id = ? AND public_path = ?",
        )
        .bind(category.id)
        .bind(public_path)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))?;

        let folder = match existing {
            Some(folder) => {
                if folder.parent_id != parent_id {
                    return Err(AppError::conflict(format!(
                        "Folder '{public_path}' already exists under a different parent"
                    )));
                }
                folder
            }
            None => {
                let name = public_path.rsplit('/').next().unwrap_or(public_path);
                let depth = public_path.matches('/').count() as i64;
                sqlx::query_as::<_, Folder>(
                    "INSERT INTO folders (category_id, parent_id, name, public_path, depth) \
                     VALUES (?, ?, ?, ?, ?) RETURNING *",
                )
                .bind(category.id)
                .bind(parent_id)
                .bind(name)
                .bind(public_path)
                .bind(depth)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to create folder", e)
                })?
            }
        };

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        Ok(folder)
    }

    /// Find the real-folder row mapping `full_path` onto `folder`,
    /// creating it if absent.
    ///
    /// A physical directory maps to exactly one logical folder forever;
    /// an attempt to register the same path under a different folder fails
    /// with a conflict. Many distinct physical directories collapsing onto
    /// one folder is expected and fine.
    pub async fn find_or_create_real_folder(
        &self,
        folder: &Folder,
        full_path: &str,
    ) -> AppResult<RealFolder> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let existing =
            sqlx::query_as::<_, RealFolder>("SELECT * FROM real_folders WHERE full_path = ?")
                .bind(full_path)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to find real folder", e)
                })?;

        let real_folder = match existing {
            Some(real_folder) => {
                if real_folder.folder_id != folder.id {
                    return Err(AppError::conflict(format!(
                        "Physical directory '{full_path}' is already mapped to a different folder"
                    )));
                }
                real_folder
            }
            None => sqlx::query_as::<_, RealFolder>(
                "INSERT INTO real_folders (folder_id, full_path) VALUES (?, ?) RETURNING *",
            )
            .bind(folder.id)
            .bind(full_path)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to create real folder", e)
            })?,
        };

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        Ok(real_folder)
    }

    /// List the immediate child folders of `parent` within a category.
    /// A parent of `None` means "top level".
    pub async fn find_children(
        &self,
        category: &Category,
        parent: Option<&Folder>,
    ) -> AppResult<Vec<Folder>> {
        let query = match parent {
            Some(_) => {
                "SELECT * FROM folders WHERE category_id = ? AND parent_id = ? \
                 ORDER BY name COLLATE NOCASE ASC"
            }
            None => {
                "SELECT * FROM folders WHERE category_id = ? AND parent_id IS NULL \
                 ORDER BY name COLLATE NOCASE ASC"
            }
        };

        let mut sel = sqlx::query_as::<_, Folder>(query).bind(category.id);
        if let Some(parent) = parent {
            sel = sel.bind(parent.id);
        }

        sel.fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folders", e))
    }

    /// Search all folders which are *descendants* of the given
    /// category/root whose name contains `term`.
    ///
    /// Returns both the limit-capped result slice and the total match
    /// count, so callers can paginate without re-querying. Category and
    /// parent objects are not filled in on the returned folders; both are
    /// reconstructible from the path alone.
    pub async fn search(
        &self,
        category: &Category,
        root: Option<&Folder>,
        term: &str,
        limit: u64,
    ) -> AppResult<(Vec<Folder>, u64)> {
        let name_pattern = contains_pattern(term);
        let scope_pattern = root.map(|f| format!("{}/%", escape_like(&f.public_path)));

        let (count_query, select_query) = match scope_pattern {
            Some(_) => (
                "SELECT COUNT(*) FROM folders WHERE category_id = ? \
                 AND public_path LIKE ? ESCAPE '\\' \
                 AND name LIKE ? ESCAPE '\\'",
                "SELECT * FROM folders WHERE category_id = ? \
                 AND public_path LIKE ? ESCAPE '\\' \
                 AND name LIKE ? ESCAPE '\\' \
                 ORDER BY depth ASC, public_path COLLATE NOCASE ASC LIMIT ?",
            ),
            None => (
                "SELECT COUNT(*) FROM folders WHERE category_id = ? \
                 AND name LIKE ? ESCAPE '\\'",
                "SELECT * FROM folders WHERE category_id = ? \
                 AND name LIKE ? ESCAPE '\\' \
                 ORDER BY depth ASC, public_path COLLATE NOCASE ASC LIMIT ?",
            ),
        };

        let mut count_sel = sqlx::query_scalar::<_, i64>(count_query).bind(category.id);
        let mut sel = sqlx::query_as::<_, Folder>(select_query).bind(category.id);
        if let Some(scope) = &scope_pattern {
            count_sel = count_sel.bind(scope.clone());
            sel = sel.bind(scope.clone());
        }
        count_sel = count_sel.bind(name_pattern.clone());
        sel = sel.bind(name_pattern).bind(limit as i64);

        let total = count_sel.fetch_one(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count folder matches", e)
        })?;
        let folders = sel
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to search folders", e))?;

        Ok((folders, total as u64))
    }
}
