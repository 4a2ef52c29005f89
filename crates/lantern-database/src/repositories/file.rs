//! File repository implementation.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use lantern_core::error::{AppError, ErrorKind};
use lantern_core::result::AppResult;
use lantern_entity::category::Category;
use lantern_entity::file::{CreateFile, File};
use lantern_entity::folder::Folder;

use super::{contains_pattern, escape_like};

/// Maximum number of ids bound into a single `IN (...)` query. The engine
/// imposes a parameter-count ceiling, so larger requests are chunked.
const MAX_ID_BATCH: usize = 1000;

/// Repository for indexed archive files.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: SqlitePool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a file by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    /// Create a new file record.
    pub async fn create(&self, data: &CreateFile) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "INSERT INTO files (category_id, folder_id, public_path, full_path, depth) \
             VALUES (?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(data.category_id)
        .bind(data.folder_id)
        .bind(&data.public_path)
        .bind(&data.full_path)
        .bind(data.depth)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create file", e))
    }

    /// List the files directly inside `parent` within a category, capped
    /// at `limit`, along with the total count regardless of the cap.
    /// A parent of `None` means "top level".
    pub async fn find_in_folder(
        &self,
        category: &Category,
        parent: Option<&Folder>,
        limit: u64,
    ) -> AppResult<(Vec<File>, u64)> {
        let (count_query, select_query) = match parent {
            Some(_) => (
                "SELECT COUNT(*) FROM files WHERE category_id = ? AND folder_id = ?",
                "SELECT * FROM files WHERE category_id = ? AND folder_id = ? \
                 ORDER BY public_path COLLATE NOCASE ASC LIMIT ?",
            ),
            None => (
                "SELECT COUNT(*) FROM files WHERE category_id = ? AND folder_id IS NULL",
                "SELECT * FROM files WHERE category_id = ? AND folder_id IS NULL \
                 ORDER BY public_path COLLATE NOCASE ASC LIMIT ?",
            ),
        };

        let mut count_sel = sqlx::query_scalar::<_, i64>(count_query).bind(category.id);
        let mut sel = sqlx::query_as::<_, File>(select_query).bind(category.id);
        if let Some(parent) = parent {
            count_sel = count_sel.bind(parent.id);
            sel = sel.bind(parent.id);
        }
        sel = sel.bind(limit as i64);

        let total = count_sel
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count files", e))?;
        let files = sel
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))?;

        Ok((files, total as u64))
    }

    /// Search all files which are *descendants* of the given category/root
    /// whose public path contains `term`.
    ///
    /// Returns both the limit-capped result slice and the total match
    /// count, decoupled from the limit, so callers can paginate without
    /// re-querying. Folder objects are not filled in on the returned
    /// files; the containing folder is reconstructible from the path.
    pub async fn search(
        &self,
        category: &Category,
        root: Option<&Folder>,
        term: &str,
        limit: u64,
    ) -> AppResult<(Vec<File>, u64)> {
        let term_pattern = contains_pattern(term);
        let scope_pattern = root.map(|f| format!("{}/%", escape_like(&f.public_path)));

        let (count_query, select_query) = match scope_pattern {
            Some(_) => (
                "SELECT COUNT(*) FROM files WHERE category_id = ? \
                 AND public_path LIKE ? ESCAPE '\\' \
                 AND public_path LIKE ? ESCAPE '\\'",
                "SELECT * FROM files WHERE category_id = ? \
                 AND public_path LIKE ? ESCAPE '\\' \
                 AND public_path LIKE ? ESCAPE '\\' \
                 ORDER BY depth ASC, public_path COLLATE NOCASE ASC LIMIT ?",
            ),
            None => (
                "SELECT COUNT(*) FROM files WHERE category_id = ? \
                 AND public_path LIKE ? ESCAPE '\\'",
                "SELECT * FROM files WHERE category_id = ? \
                 AND public_path LIKE ? ESCAPE '\\' \
                 ORDER BY depth ASC, public_path COLLATE NOCASE ASC LIMIT ?",
            ),
        };

        let mut count_sel = sqlx::query_scalar::<_, i64>(count_query).bind(category.id);
        let mut sel = sqlx::query_as::<_, File>(select_query).bind(category.id);
        if let Some(scope) = &scope_pattern {
            count_sel = count_sel.bind(scope.clone());
            sel = sel.bind(scope.clone());
        }
        count_sel = count_sel.bind(term_pattern.clone());
        sel = sel.bind(term_pattern).bind(limit as i64);

        let total = count_sel.fetch_one(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count file matches", e)
        })?;
        let files = sel
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to search files", e))?;

        Ok((files, total as u64))
    }

    /// Fetch all files matching the given ids, in deterministic order.
    ///
    /// Requested ids are deduplicated, then fetched in chunks of at most
    /// [`MAX_ID_BATCH`] and the concatenated result is re-sorted by
    /// (depth asc, public path case-insensitive asc), never in request
    /// order. Each existing id appears exactly once; missing ids are
    /// silently absent.
    pub async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<File>> {
        // A repeated id landing in two different chunks would come back
        // twice, so dedup before chunking.
        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        let mut files = Vec::with_capacity(ids.len());

        for chunk in ids.chunks(MAX_ID_BATCH) {
            let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM files WHERE id IN (");
            let mut separated = qb.separated(", ");
            for id in chunk {
                separated.push_bind(*id);
            }
            qb.push(")");

            let chunk_files = qb
                .build_query_as::<File>()
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to fetch files by id", e)
                })?;
            files.extend(chunk_files);
        }

        // Chunk fetch order does not preserve anything useful, so impose
        // the catalog's canonical ordering after the fact.
        files.sort_by(|a, b| {
            a.depth.cmp(&b.depth).then_with(|| {
                a.public_path
                    .to_lowercase()
                    .cmp(&b.public_path.to_lowercase())
            })
        });

        Ok(files)
    }
}
