//! Catalog ingestion.
//!
//! Registers physical archive paths into the collapsed catalog: the
//! collapser resolves the category and public path, then every folder
//! level is found-or-created top-down and the physical directory is tied
//! to its logical folder via a real-folder row.

use std::sync::Arc;

use tracing::debug;

use lantern_core::error::AppError;
use lantern_core::result::AppResult;
use lantern_database::repositories::{CategoryRepository, FileRepository, FolderRepository};
use lantern_entity::category::Category;
use lantern_entity::file::{CreateFile, File};
use lantern_entity::folder::Folder;

use crate::collapse::PathCollapser;

/// Registers physical directories and files into the catalog.
#[derive(Debug, Clone)]
pub struct IngestService {
    collapser: PathCollapser,
    /// Archive root prefix, stripped from incoming physical paths.
    root: String,
    categories: Arc<CategoryRepository>,
    folders: Arc<FolderRepository>,
    files: Arc<FileRepository>,
}

impl IngestService {
    /// Create a new ingest service.
    pub fn new(
        collapser: PathCollapser,
        root: impl Into<String>,
        categories: Arc<CategoryRepository>,
        folders: Arc<FolderRepository>,
        files: Arc<FileRepository>,
    ) -> Self {
        Self {
            collapser,
            root: root.into().trim_end_matches('/').to_string(),
            categories,
            folders,
            files,
        }
    }

    /// Register a physical directory, creating its category and every
    /// folder level of its collapsed path, plus the real-folder mapping.
    /// Returns the leaf logical folder.
    pub async fn register_directory(&self, physical: &str) -> AppResult<Folder> {
        let rel = self.strip_root(physical);
        let collapsed = self.collapser.collapse(rel)?;
        let category = self.categories.find_or_create(&collapsed.category).await?;

        let folder = self
            .ensure_folder_chain(&category, &collapsed.public_path)
            .await?
            .ok_or_else(|| {
                AppError::internal(format!("Collapsed path is empty for '{physical}'"))
            })?;

        self.folders.find_or_create_real_folder(&folder, rel).await?;

        debug!(
            category = %category.name,
            public_path = %collapsed.public_path,
            full_path = %rel,
            "Registered directory"
        );
        Ok(folder)
    }

    /// Register a physical file, creating its parent folder chain as
    /// needed. Files collapsing to a single-segment public path have no
    /// containing folder.
    pub async fn register_file(&self, physical: &str) -> AppResult<File> {
        let rel = self.strip_root(physical);
        let collapsed = self.collapser.collapse(rel)?;
        let category = self.categories.find_or_create(&collapsed.category).await?;

        let parent = match collapsed.public_path.rsplit_once('/') {
            Some((public_dir, _)) => {
                let folder = self
                    .ensure_folder_chain(&category, public_dir)
                    .await?
                    .ok_or_else(|| {
                        AppError::internal(format!("Collapsed path is empty for '{physical}'"))
                    })?;
                if let Some((rel_dir, _)) = rel.rsplit_once('/') {
                    self.folders
                        .find_or_create_real_folder(&folder, rel_dir)
                        .await?;
                }
                Some(folder)
            }
            None => None,
        };

        let file = self
            .files
            .create(&CreateFile {
                category_id: category.id,
                folder_id: parent.as_ref().map(|f| f.id),
                public_path: collapsed.public_path.clone(),
                full_path: rel.to_string(),
                depth: collapsed.public_path.matches('/').count() as i64,
            })
            .await?;

        debug!(
            category = %category.name,
            public_path = %collapsed.public_path,
            "Registered file"
        );
        Ok(file)
    }

    /// Find-or-create every folder level of a public directory path,
    /// top-down, returning the leaf. `None` for an empty path.
    async fn ensure_folder_chain(
        &self,
        category: &Category,
        public_dir: &str,
    ) -> AppResult<Option<Folder>> {
        let mut parent: Option<Folder> = None;
        let mut path = String::new();
        for segment in public_dir.split('/').filter(|s| !s.is_empty()) {
            if !path.is_empty() {
                path.push('/');
            }
            path.push_str(segment);
            let folder = self
                .folders
                .find_or_create(category, parent.as_ref(), &path)
                .await?;
            parent = Some(folder);
        }
        Ok(parent)
    }

    fn strip_root<'a>(&self, physical: &'a str) -> &'a str {
        physical
            .strip_prefix(&self.root)
            .map(|rest| rest.trim_start_matches('/'))
            .unwrap_or(physical)
    }
}
