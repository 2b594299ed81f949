//! Folder CRUD with path derivation and rename cascading.

use std::sync::Arc;

use tracing::{info, warn};

use curator_core::types::{FolderId, SortDirection, SortKey};
use curator_core::{AppError, AppResult};
use curator_database::repositories::asset::AssetRepository;
use curator_database::repositories::folder::{DeletedSubtree, FolderRepository};
use curator_entity::folder::model::{CreateFolder, Folder, FolderFieldsUpdate};
use curator_entity::folder::path::{build_id_path, build_path};

use crate::context::RequestContext;

/// Manages folder CRUD operations.
#[derive(Debug, Clone)]
pub struct FolderService {
    /// Folder repository.
    folder_repo: Arc<FolderRepository>,
    /// Asset repository (emptiness checks before non-recursive deletes).
    asset_repo: Arc<AssetRepository>,
}

/// Request to create a new folder.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    /// Folder name.
    pub name: String,
    /// Parent folder ID (None for root-level).
    pub parent_id: Option<FolderId>,
    /// Optional description.
    pub description: Option<String>,
}

/// Request to update a folder.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFolderRequest {
    /// New name (triggers the rename cascade when it differs).
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(folder_repo: Arc<FolderRepository>, asset_repo: Arc<AssetRepository>) -> Self {
        Self {
            folder_repo,
            asset_repo,
        }
    }

    /// Gets a live folder by ID.
    pub async fn get_folder(&self, ctx: &RequestContext, id: FolderId) -> AppResult<Folder> {
        ctx.require_admin()?;
        self.find_live(id).await
    }

    /// Lists direct children of a folder (None = root level).
    pub async fn list_children(
        &self,
        ctx: &RequestContext,
        parent_id: Option<FolderId>,
        query: Option<&str>,
        sort_by: SortKey,
        sort_order: SortDirection,
    ) -> AppResult<Vec<Folder>> {
        ctx.require_admin()?;
        if let Some(id) = parent_id {
            self.find_live(id).await?;
        }
        self.folder_repo
            .find_children(parent_id, query, sort_by, sort_order)
            .await
    }

    /// Creates a new folder with derived `path` and `id_path`.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        req: CreateFolderRequest,
    ) -> AppResult<Folder> {
        ctx.require_admin()?;

        let parent = match req.parent_id {
            Some(parent_id) => Some(
                self.folder_repo
                    .find_by_id(parent_id)
                    .await?
                    .filter(|f| !f.is_deleted())
                    .ok_or_else(|| {
                        AppError::not_found(format!("Parent folder {parent_id} not found"))
                    })?,
            ),
            None => None,
        };

        let id = FolderId::new();
        let path = build_path(parent.as_ref().map(|p| p.path.as_str()), &req.name)?;
        let id_path = build_id_path(parent.as_ref().map(|p| p.id_path.as_str()), id);

        // Sibling-name uniqueness among live rows; paths encode exactly that.
        if self.folder_repo.find_by_path(&path).await?.is_some() {
            return Err(AppError::conflict(format!(
                "A folder named '{}' already exists here",
                req.name
            )));
        }

        let folder = self
            .folder_repo
            .create(&CreateFolder {
                id,
                name: req.name,
                parent_id: req.parent_id,
                path,
                id_path,
                description: req.description,
                created_by: ctx.user_id,
            })
            .await?;

        if let Some(parent) = &parent {
            self.folder_repo.adjust_counters(parent.id, 1, 0).await?;
        }

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder.id,
            path = %folder.path,
            "Folder created"
        );
        Ok(folder)
    }

    /// Edits a folder.
    ///
    /// A changed name runs the full rename flow: new path derived,
    /// sibling collision checked, own row rewritten, then every
    /// descendant's `path` prefix rewritten. `id_path` is never touched by
    /// a rename.
    pub async fn update_folder(
        &self,
        ctx: &RequestContext,
        id: FolderId,
        req: UpdateFolderRequest,
    ) -> AppResult<Folder> {
        ctx.require_admin()?;
        let folder = self.find_live(id).await?;

        let renaming = req
            .name
            .as_deref()
            .is_some_and(|name| name != folder.name);

        if !renaming {
            return self
                .folder_repo
                .update_fields(
                    id,
                    &FolderFieldsUpdate {
                        name: None,
                        description: req.description,
                    },
                    ctx.user_id,
                )
                .await;
        }

        let new_name = req.name.as_deref().unwrap_or(&folder.name);
        let parent_path = folder
            .path
            .rfind('/')
            .filter(|pos| *pos > 0)
            .map(|pos| folder.path[..pos].to_string());
        let old_path = folder.path.clone();
        let new_path = build_path(parent_path.as_deref(), new_name)?;

        if let Some(existing) = self.folder_repo.find_by_path(&new_path).await? {
            if existing.id != id {
                return Err(AppError::conflict(format!(
                    "A folder named '{new_name}' already exists here"
                )));
            }
        }

        let mut renamed = self
            .folder_repo
            .update_name(id, new_name, &new_path, ctx.user_id)
            .await?;

        // Rewrite descendants. The folder's own row is already consistent,
        // so a failure here is a detectable, repairable inconsistency
        // rather than a silent one.
        let rewritten = self
            .folder_repo
            .update_path_recursively(&old_path, &new_path)
            .await
            .map_err(|e| {
                warn!(folder_id = %id, error = %e, "Rename cascade failed; subtree paths need repair");
                AppError::consistency(format!(
                    "Folder was renamed but descendant paths were not rewritten: {e}. \
                     Run the maintenance path repair."
                ))
            })?;

        if req.description.is_some() {
            renamed = self
                .folder_repo
                .update_fields(
                    id,
                    &FolderFieldsUpdate {
                        name: None,
                        description: req.description,
                    },
                    ctx.user_id,
                )
                .await?;
        }

        info!(
            user_id = %ctx.user_id,
            folder_id = %id,
            old_path = %old_path,
            new_path = %new_path,
            descendants_rewritten = rewritten,
            "Folder renamed"
        );
        Ok(renamed)
    }

    /// Deletes a folder permanently.
    ///
    /// Non-recursive deletion only removes an empty folder; `recursive`
    /// purges the folder, every descendant folder, and all contained
    /// assets.
    pub async fn delete_folder(
        &self,
        ctx: &RequestContext,
        id: FolderId,
        recursive: bool,
    ) -> AppResult<DeletedSubtree> {
        ctx.require_admin()?;
        let folder = self
            .folder_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;

        let report = if recursive {
            self.folder_repo.delete_recursively(id).await?
        } else {
            let children = self.folder_repo.find_subtree_for_rewrite(&folder.id_path);
            let assets = self.asset_repo.find_by_folder_subtree(&folder.id_path);
            let (children, assets) = tokio::try_join!(children, assets)?;
            if !children.is_empty() || !assets.is_empty() {
                return Err(AppError::validation(
                    "Folder is not empty; delete recursively to remove its contents",
                ));
            }
            let removed = self.folder_repo.delete(id).await?;
            DeletedSubtree {
                folders: u64::from(removed),
                assets: 0,
            }
        };

        if let Some(parent_id) = folder.parent_id {
            self.folder_repo.adjust_counters(parent_id, -1, 0).await?;
        }

        info!(
            user_id = %ctx.user_id,
            folder_id = %id,
            path = %folder.path,
            folders = report.folders,
            assets = report.assets,
            "Folder deleted"
        );
        Ok(report)
    }

    /// All live descendants of a folder, any depth, for the tree view.
    ///
    /// One `id_path` prefix query regardless of depth.
    pub async fn list_descendants(
        &self,
        ctx: &RequestContext,
        id: FolderId,
    ) -> AppResult<Vec<Folder>> {
        ctx.require_admin()?;
        let folder = self.find_live(id).await?;
        self.folder_repo
            .find_descendants_by_id_path(&folder.id_path)
            .await
    }

    /// Unfiltered folder dump for the admin surface.
    pub async fn list_all(&self, ctx: &RequestContext) -> AppResult<Vec<Folder>> {
        ctx.require_admin()?;
        self.folder_repo.list_all().await
    }

    async fn find_live(&self, id: FolderId) -> AppResult<Folder> {
        let folder = self
            .folder_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;
        if folder.is_deleted() {
            return Err(AppError::not_found(format!("Folder {id} not found")));
        }
        Ok(folder)
    }
}
