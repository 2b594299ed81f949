//! Batch soft delete and restore of a mixed folder/asset selection.
//!
//! Deleting a folder marks its whole subtree in chunks of 50: descendant
//! folders via the worklist of `find_all_descendant_ids`, contained
//! assets via the `id_path` prefix join. Everything stays in the table,
//! so a restore brings the subtree back.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use curator_core::types::{AssetId, FolderId};
use curator_core::{AppError, AppResult};
use curator_database::repositories::asset::AssetRepository;
use curator_database::repositories::folder::FolderRepository;
use curator_entity::asset::model::Asset;
use curator_entity::folder::model::Folder;

use crate::context::RequestContext;

/// Row counts from a batch trash operation.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionOutcome {
    /// Folder rows marked (or unmarked).
    pub folders: u64,
    /// Asset rows marked (or unmarked).
    pub assets: u64,
}

/// Soft-delete and restore over multi-select requests.
#[derive(Debug, Clone)]
pub struct SelectionService {
    /// Folder repository.
    folder_repo: Arc<FolderRepository>,
    /// Asset repository.
    asset_repo: Arc<AssetRepository>,
}

impl SelectionService {
    /// Creates a new selection service.
    pub fn new(folder_repo: Arc<FolderRepository>, asset_repo: Arc<AssetRepository>) -> Self {
        Self {
            folder_repo,
            asset_repo,
        }
    }

    /// Soft-delete a selection, folders cascading over their subtrees.
    ///
    /// Already-deleted and unknown ids are tolerated (the dashboard may
    /// re-fire a delete for rows that are already gone), so the operation
    /// is idempotent end to end.
    pub async fn soft_delete(
        &self,
        ctx: &RequestContext,
        item_ids: &[Uuid],
    ) -> AppResult<SelectionOutcome> {
        ctx.require_admin()?;
        if item_ids.is_empty() {
            return Err(AppError::validation("No items to delete"));
        }

        let folder_ids: Vec<FolderId> = item_ids.iter().map(|id| FolderId::from_uuid(*id)).collect();
        let asset_ids: Vec<AssetId> = item_ids.iter().map(|id| AssetId::from_uuid(*id)).collect();
        let (folders, assets) = tokio::try_join!(
            self.folder_repo.find_by_ids(&folder_ids, None),
            self.asset_repo.find_by_ids(&asset_ids),
        )?;

        // Expand each selected folder into its subtree of folder ids and
        // contained asset ids.
        let mut folder_set: HashSet<FolderId> = HashSet::new();
        let mut folders_to_mark: Vec<FolderId> = Vec::new();
        let mut assets_to_mark: Vec<AssetId> = assets.iter().map(|a| a.id).collect();
        let mut asset_set: HashSet<AssetId> = assets_to_mark.iter().copied().collect();

        for folder in &folders {
            for id in self.folder_repo.find_all_descendant_ids(folder.id).await? {
                if folder_set.insert(id) {
                    folders_to_mark.push(id);
                }
            }
            for asset in self
                .asset_repo
                .find_by_folder_subtree(&folder.id_path)
                .await?
            {
                if asset_set.insert(asset.id) {
                    assets_to_mark.push(asset.id);
                }
            }
        }

        let marked_folders = self
            .folder_repo
            .soft_delete_batch(&folders_to_mark, ctx.user_id)
            .await?;
        let marked_assets = self
            .asset_repo
            .soft_delete_batch(&assets_to_mark, ctx.user_id)
            .await?;

        self.adjust_parent_counters(&folders, &assets, -1).await?;

        info!(
            user_id = %ctx.user_id,
            folders = marked_folders,
            assets = marked_assets,
            "Selection soft-deleted"
        );
        Ok(SelectionOutcome {
            folders: marked_folders,
            assets: marked_assets,
        })
    }

    /// Restore a selection from the trash, folders cascading over their
    /// subtrees.
    ///
    /// An asset can only come back into a live folder; selected assets
    /// whose folder is still deleted are skipped.
    pub async fn restore(
        &self,
        ctx: &RequestContext,
        item_ids: &[Uuid],
    ) -> AppResult<SelectionOutcome> {
        ctx.require_admin()?;
        if item_ids.is_empty() {
            return Err(AppError::validation("No items to restore"));
        }

        let mut restored_folders = 0u64;
        let mut restored_assets = 0u64;
        let mut top_folders = Vec::new();
        let mut top_assets = Vec::new();

        // Trashed rows are invisible to the batch lookups, so each id is
        // resolved individually here.
        for id in item_ids {
            if let Some(folder) = self.folder_repo.find_by_id(FolderId::from_uuid(*id)).await? {
                restored_folders += self
                    .folder_repo
                    .restore_subtree(&folder.id_path, ctx.user_id)
                    .await?;
                restored_assets += self
                    .asset_repo
                    .restore_subtree(&folder.id_path, ctx.user_id)
                    .await?;
                top_folders.push(folder);
                continue;
            }
            if let Some(asset) = self.asset_repo.find_by_id(AssetId::from_uuid(*id)).await? {
                let folder_is_live = match asset.folder_id {
                    Some(folder_id) => self
                        .folder_repo
                        .find_by_id(folder_id)
                        .await?
                        .is_some_and(|f| !f.is_deleted()),
                    None => true,
                };
                if folder_is_live {
                    restored_assets += self
                        .asset_repo
                        .restore_batch(&[asset.id], ctx.user_id)
                        .await?;
                    top_assets.push(asset);
                }
            }
        }

        self.adjust_parent_counters(&top_folders, &top_assets, 1).await?;

        info!(
            user_id = %ctx.user_id,
            folders = restored_folders,
            assets = restored_assets,
            "Selection restored"
        );
        Ok(SelectionOutcome {
            folders: restored_folders,
            assets: restored_assets,
        })
    }

    /// Nudge the informational counters on the parents of the top-level
    /// selection. Counter drift inside the affected subtrees is left to
    /// the maintenance reconciliation.
    async fn adjust_parent_counters(
        &self,
        folders: &[Folder],
        assets: &[Asset],
        sign: i32,
    ) -> AppResult<()> {
        let mut deltas: HashMap<FolderId, (i32, i32)> = HashMap::new();
        for folder in folders {
            if let Some(parent) = folder.parent_id {
                deltas.entry(parent).or_default().0 += sign;
            }
        }
        for asset in assets {
            if let Some(folder_id) = asset.folder_id {
                deltas.entry(folder_id).or_default().1 += sign;
            }
        }
        for (folder_id, (child_delta, asset_delta)) in deltas {
            self.folder_repo
                .adjust_counters(folder_id, child_delta, asset_delta)
                .await?;
        }
        Ok(())
    }
}
