//! Multi-select move: relocate folders and assets into a new parent.
//!
//! Two-phase by construction. Phase one reads everything the move will
//! touch and computes the complete set of row rewrites, including the
//! `path`/`id_path` prefix rewrite for every descendant of every moved
//! folder, rejecting invalid moves before anything is written. Phase two
//! hands the plan to the transfer repository, which applies it in one
//! transaction.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use curator_core::types::{AssetId, FolderId, SortDirection, SortKey, UserId};
use curator_core::{AppError, AppResult};
use curator_database::repositories::asset::AssetRepository;
use curator_database::repositories::folder::FolderRepository;
use curator_database::repositories::transfer::{
    CounterDelta, MovePlan, MoveReport, TransferRepository,
};
use curator_entity::asset::model::Asset;
use curator_entity::folder::model::{Folder, FolderStructureUpdate};
use curator_entity::folder::path::{build_id_path, build_path, replace_path_prefix, starts_within};

use crate::context::RequestContext;

/// What a completed move reports back.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveOutcome {
    /// Asset rows repointed.
    pub moved_assets: u64,
    /// Folders relocated.
    pub moved_folders: u64,
    /// Both together.
    pub total_items: u64,
}

/// Orchestrates multi-select moves.
#[derive(Debug, Clone)]
pub struct TransferService {
    /// Folder repository.
    folder_repo: Arc<FolderRepository>,
    /// Asset repository.
    asset_repo: Arc<AssetRepository>,
    /// Transactional plan application.
    transfer_repo: Arc<TransferRepository>,
}

impl TransferService {
    /// Creates a new transfer service.
    pub fn new(
        folder_repo: Arc<FolderRepository>,
        asset_repo: Arc<AssetRepository>,
        transfer_repo: Arc<TransferRepository>,
    ) -> Self {
        Self {
            folder_repo,
            asset_repo,
            transfer_repo,
        }
    }

    /// Move a selection of folders and assets into `target_folder_id`
    /// (None = library root).
    pub async fn move_items(
        &self,
        ctx: &RequestContext,
        item_ids: &[Uuid],
        target_folder_id: Option<FolderId>,
    ) -> AppResult<MoveOutcome> {
        ctx.require_admin()?;
        if item_ids.is_empty() {
            return Err(AppError::validation("No items to move"));
        }

        let mut seen = HashSet::new();
        let unique: Vec<Uuid> = item_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();

        // The target being part of the selection is rejected before any
        // lookups; the descendant case is caught by the planner below.
        if let Some(target) = target_folder_id {
            if unique.contains(target.as_uuid()) {
                return Err(AppError::validation("Cannot move a folder into itself"));
            }
        }

        let target = match target_folder_id {
            Some(id) => Some(
                self.folder_repo
                    .find_by_id(id)
                    .await?
                    .filter(|f| !f.is_deleted())
                    .ok_or_else(|| AppError::not_found(format!("Target folder {id} not found")))?,
            ),
            None => None,
        };

        // Ids arrive untyped; each one resolves as a folder, an asset, or
        // not at all.
        let folder_ids: Vec<FolderId> = unique.iter().map(|id| FolderId::from_uuid(*id)).collect();
        let asset_ids: Vec<AssetId> = unique.iter().map(|id| AssetId::from_uuid(*id)).collect();
        let (folders, assets) = tokio::try_join!(
            self.folder_repo.find_by_ids(&folder_ids, None),
            self.asset_repo.find_by_ids(&asset_ids),
        )?;

        let resolved: HashSet<Uuid> = folders
            .iter()
            .map(|f| f.id.into_uuid())
            .chain(assets.iter().map(|a| a.id.into_uuid()))
            .collect();
        let missing: Vec<String> = unique
            .iter()
            .filter(|id| !resolved.contains(id))
            .map(Uuid::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(AppError::not_found(format!(
                "Unknown items: {}",
                missing.join(", ")
            )));
        }

        // Live names already present in the target, the moved set excluded.
        let moved_folder_ids: HashSet<FolderId> = folders.iter().map(|f| f.id).collect();
        let occupied_names: HashSet<String> = self
            .folder_repo
            .find_children(target_folder_id, None, SortKey::Name, SortDirection::Asc)
            .await?
            .into_iter()
            .filter(|f| !moved_folder_ids.contains(&f.id))
            .map(|f| f.name)
            .collect();

        let mut descendants = Vec::with_capacity(folders.len());
        for folder in &folders {
            descendants.push(
                self.folder_repo
                    .find_subtree_for_rewrite(&folder.id_path)
                    .await?,
            );
        }

        let plan = plan_move(
            ctx.user_id,
            target.as_ref(),
            &folders,
            &descendants,
            &assets,
            &occupied_names,
        )?;

        // A lone empty folder is one row; skip the transaction.
        let single_folder =
            plan.asset_ids.is_empty() && plan.descendant_updates.is_empty() && folders.len() == 1;
        let report = if single_folder {
            let update = &plan.folder_updates[0];
            self.folder_repo
                .update_structure(
                    update.id,
                    update.parent_id,
                    &update.path,
                    &update.id_path,
                    ctx.user_id,
                )
                .await?;
            for delta in &plan.counter_deltas {
                self.folder_repo
                    .adjust_counters(delta.folder_id, delta.child_delta, delta.asset_delta)
                    .await?;
            }
            MoveReport {
                moved_assets: 0,
                moved_folders: 1,
            }
        } else {
            self.transfer_repo.apply_move(&plan).await?
        };

        info!(
            user_id = %ctx.user_id,
            target = ?target_folder_id,
            moved_assets = report.moved_assets,
            moved_folders = report.moved_folders,
            "Selection moved"
        );

        Ok(MoveOutcome {
            moved_assets: report.moved_assets,
            moved_folders: report.moved_folders,
            total_items: report.moved_assets + report.moved_folders,
        })
    }
}

/// Compute everything a move will write, or reject it. Pure.
///
/// `descendants` is parallel to `folders` and carries each folder's full
/// subtree (soft-deleted rows included, so a later restore comes back
/// consistent). `occupied_names` holds the live names already present in
/// the target with the moved set excluded.
fn plan_move(
    moved_by: UserId,
    target: Option<&Folder>,
    folders: &[Folder],
    descendants: &[Vec<Folder>],
    assets: &[Asset],
    occupied_names: &HashSet<String>,
) -> AppResult<MovePlan> {
    if let Some(target) = target {
        for folder in folders {
            if starts_within(&target.id_path, &folder.id_path) {
                return Err(AppError::validation(
                    "Cannot move a folder into itself or one of its descendants",
                ));
            }
        }
    }

    let mut names_taken = occupied_names.clone();
    for folder in folders {
        if !names_taken.insert(folder.name.clone()) {
            return Err(AppError::conflict(format!(
                "A folder named '{}' already exists in the target",
                folder.name
            )));
        }
    }

    let target_id = target.map(|t| t.id);
    let target_path = target.map(|t| t.path.as_str());
    let target_id_path = target.map(|t| t.id_path.as_str());

    let mut folder_updates = Vec::with_capacity(folders.len());
    let mut descendant_updates = Vec::new();
    let mut counters: HashMap<FolderId, (i32, i32)> = HashMap::new();

    for (folder, subtree) in folders.iter().zip(descendants) {
        let new_path = build_path(target_path, &folder.name)?;
        let new_id_path = build_id_path(target_id_path, folder.id);

        for row in subtree {
            descendant_updates.push(FolderStructureUpdate {
                id: row.id,
                parent_id: row.parent_id,
                path: replace_path_prefix(&row.path, &folder.path, &new_path),
                id_path: replace_path_prefix(&row.id_path, &folder.id_path, &new_id_path),
            });
        }

        folder_updates.push(FolderStructureUpdate {
            id: folder.id,
            parent_id: target_id,
            path: new_path,
            id_path: new_id_path,
        });

        if folder.parent_id != target_id {
            if let Some(old_parent) = folder.parent_id {
                counters.entry(old_parent).or_default().0 -= 1;
            }
            if let Some(target_id) = target_id {
                counters.entry(target_id).or_default().0 += 1;
            }
        }
    }

    for asset in assets {
        if asset.folder_id != target_id {
            if let Some(old_folder) = asset.folder_id {
                counters.entry(old_folder).or_default().1 -= 1;
            }
            if let Some(target_id) = target_id {
                counters.entry(target_id).or_default().1 += 1;
            }
        }
    }

    Ok(MovePlan {
        target_folder_id: target_id,
        asset_ids: assets.iter().map(|a| a.id).collect(),
        folder_updates,
        descendant_updates,
        counter_deltas: counters
            .into_iter()
            .map(|(folder_id, (child_delta, asset_delta))| CounterDelta {
                folder_id,
                child_delta,
                asset_delta,
            })
            .collect(),
        moved_by,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn folder(name: &str, parent: Option<&Folder>) -> Folder {
        let id = FolderId::new();
        Folder {
            id,
            name: name.to_string(),
            parent_id: parent.map(|p| p.id),
            path: match parent {
                Some(p) => format!("{}/{name}", p.path),
                None => format!("/{name}"),
            },
            id_path: match parent {
                Some(p) => format!("{}/{id}", p.id_path),
                None => format!("/{id}"),
            },
            description: None,
            child_count: 0,
            asset_count: 0,
            created_by: UserId::new(),
            updated_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    fn asset(name: &str, folder_id: Option<FolderId>) -> Asset {
        Asset {
            id: AssetId::new(),
            folder_id,
            kind: curator_entity::asset::AssetKind::Image,
            name: name.to_string(),
            original_name: name.to_string(),
            mime_type: "image/png".to_string(),
            size_bytes: 1024,
            url: format!("https://cdn.example/{name}"),
            width: None,
            height: None,
            duration_seconds: None,
            thumbnail_url: None,
            caption: None,
            alt_text: None,
            description: None,
            tags: Vec::new(),
            uploaded_by: UserId::new(),
            updated_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_move_into_descendant_is_rejected() {
        let a = folder("A", None);
        let b = folder("B", Some(&a));

        let err = plan_move(
            UserId::new(),
            Some(&b),
            std::slice::from_ref(&a),
            &[vec![b.clone()]],
            &[],
            &HashSet::new(),
        )
        .unwrap_err();
        assert_eq!(err.kind, curator_core::error::ErrorKind::Validation);
    }

    #[test]
    fn test_move_into_self_is_rejected() {
        let a = folder("A", None);
        let err = plan_move(
            UserId::new(),
            Some(&a),
            std::slice::from_ref(&a),
            &[vec![]],
            &[],
            &HashSet::new(),
        )
        .unwrap_err();
        assert_eq!(err.kind, curator_core::error::ErrorKind::Validation);
    }

    #[test]
    fn test_name_collision_in_target_is_rejected() {
        let a = folder("A", None);
        let occupied: HashSet<String> = ["A".to_string()].into();
        let err = plan_move(
            UserId::new(),
            None,
            std::slice::from_ref(&a),
            &[vec![]],
            &[],
            &occupied,
        )
        .unwrap_err();
        assert_eq!(err.kind, curator_core::error::ErrorKind::Conflict);
    }

    #[test]
    fn test_move_to_root_rewrites_both_paths() {
        // /A/B with a child /A/B/C moves to the root.
        let a = folder("A", None);
        let b = folder("B", Some(&a));
        let c = folder("C", Some(&b));

        let plan = plan_move(
            UserId::new(),
            None,
            std::slice::from_ref(&b),
            &[vec![c.clone()]],
            &[],
            &HashSet::new(),
        )
        .unwrap();

        let moved = &plan.folder_updates[0];
        assert_eq!(moved.id, b.id);
        assert_eq!(moved.parent_id, None);
        assert_eq!(moved.path, "/B");
        assert_eq!(moved.id_path, format!("/{}", b.id));

        let child = &plan.descendant_updates[0];
        assert_eq!(child.id, c.id);
        assert_eq!(child.parent_id, Some(b.id));
        assert_eq!(child.path, "/B/C");
        assert_eq!(child.id_path, format!("/{}/{}", b.id, c.id));
    }

    #[test]
    fn test_move_under_new_parent_prefixes_with_target() {
        let a = folder("A", None);
        let b = folder("B", None);
        let child = folder("Sub", Some(&b));

        let plan = plan_move(
            UserId::new(),
            Some(&a),
            std::slice::from_ref(&b),
            &[vec![child.clone()]],
            &[],
            &HashSet::new(),
        )
        .unwrap();

        assert_eq!(plan.folder_updates[0].path, "/A/B");
        assert_eq!(
            plan.folder_updates[0].id_path,
            format!("{}/{}", a.id_path, b.id)
        );
        assert_eq!(plan.descendant_updates[0].path, "/A/B/Sub");
        assert!(plan.descendant_updates[0]
            .id_path
            .starts_with(&format!("{}/{}", a.id_path, b.id)));
    }

    #[test]
    fn test_asset_moves_and_counter_deltas() {
        let a = folder("A", None);
        let b = folder("B", None);
        let x = asset("x.png", Some(a.id));

        let plan = plan_move(
            UserId::new(),
            Some(&b),
            &[],
            &[],
            std::slice::from_ref(&x),
            &HashSet::new(),
        )
        .unwrap();

        assert_eq!(plan.asset_ids, vec![x.id]);
        assert_eq!(plan.target_folder_id, Some(b.id));

        let deltas: HashMap<FolderId, (i32, i32)> = plan
            .counter_deltas
            .iter()
            .map(|d| (d.folder_id, (d.child_delta, d.asset_delta)))
            .collect();
        assert_eq!(deltas[&a.id], (0, -1));
        assert_eq!(deltas[&b.id], (0, 1));
    }

    #[test]
    fn test_move_to_same_parent_has_no_counter_deltas() {
        let a = folder("A", None);
        let b = folder("B", Some(&a));

        let plan = plan_move(
            UserId::new(),
            Some(&a),
            std::slice::from_ref(&b),
            &[vec![]],
            &[],
            &HashSet::new(),
        )
        .unwrap();
        assert!(plan.counter_deltas.is_empty());
        // Paths recomputed to the same values.
        assert_eq!(plan.folder_updates[0].path, b.path);
        assert_eq!(plan.folder_updates[0].id_path, b.id_path);
    }
}
