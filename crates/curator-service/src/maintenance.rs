//! Reconciliation and repair passes.
//!
//! The denormalized pieces of the schema, the counters and the two
//! materialized paths, are caches rather than sources of truth.
//! This service recomputes the counters from actual row counts, scans for
//! path drift (the residue of an interrupted cascade), and rewrites
//! drifted rows from the parent chain.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use curator_core::types::batch::BatchOutcome;
use curator_core::types::FolderId;
use curator_core::AppResult;
use curator_database::repositories::asset::AssetRepository;
use curator_database::repositories::folder::FolderRepository;
use curator_entity::folder::model::{Folder, FolderStructureUpdate, PathInconsistency};
use curator_entity::folder::path::{build_id_path, build_path};

use crate::context::RequestContext;

/// What the consistency scan found.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyReport {
    /// Folders whose stored paths disagree with their parent's.
    pub path_inconsistencies: Vec<PathInconsistency>,
    /// Live assets pointing at a missing or deleted folder.
    pub orphaned_assets: u64,
}

/// What a repair pass changed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairReport {
    /// Rows the planner wanted to rewrite.
    pub planned: usize,
    /// Per-row persistence outcome.
    pub outcome: BatchOutcome<FolderId>,
}

/// Maintenance operations over the library's denormalized state.
#[derive(Debug, Clone)]
pub struct MaintenanceService {
    /// Folder repository.
    folder_repo: Arc<FolderRepository>,
    /// Asset repository.
    asset_repo: Arc<AssetRepository>,
}

impl MaintenanceService {
    /// Creates a new maintenance service.
    pub fn new(folder_repo: Arc<FolderRepository>, asset_repo: Arc<AssetRepository>) -> Self {
        Self {
            folder_repo,
            asset_repo,
        }
    }

    /// Recompute every live folder's counters from actual row counts.
    pub async fn recompute_counters(&self, ctx: &RequestContext) -> AppResult<u64> {
        ctx.require_admin()?;
        let updated = self.folder_repo.recompute_counters().await?;
        info!(user_id = %ctx.user_id, folders = updated, "Counters recomputed");
        Ok(updated)
    }

    /// Scan for drifted paths and orphaned assets without changing anything.
    pub async fn check_consistency(&self, ctx: &RequestContext) -> AppResult<ConsistencyReport> {
        ctx.require_admin()?;
        let (inconsistencies, orphans) = tokio::try_join!(
            self.folder_repo.find_path_inconsistencies(),
            self.asset_repo.find_orphaned(),
        )?;

        if !inconsistencies.is_empty() {
            warn!(
                count = inconsistencies.len(),
                "Folders with inconsistent materialized paths detected"
            );
        }

        Ok(ConsistencyReport {
            path_inconsistencies: inconsistencies,
            orphaned_assets: orphans.len() as u64,
        })
    }

    /// Rewrite drifted `path`/`id_path` values from the parent chain.
    ///
    /// Corrections are computed top-down over the whole live tree, then
    /// persisted through the concurrent batch writer; the per-row outcome
    /// is reported back rather than folded into a single pass/fail.
    pub async fn repair_paths(&self, ctx: &RequestContext) -> AppResult<RepairReport> {
        ctx.require_admin()?;

        let folders: Vec<Folder> = self
            .folder_repo
            .list_all()
            .await?
            .into_iter()
            .filter(|f| !f.is_deleted())
            .collect();

        let corrections = compute_path_corrections(&folders);
        let planned = corrections.len();
        let outcome = self.folder_repo.update_batch(&corrections).await?;

        if !outcome.is_complete() {
            warn!(
                failed = outcome.failed.len(),
                "Path repair persisted only partially"
            );
        }
        info!(
            user_id = %ctx.user_id,
            planned,
            repaired = outcome.succeeded.len(),
            "Path repair finished"
        );

        Ok(RepairReport { planned, outcome })
    }
}

/// Derive the correct `path`/`id_path` for every folder from the parent
/// links alone, and return a patch for each row that differs. Pure.
///
/// Walks the tree top-down from the roots with an explicit worklist, so
/// a deep (or corrupted, cyclic) parent chain cannot overflow the stack;
/// rows unreachable from any root are left untouched.
fn compute_path_corrections(folders: &[Folder]) -> Vec<FolderStructureUpdate> {
    let by_parent: HashMap<Option<FolderId>, Vec<&Folder>> =
        folders.iter().fold(HashMap::new(), |mut map, folder| {
            map.entry(folder.parent_id).or_default().push(folder);
            map
        });

    let mut corrections = Vec::new();
    // (folder, correct parent path, correct parent id path)
    let mut worklist: Vec<(&Folder, Option<String>, Option<String>)> = by_parent
        .get(&None)
        .into_iter()
        .flatten()
        .map(|f| (*f, None, None))
        .collect();

    while let Some((folder, parent_path, parent_id_path)) = worklist.pop() {
        // A name that fails validation cannot produce a correct path;
        // leave the row for manual attention.
        let Ok(expected_path) = build_path(parent_path.as_deref(), &folder.name) else {
            continue;
        };
        let expected_id_path = build_id_path(parent_id_path.as_deref(), folder.id);

        if folder.path != expected_path || folder.id_path != expected_id_path {
            corrections.push(FolderStructureUpdate {
                id: folder.id,
                parent_id: folder.parent_id,
                path: expected_path.clone(),
                id_path: expected_id_path.clone(),
            });
        }

        if let Some(children) = by_parent.get(&Some(folder.id)) {
            for child in children {
                worklist.push((
                    child,
                    Some(expected_path.clone()),
                    Some(expected_id_path.clone()),
                ));
            }
        }
    }

    corrections
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use curator_core::types::UserId;

    fn folder(name: &str, parent: Option<&Folder>, path: &str, id_path: Option<String>) -> Folder {
        let id = FolderId::new();
        Folder {
            id,
            name: name.to_string(),
            parent_id: parent.map(|p| p.id),
            path: path.to_string(),
            id_path: id_path.unwrap_or_else(|| match parent {
                Some(p) => format!("{}/{id}", p.id_path),
                None => format!("/{id}"),
            }),
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

    #[test]
    fn test_consistent_tree_needs_no_corrections() {
        let a = folder("A", None, "/A", None);
        let b = folder("B", Some(&a), "/A/B", None);
        assert!(compute_path_corrections(&[a, b]).is_empty());
    }

    #[test]
    fn test_drifted_descendant_is_corrected() {
        // The parent was renamed to A2 but the child still claims /A/B.
        let a = folder("A2", None, "/A2", None);
        let b = folder("B", Some(&a), "/A/B", None);

        let corrections = compute_path_corrections(&[a, b.clone()]);
        assert_eq!(corrections.len(), 1);
        assert_eq!(corrections[0].id, b.id);
        assert_eq!(corrections[0].path, "/A2/B");
        assert_eq!(corrections[0].id_path, b.id_path);
    }

    #[test]
    fn test_whole_chain_recomputed_from_drifted_root() {
        let a = folder("A", None, "/stale", None);
        let b = folder("B", Some(&a), "/stale/B", None);
        let c = folder("C", Some(&b), "/stale/B/C", None);

        let corrections = compute_path_corrections(&[a.clone(), b.clone(), c.clone()]);
        assert_eq!(corrections.len(), 3);

        let by_id: HashMap<FolderId, &FolderStructureUpdate> =
            corrections.iter().map(|u| (u.id, u)).collect();
        assert_eq!(by_id[&a.id].path, "/A");
        assert_eq!(by_id[&b.id].path, "/A/B");
        assert_eq!(by_id[&c.id].path, "/A/B/C");
    }

    #[test]
    fn test_drifted_id_path_is_corrected() {
        let a = folder("A", None, "/A", Some("/bogus".to_string()));
        let corrections = compute_path_corrections(std::slice::from_ref(&a));
        assert_eq!(corrections.len(), 1);
        assert_eq!(corrections[0].id_path, format!("/{}", a.id));
    }
}
