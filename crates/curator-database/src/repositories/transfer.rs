//! Transactional application of a move plan.
//!
//! Moving a selection touches both tables and many rows: repointed
//! assets, relocated folders, and a path rewrite for every descendant of
//! each relocated folder. The plan is computed up front by the service
//! layer (phase one); this repository applies the whole of it inside a
//! single transaction (phase two), so an interrupted move rolls back
//! instead of stranding a subtree with mixed path prefixes.

use sqlx::PgPool;

use curator_core::error::{AppError, ErrorKind};
use curator_core::result::AppResult;
use curator_core::types::{AssetId, FolderId, UserId};
use curator_entity::folder::model::FolderStructureUpdate;

/// Upper bound on ids per `ANY($1)` bind.
const CHUNK_SIZE: usize = 50;

/// A counter nudge applied alongside the move.
#[derive(Debug, Clone, Copy)]
pub struct CounterDelta {
    /// The folder whose counters change.
    pub folder_id: FolderId,
    /// Change in live child-folder count.
    pub child_delta: i32,
    /// Change in live asset count.
    pub asset_delta: i32,
}

/// Everything a move will write, computed before anything is written.
#[derive(Debug, Clone)]
pub struct MovePlan {
    /// Where the selection is going (None = library root).
    pub target_folder_id: Option<FolderId>,
    /// Assets to repoint at the target.
    pub asset_ids: Vec<AssetId>,
    /// The relocated folders themselves: new parent and both new paths.
    pub folder_updates: Vec<FolderStructureUpdate>,
    /// Their descendants: parent unchanged, both path prefixes rewritten.
    pub descendant_updates: Vec<FolderStructureUpdate>,
    /// Informational counter adjustments on source and target parents.
    pub counter_deltas: Vec<CounterDelta>,
    /// The acting user.
    pub moved_by: UserId,
}

/// What a move actually wrote.
#[derive(Debug, Clone, Copy, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveReport {
    /// Asset rows repointed.
    pub moved_assets: u64,
    /// Folder rows relocated (descendant rewrites not counted).
    pub moved_folders: u64,
}

/// Applies move plans.
#[derive(Debug, Clone)]
pub struct TransferRepository {
    pool: PgPool,
}

impl TransferRepository {
    /// Create a new transfer repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply a move plan in one transaction.
    pub async fn apply_move(&self, plan: &MovePlan) -> AppResult<MoveReport> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let mut moved_assets = 0u64;
        for chunk in plan.asset_ids.chunks(CHUNK_SIZE) {
            let result = sqlx::query(
                "UPDATE assets SET folder_id = $2, updated_by = $3, updated_at = NOW() \
                 WHERE id = ANY($1) AND deleted_at IS NULL",
            )
            .bind(chunk.to_vec())
            .bind(plan.target_folder_id)
            .bind(plan.moved_by)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to move assets", e)
            })?;
            moved_assets += result.rows_affected();
        }

        let mut moved_folders = 0u64;
        for update in &plan.folder_updates {
            let result = sqlx::query(
                "UPDATE folders SET parent_id = $2, path = $3, id_path = $4, updated_by = $5, \
                 updated_at = NOW() WHERE id = $1",
            )
            .bind(update.id)
            .bind(update.parent_id)
            .bind(&update.path)
            .bind(&update.id_path)
            .bind(plan.moved_by)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to move folder {}", update.id),
                    e,
                )
            })?;
            moved_folders += result.rows_affected();
        }

        for update in &plan.descendant_updates {
            sqlx::query(
                "UPDATE folders SET path = $2, id_path = $3, updated_at = NOW() WHERE id = $1",
            )
            .bind(update.id)
            .bind(&update.path)
            .bind(&update.id_path)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to rewrite paths for folder {}", update.id),
                    e,
                )
            })?;
        }

        for delta in &plan.counter_deltas {
            sqlx::query(
                "UPDATE folders SET child_count = GREATEST(child_count + $2, 0), \
                 asset_count = GREATEST(asset_count + $3, 0) WHERE id = $1",
            )
            .bind(delta.folder_id)
            .bind(delta.child_delta)
            .bind(delta.asset_delta)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to adjust counters", e)
            })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit move", e)
        })?;

        Ok(MoveReport {
            moved_assets,
            moved_folders,
        })
    }
}
