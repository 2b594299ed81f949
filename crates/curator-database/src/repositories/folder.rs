//! Folder repository implementation.
//!
//! Hierarchy-aware CRUD over the flat `folders` table. Descendant queries
//! ride on the materialized `path`/`id_path` columns: a single prefix
//! `LIKE` regardless of tree depth. The cascade operations (recursive
//! delete, recursive path rewrite) run inside one transaction each so an
//! interrupted cascade rolls back instead of leaving a half-rewritten
//! subtree; `update_batch` is the deliberate exception and reports
//! per-row outcomes instead.

use futures::future::join_all;
use sqlx::PgPool;

use curator_core::error::{AppError, ErrorKind};
use curator_core::result::AppResult;
use curator_core::types::batch::{BatchFailure, BatchOutcome};
use curator_core::types::{FolderId, SortDirection, SortKey, UserId};
use curator_entity::folder::model::{
    CreateFolder, Folder, FolderFieldsUpdate, FolderStructureUpdate, PathInconsistency,
};
use curator_entity::folder::path::replace_path_prefix;

/// Upper bound on ids per `ANY($1)` bind, kept well under the storage
/// engine's parameter limits.
const CHUNK_SIZE: usize = 50;

/// Counts of rows removed by a recursive delete.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct DeletedSubtree {
    /// Folder rows removed, the root included.
    pub folders: u64,
    /// Asset rows removed from those folders.
    pub assets: u64,
}

/// Repository for folder CRUD and tree queries.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: PgPool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a folder by ID.
    ///
    /// Soft-deleted rows are returned too; callers inspect `deleted_at`.
    /// Every other lookup on this repository excludes them.
    pub async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    /// Find a folder by ID, scoped to its creator.
    pub async fn find_by_id_and_owner(
        &self,
        id: FolderId,
        owner: UserId,
    ) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1 AND created_by = $2")
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    /// Find live folders by a set of IDs, optionally scoped to a creator.
    ///
    /// The id list is chunked to respect the parameter-count bound; rows
    /// come back in no particular order and missing ids are silently
    /// absent.
    pub async fn find_by_ids(
        &self,
        ids: &[FolderId],
        owner: Option<UserId>,
    ) -> AppResult<Vec<Folder>> {
        let mut folders = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(CHUNK_SIZE) {
            let rows = sqlx::query_as::<_, Folder>(
                "SELECT * FROM folders WHERE id = ANY($1) AND deleted_at IS NULL \
                 AND ($2::uuid IS NULL OR created_by = $2)",
            )
            .bind(chunk.to_vec())
            .bind(owner)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find folders by ids", e)
            })?;
            folders.extend(rows);
        }
        Ok(folders)
    }

    /// Find a live folder by its full name path.
    pub async fn find_by_path(&self, path: &str) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE path = $1 AND deleted_at IS NULL",
        )
        .bind(path)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find folder by path", e)
        })
    }

    /// Find a live folder by its full name path, scoped to its creator.
    pub async fn find_by_path_and_owner(
        &self,
        path: &str,
        owner: UserId,
    ) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE path = $1 AND created_by = $2 AND deleted_at IS NULL",
        )
        .bind(path)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find folder by path", e)
        })
    }

    /// List direct children of a folder (one level), live rows only.
    ///
    /// `parent_id = None` lists root folders. An optional case-insensitive
    /// substring filter on the name narrows the result; folder listings
    /// are never paginated.
    pub async fn find_children(
        &self,
        parent_id: Option<FolderId>,
        query: Option<&str>,
        sort_by: SortKey,
        sort_order: SortDirection,
    ) -> AppResult<Vec<Folder>> {
        let sql = format!(
            "SELECT * FROM folders WHERE parent_id IS NOT DISTINCT FROM $1 \
             AND deleted_at IS NULL AND ($2::text IS NULL OR name ILIKE $2) \
             ORDER BY {} {}, id ASC",
            sort_by.as_sql(),
            sort_order.as_sql(),
        );
        sqlx::query_as::<_, Folder>(&sql)
            .bind(parent_id)
            .bind(query.map(|q| format!("%{q}%")))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list children", e))
    }

    /// All live descendants (any depth) of the folder owning `id_path`.
    ///
    /// One prefix query regardless of tree depth, the payoff of the
    /// materialized-path design. `id_path` survives renames, so this is
    /// the variant structural code relies on.
    pub async fn find_descendants_by_id_path(&self, id_path: &str) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE id_path LIKE $1 || '/%' AND deleted_at IS NULL \
             ORDER BY id_path ASC",
        )
        .bind(id_path)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list descendants", e))
    }

    /// All live descendants (any depth) of the folder owning `path`.
    pub async fn find_descendants_by_path(&self, path: &str) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE path LIKE $1 || '/%' AND deleted_at IS NULL \
             ORDER BY path ASC",
        )
        .bind(path)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list descendants", e))
    }

    /// Every descendant row of the folder owning `id_path`, soft-deleted
    /// rows included.
    ///
    /// Cascades rewrite trashed rows too, so a later restore comes back
    /// with consistent paths; this is the variant the move planner uses.
    pub async fn find_subtree_for_rewrite(&self, id_path: &str) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE id_path LIKE $1 || '/%' ORDER BY id_path ASC",
        )
        .bind(id_path)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to collect subtree", e))
    }

    /// IDs of a folder and every live descendant: `[root, ...descendants]`.
    ///
    /// Returns an empty vec when the root does not exist (or is
    /// soft-deleted).
    pub async fn find_all_descendant_ids(&self, root: FolderId) -> AppResult<Vec<FolderId>> {
        let Some(folder) = self.find_by_id(root).await? else {
            return Ok(Vec::new());
        };
        if folder.is_deleted() {
            return Ok(Vec::new());
        }

        let mut ids = vec![folder.id];
        let descendants: Vec<FolderId> = sqlx::query_scalar(
            "SELECT id FROM folders WHERE id_path LIKE $1 || '/%' AND deleted_at IS NULL",
        )
        .bind(&folder.id_path)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to collect descendant ids", e)
        })?;
        ids.extend(descendants);
        Ok(ids)
    }

    /// Create a new folder with caller-supplied, pre-computed paths.
    ///
    /// The inserted row is read back in the same statement; a missing row
    /// at that point means the storage engine dropped the write and is
    /// surfaced as an error rather than trusted.
    pub async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (id, name, parent_id, path, id_path, description, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(data.id)
        .bind(&data.name)
        .bind(data.parent_id)
        .bind(&data.path)
        .bind(&data.id_path)
        .bind(&data.description)
        .bind(data.created_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("folders_parent_name_live_idx") =>
            {
                AppError::conflict(format!(
                    "A folder named '{}' already exists here",
                    data.name
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create folder", e),
        })?
        .ok_or_else(|| {
            AppError::internal(format!(
                "Folder {} could not be read back after insert",
                data.id
            ))
        })
    }

    /// Raw structural patch: parent, path, and id path in one write.
    ///
    /// Used by the move cascade; callers are responsible for having
    /// computed values that keep the tree invariants.
    pub async fn update_structure(
        &self,
        id: FolderId,
        parent_id: Option<FolderId>,
        path: &str,
        id_path: &str,
        updated_by: UserId,
    ) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "UPDATE folders SET parent_id = $2, path = $3, id_path = $4, updated_by = $5, \
             updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(parent_id)
        .bind(path)
        .bind(id_path)
        .bind(updated_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update folder", e))?
        .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))
    }

    /// Non-structural field edit.
    ///
    /// Does **not** keep `path` consistent by itself; callers that change
    /// the name must separately run the rename cascade.
    pub async fn update_fields(
        &self,
        id: FolderId,
        fields: &FolderFieldsUpdate,
        updated_by: UserId,
    ) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "UPDATE folders SET name = COALESCE($2, name), \
             description = COALESCE($3, description), updated_by = $4, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(updated_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update folder", e))?
        .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))
    }

    /// Rename a folder, rewriting its own path only.
    ///
    /// Descendants are rewritten by [`update_path_recursively`]; the
    /// caller invokes both, in that order.
    ///
    /// [`update_path_recursively`]: FolderRepository::update_path_recursively
    pub async fn update_name(
        &self,
        id: FolderId,
        name: &str,
        new_path: &str,
        updated_by: UserId,
    ) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "UPDATE folders SET name = $2, path = $3, updated_by = $4, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(name)
        .bind(new_path)
        .bind(updated_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("folders_parent_name_live_idx") =>
            {
                AppError::conflict(format!("A folder named '{name}' already exists here"))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to rename folder", e),
        })?
        .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))
    }

    /// Rewrite the `old_path` prefix to `new_path` for every folder in the
    /// subtree, soft-deleted rows included.
    ///
    /// Two-phase: the affected rows are read first, replacements computed,
    /// then applied inside one transaction, so a failure mid-rewrite rolls
    /// back rather than stranding a mixed-prefix subtree. Returns the
    /// number of rows rewritten.
    pub async fn update_path_recursively(&self, old_path: &str, new_path: &str) -> AppResult<u64> {
        let rows: Vec<(FolderId, String)> = sqlx::query_as(
            "SELECT id, path FROM folders WHERE path = $1 OR path LIKE $1 || '/%'",
        )
        .bind(old_path)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to collect subtree paths", e)
        })?;

        if rows.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        for (id, path) in &rows {
            let rewritten = replace_path_prefix(path, old_path, new_path);
            sqlx::query("UPDATE folders SET path = $2, updated_at = NOW() WHERE id = $1")
                .bind(*id)
                .bind(&rewritten)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Database,
                        format!("Failed to rewrite path for folder {id}"),
                        e,
                    )
                })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit path rewrite", e)
        })?;
        Ok(rows.len() as u64)
    }

    /// Persist a set of structural patches concurrently.
    ///
    /// All updates are dispatched at once and awaited together, for
    /// latency hiding rather than atomicity. There is no ordering or all-or-nothing
    /// guarantee across rows; the outcome of every row is reported back so
    /// callers can flag partial failures instead of ignoring them.
    pub async fn update_batch(
        &self,
        updates: &[FolderStructureUpdate],
    ) -> AppResult<BatchOutcome<FolderId>> {
        let futures = updates.iter().map(|update| {
            let pool = self.pool.clone();
            async move {
                let result = sqlx::query(
                    "UPDATE folders SET parent_id = $2, path = $3, id_path = $4, \
                     updated_at = NOW() WHERE id = $1",
                )
                .bind(update.id)
                .bind(update.parent_id)
                .bind(&update.path)
                .bind(&update.id_path)
                .execute(&pool)
                .await;

                match result {
                    Ok(done) if done.rows_affected() > 0 => Ok(update.id),
                    Ok(_) => Err((update.id, "Folder not found".to_string())),
                    Err(e) => Err((update.id, e.to_string())),
                }
            }
        });

        let mut outcome = BatchOutcome::empty();
        for result in join_all(futures).await {
            match result {
                Ok(id) => outcome.succeeded.push(id),
                Err((id, message)) => outcome.failed.push(BatchFailure { id, message }),
            }
        }
        Ok(outcome)
    }

    /// Hard-delete a single folder row. No cascade.
    pub async fn delete(&self, id: FolderId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM folders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete folder", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    /// Hard-delete a folder, every descendant folder, and the assets they
    /// contain.
    ///
    /// The subtree is collected up front as a worklist ordered deepest
    /// first (no recursion, so tree depth cannot grow the stack), then
    /// removed level by level inside one transaction: assets first, then
    /// children before their parents, the root last.
    pub async fn delete_recursively(&self, id: FolderId) -> AppResult<DeletedSubtree> {
        let Some(root) = self.find_by_id(id).await? else {
            return Err(AppError::not_found(format!("Folder {id} not found")));
        };

        // Deepest first: id_path length is monotonic in depth.
        let descendants: Vec<FolderId> = sqlx::query_scalar(
            "SELECT id FROM folders WHERE id_path LIKE $1 || '/%' \
             ORDER BY char_length(id_path) DESC",
        )
        .bind(&root.id_path)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to collect subtree", e)
        })?;

        let mut all_ids: Vec<FolderId> = descendants.clone();
        all_ids.push(root.id);

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let mut deleted_assets = 0u64;
        for chunk in all_ids.chunks(CHUNK_SIZE) {
            let result = sqlx::query("DELETE FROM assets WHERE folder_id = ANY($1)")
                .bind(chunk.to_vec())
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to delete assets", e)
                })?;
            deleted_assets += result.rows_affected();
        }

        let mut deleted_folders = 0u64;
        for chunk in descendants.chunks(CHUNK_SIZE) {
            let result = sqlx::query("DELETE FROM folders WHERE id = ANY($1)")
                .bind(chunk.to_vec())
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to delete descendants", e)
                })?;
            deleted_folders += result.rows_affected();
        }

        let result = sqlx::query("DELETE FROM folders WHERE id = $1")
            .bind(root.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete folder", e)
            })?;
        deleted_folders += result.rows_affected();

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit recursive delete", e)
        })?;

        Ok(DeletedSubtree {
            folders: deleted_folders,
            assets: deleted_assets,
        })
    }

    /// Soft-delete a set of folders, chunked.
    ///
    /// Idempotent: rows already marked keep their original `deleted_at`,
    /// and re-deleting them is not an error. Returns the number of rows
    /// newly marked.
    pub async fn soft_delete_batch(&self, ids: &[FolderId], user: UserId) -> AppResult<u64> {
        let mut marked = 0u64;
        for chunk in ids.chunks(CHUNK_SIZE) {
            let result = sqlx::query(
                "UPDATE folders SET deleted_at = NOW(), updated_by = $2, updated_at = NOW() \
                 WHERE id = ANY($1) AND deleted_at IS NULL",
            )
            .bind(chunk.to_vec())
            .bind(user)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to soft-delete folders", e)
            })?;
            marked += result.rows_affected();
        }
        Ok(marked)
    }

    /// Clear the soft-delete marker on a folder and its whole subtree.
    pub async fn restore_subtree(&self, id_path: &str, user: UserId) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE folders SET deleted_at = NULL, updated_by = $2, updated_at = NOW() \
             WHERE (id_path = $1 OR id_path LIKE $1 || '/%') AND deleted_at IS NOT NULL",
        )
        .bind(id_path)
        .bind(user)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to restore subtree", e)
        })?;
        Ok(result.rows_affected())
    }

    /// Unfiltered dump of every folder row. Administrative use only.
    pub async fn list_all(&self) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders ORDER BY path ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folders", e))
    }

    /// Nudge the denormalized counters on a folder.
    ///
    /// Counters are informational; a missing row or a lost nudge is not an
    /// error, and [`recompute_counters`] restores exact values.
    ///
    /// [`recompute_counters`]: FolderRepository::recompute_counters
    pub async fn adjust_counters(
        &self,
        id: FolderId,
        child_delta: i32,
        asset_delta: i32,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE folders SET child_count = GREATEST(child_count + $2, 0), \
             asset_count = GREATEST(asset_count + $3, 0) WHERE id = $1",
        )
        .bind(id)
        .bind(child_delta)
        .bind(asset_delta)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to adjust counters", e)
        })?;
        Ok(())
    }

    /// Recompute `child_count` and `asset_count` for every live folder
    /// from the actual row counts. Returns the number of folders updated.
    pub async fn recompute_counters(&self) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE folders f SET \
             child_count = (SELECT COUNT(*) FROM folders c \
                            WHERE c.parent_id = f.id AND c.deleted_at IS NULL), \
             asset_count = (SELECT COUNT(*) FROM assets a \
                            WHERE a.folder_id = f.id AND a.deleted_at IS NULL) \
             WHERE f.deleted_at IS NULL",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to recompute counters", e)
        })?;
        Ok(result.rows_affected())
    }

    /// Scan for live folders whose stored paths disagree with their
    /// parent's, the residue of an interrupted cascade.
    pub async fn find_path_inconsistencies(&self) -> AppResult<Vec<PathInconsistency>> {
        sqlx::query_as::<_, PathInconsistency>(
            "SELECT c.id AS folder_id, \
                    c.path AS actual_path, \
                    p.path || '/' || c.name AS expected_path, \
                    c.id_path AS actual_id_path, \
                    p.id_path || '/' || c.id::text AS expected_id_path \
             FROM folders c JOIN folders p ON c.parent_id = p.id \
             WHERE c.deleted_at IS NULL AND p.deleted_at IS NULL \
               AND (c.path <> p.path || '/' || c.name \
                    OR c.id_path <> p.id_path || '/' || c.id::text) \
             UNION ALL \
             SELECT c.id AS folder_id, \
                    c.path AS actual_path, \
                    '/' || c.name AS expected_path, \
                    c.id_path AS actual_id_path, \
                    '/' || c.id::text AS expected_id_path \
             FROM folders c \
             WHERE c.parent_id IS NULL AND c.deleted_at IS NULL \
               AND (c.path <> '/' || c.name OR c.id_path <> '/' || c.id::text)",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to scan path consistency", e)
        })
    }
}
