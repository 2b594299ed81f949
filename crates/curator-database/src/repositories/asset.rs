//! Asset repository implementation.
//!
//! Assets are leaves, so there is no cascade to maintain here, only
//! `folder_id` scoping (null = library root) and the subtree join that
//! rides on the owning folder's `id_path` prefix.

use sqlx::PgPool;

use curator_core::error::{AppError, ErrorKind};
use curator_core::result::AppResult;
use curator_core::types::pagination::{PageRequest, PageResponse};
use curator_core::types::{AssetId, FolderId, SortDirection, SortKey, UserId};
use curator_entity::asset::model::{Asset, AssetFieldsUpdate, CreateAsset};

/// Upper bound on ids per `ANY($1)` bind, kept well under the storage
/// engine's parameter limits.
const CHUNK_SIZE: usize = 50;

/// The OR-combined substring predicate used by filtered listings.
///
/// `$2` is the ILIKE pattern (or NULL for "no filter"); the fields match
/// what editors actually search for in the library.
const SEARCH_PREDICATE: &str = "($2::text IS NULL \
     OR name ILIKE $2 \
     OR original_name ILIKE $2 \
     OR caption ILIKE $2 \
     OR alt_text ILIKE $2 \
     OR mime_type ILIKE $2 \
     OR array_to_string(tags, ' ') ILIKE $2)";

/// Repository for asset CRUD and folder-scoped queries.
#[derive(Debug, Clone)]
pub struct AssetRepository {
    pool: PgPool,
}

impl AssetRepository {
    /// Create a new asset repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an asset by ID. Soft-deleted rows are returned too.
    pub async fn find_by_id(&self, id: AssetId) -> AppResult<Option<Asset>> {
        sqlx::query_as::<_, Asset>("SELECT * FROM assets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find asset", e))
    }

    /// Find live assets by a set of IDs, chunked.
    pub async fn find_by_ids(&self, ids: &[AssetId]) -> AppResult<Vec<Asset>> {
        let mut assets = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(CHUNK_SIZE) {
            let rows = sqlx::query_as::<_, Asset>(
                "SELECT * FROM assets WHERE id = ANY($1) AND deleted_at IS NULL",
            )
            .bind(chunk.to_vec())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find assets by ids", e)
            })?;
            assets.extend(rows);
        }
        Ok(assets)
    }

    /// List live assets in a folder, paginated.
    ///
    /// The page and its total count use the same predicate and are
    /// dispatched concurrently, two round trips' worth of latency for
    /// one. The optional query matches case-insensitive substrings across
    /// name, original name, caption, alt text, mime type, and tags.
    pub async fn find_by_folder(
        &self,
        folder_id: Option<FolderId>,
        query: Option<&str>,
        sort_by: SortKey,
        sort_order: SortDirection,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Asset>> {
        let pattern = query.map(|q| format!("%{q}%"));

        let count_sql = format!(
            "SELECT COUNT(*) FROM assets \
             WHERE folder_id IS NOT DISTINCT FROM $1 AND deleted_at IS NULL AND {SEARCH_PREDICATE}"
        );
        let page_sql = format!(
            "SELECT * FROM assets \
             WHERE folder_id IS NOT DISTINCT FROM $1 AND deleted_at IS NULL AND {SEARCH_PREDICATE} \
             ORDER BY {} {}, id ASC LIMIT $3 OFFSET $4",
            sort_by.as_sql(),
            sort_order.as_sql(),
        );

        let count_fut = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(folder_id)
            .bind(&pattern)
            .fetch_one(&self.pool);
        let page_fut = sqlx::query_as::<_, Asset>(&page_sql)
            .bind(folder_id)
            .bind(&pattern)
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool);

        let (total, assets) = tokio::try_join!(count_fut, page_fut)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list assets", e))?;

        Ok(PageResponse::new(assets, page.page, page.limit, total as u64))
    }

    /// All live assets anywhere inside the subtree rooted at the folder
    /// owning `id_path`, the folder's own assets included.
    pub async fn find_by_folder_subtree(&self, id_path: &str) -> AppResult<Vec<Asset>> {
        sqlx::query_as::<_, Asset>(
            "SELECT a.* FROM assets a \
             JOIN folders f ON a.folder_id = f.id \
             WHERE (f.id_path = $1 OR f.id_path LIKE $1 || '/%') \
               AND a.deleted_at IS NULL AND f.deleted_at IS NULL",
        )
        .bind(id_path)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list subtree assets", e)
        })
    }

    /// Register a new asset record.
    pub async fn create(&self, data: &CreateAsset) -> AppResult<Asset> {
        sqlx::query_as::<_, Asset>(
            "INSERT INTO assets (folder_id, kind, name, original_name, mime_type, size_bytes, \
             url, width, height, duration_seconds, thumbnail_url, caption, alt_text, \
             description, tags, uploaded_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
             RETURNING *",
        )
        .bind(data.folder_id)
        .bind(data.kind)
        .bind(&data.name)
        .bind(&data.original_name)
        .bind(&data.mime_type)
        .bind(data.size_bytes)
        .bind(&data.url)
        .bind(data.width)
        .bind(data.height)
        .bind(data.duration_seconds)
        .bind(&data.thumbnail_url)
        .bind(&data.caption)
        .bind(&data.alt_text)
        .bind(&data.description)
        .bind(&data.tags)
        .bind(data.uploaded_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create asset", e))
    }

    /// Edit display fields.
    pub async fn update_fields(
        &self,
        id: AssetId,
        fields: &AssetFieldsUpdate,
        updated_by: UserId,
    ) -> AppResult<Asset> {
        sqlx::query_as::<_, Asset>(
            "UPDATE assets SET name = COALESCE($2, name), caption = COALESCE($3, caption), \
             alt_text = COALESCE($4, alt_text), description = COALESCE($5, description), \
             tags = COALESCE($6::text[], tags), updated_by = $7, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.caption)
        .bind(&fields.alt_text)
        .bind(&fields.description)
        .bind(&fields.tags)
        .bind(updated_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update asset", e))?
        .ok_or_else(|| AppError::not_found(format!("Asset {id} not found")))
    }

    /// Repoint an asset at a different folder (None = library root).
    pub async fn move_to_folder(
        &self,
        id: AssetId,
        folder_id: Option<FolderId>,
        updated_by: UserId,
    ) -> AppResult<Asset> {
        sqlx::query_as::<_, Asset>(
            "UPDATE assets SET folder_id = $2, updated_by = $3, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(folder_id)
        .bind(updated_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to move asset", e))?
        .ok_or_else(|| AppError::not_found(format!("Asset {id} not found")))
    }

    /// Soft-delete a set of assets, chunked. Idempotent, like the folder
    /// variant. Returns the number of rows newly marked.
    pub async fn soft_delete_batch(&self, ids: &[AssetId], user: UserId) -> AppResult<u64> {
        let mut marked = 0u64;
        for chunk in ids.chunks(CHUNK_SIZE) {
            let result = sqlx::query(
                "UPDATE assets SET deleted_at = NOW(), updated_by = $2, updated_at = NOW() \
                 WHERE id = ANY($1) AND deleted_at IS NULL",
            )
            .bind(chunk.to_vec())
            .bind(user)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to soft-delete assets", e)
            })?;
            marked += result.rows_affected();
        }
        Ok(marked)
    }

    /// Clear the soft-delete marker on a set of assets, chunked.
    pub async fn restore_batch(&self, ids: &[AssetId], user: UserId) -> AppResult<u64> {
        let mut restored = 0u64;
        for chunk in ids.chunks(CHUNK_SIZE) {
            let result = sqlx::query(
                "UPDATE assets SET deleted_at = NULL, updated_by = $2, updated_at = NOW() \
                 WHERE id = ANY($1) AND deleted_at IS NOT NULL",
            )
            .bind(chunk.to_vec())
            .bind(user)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to restore assets", e)
            })?;
            restored += result.rows_affected();
        }
        Ok(restored)
    }

    /// Clear the soft-delete marker on every asset inside the subtree
    /// rooted at the folder owning `id_path`.
    pub async fn restore_subtree(&self, id_path: &str, user: UserId) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE assets SET deleted_at = NULL, updated_by = $2, updated_at = NOW() \
             WHERE deleted_at IS NOT NULL AND folder_id IN \
             (SELECT id FROM folders WHERE id_path = $1 OR id_path LIKE $1 || '/%')",
        )
        .bind(id_path)
        .bind(user)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to restore subtree assets", e)
        })?;
        Ok(result.rows_affected())
    }

    /// Hard-delete a single asset row.
    pub async fn delete(&self, id: AssetId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM assets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete asset", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Live assets whose `folder_id` points at a missing or soft-deleted
    /// folder. These should not exist; the maintenance scan reports them.
    pub async fn find_orphaned(&self) -> AppResult<Vec<Asset>> {
        sqlx::query_as::<_, Asset>(
            "SELECT a.* FROM assets a \
             LEFT JOIN folders f ON a.folder_id = f.id \
             WHERE a.folder_id IS NOT NULL AND a.deleted_at IS NULL \
               AND (f.id IS NULL OR f.deleted_at IS NOT NULL)",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to scan for orphaned assets", e)
        })
    }
}
