//! Asset registration and edits.
//!
//! Upload transport is an external collaborator: by the time a request
//! reaches this service the bytes already live somewhere and the request
//! carries their URL.

use std::sync::Arc;

use tracing::info;

use curator_core::types::{AssetId, FolderId};
use curator_core::{AppError, AppResult};
use curator_database::repositories::asset::AssetRepository;
use curator_database::repositories::folder::FolderRepository;
use curator_entity::asset::kind::AssetKind;
use curator_entity::asset::model::{Asset, AssetFieldsUpdate, CreateAsset};
use curator_entity::folder::path::validate_name;

use crate::context::RequestContext;

/// Manages asset records.
#[derive(Debug, Clone)]
pub struct AssetService {
    /// Asset repository.
    asset_repo: Arc<AssetRepository>,
    /// Folder repository (placement checks and counters).
    folder_repo: Arc<FolderRepository>,
}

/// Request to register an uploaded asset.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAssetRequest {
    /// Target folder (None = library root).
    pub folder_id: Option<FolderId>,
    /// Media category; inferred from the MIME type when omitted.
    pub kind: Option<AssetKind>,
    /// Display name.
    pub name: String,
    /// Filename at upload time.
    pub original_name: String,
    /// MIME type.
    pub mime_type: String,
    /// Size in bytes.
    pub size_bytes: i64,
    /// URL produced by the upload collaborator.
    pub url: String,
    /// Pixel width.
    pub width: Option<i32>,
    /// Pixel height.
    pub height: Option<i32>,
    /// Duration in seconds.
    pub duration_seconds: Option<f64>,
    /// Thumbnail URL.
    pub thumbnail_url: Option<String>,
    /// Caption.
    pub caption: Option<String>,
    /// Alt text.
    pub alt_text: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl AssetService {
    /// Creates a new asset service.
    pub fn new(asset_repo: Arc<AssetRepository>, folder_repo: Arc<FolderRepository>) -> Self {
        Self {
            asset_repo,
            folder_repo,
        }
    }

    /// Registers a new asset record.
    pub async fn register_asset(
        &self,
        ctx: &RequestContext,
        req: RegisterAssetRequest,
    ) -> AppResult<Asset> {
        ctx.require_admin()?;
        validate_name(&req.name)?;

        if let Some(folder_id) = req.folder_id {
            self.find_live_folder(folder_id).await?;
        }

        let kind = match req.kind {
            Some(kind) => kind,
            None => AssetKind::from_mime(&req.mime_type).ok_or_else(|| {
                AppError::validation(format!(
                    "Cannot infer asset kind from MIME type '{}'",
                    req.mime_type
                ))
            })?,
        };

        let asset = self
            .asset_repo
            .create(&CreateAsset {
                folder_id: req.folder_id,
                kind,
                name: req.name,
                original_name: req.original_name,
                mime_type: req.mime_type,
                size_bytes: req.size_bytes,
                url: req.url,
                width: req.width,
                height: req.height,
                duration_seconds: req.duration_seconds,
                thumbnail_url: req.thumbnail_url,
                caption: req.caption,
                alt_text: req.alt_text,
                description: req.description,
                tags: req.tags,
                uploaded_by: ctx.user_id,
            })
            .await?;

        if let Some(folder_id) = asset.folder_id {
            self.folder_repo.adjust_counters(folder_id, 0, 1).await?;
        }

        info!(
            user_id = %ctx.user_id,
            asset_id = %asset.id,
            kind = %asset.kind,
            "Asset registered"
        );
        Ok(asset)
    }

    /// Gets a live asset by ID.
    pub async fn get_asset(&self, ctx: &RequestContext, id: AssetId) -> AppResult<Asset> {
        ctx.require_admin()?;
        let asset = self
            .asset_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Asset {id} not found")))?;
        if asset.is_deleted() {
            return Err(AppError::not_found(format!("Asset {id} not found")));
        }
        Ok(asset)
    }

    /// Edits display fields. No structural impact.
    pub async fn update_asset(
        &self,
        ctx: &RequestContext,
        id: AssetId,
        fields: AssetFieldsUpdate,
    ) -> AppResult<Asset> {
        ctx.require_admin()?;
        if let Some(name) = &fields.name {
            validate_name(name)?;
        }
        self.get_asset(ctx, id).await?;
        self.asset_repo.update_fields(id, &fields, ctx.user_id).await
    }

    /// Moves a single asset to another folder (None = library root).
    pub async fn move_asset(
        &self,
        ctx: &RequestContext,
        id: AssetId,
        target_folder_id: Option<FolderId>,
    ) -> AppResult<Asset> {
        ctx.require_admin()?;
        let asset = self.get_asset(ctx, id).await?;

        if let Some(folder_id) = target_folder_id {
            self.find_live_folder(folder_id).await?;
        }

        let moved = self
            .asset_repo
            .move_to_folder(id, target_folder_id, ctx.user_id)
            .await?;

        if let Some(old_folder) = asset.folder_id {
            self.folder_repo.adjust_counters(old_folder, 0, -1).await?;
        }
        if let Some(new_folder) = moved.folder_id {
            self.folder_repo.adjust_counters(new_folder, 0, 1).await?;
        }

        info!(user_id = %ctx.user_id, asset_id = %id, "Asset moved");
        Ok(moved)
    }

    /// Deletes an asset permanently.
    pub async fn delete_asset(&self, ctx: &RequestContext, id: AssetId) -> AppResult<bool> {
        ctx.require_admin()?;
        let asset = self
            .asset_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Asset {id} not found")))?;

        let removed = self.asset_repo.delete(id).await?;
        if removed && !asset.is_deleted() {
            if let Some(folder_id) = asset.folder_id {
                self.folder_repo.adjust_counters(folder_id, 0, -1).await?;
            }
        }

        info!(user_id = %ctx.user_id, asset_id = %id, "Asset deleted");
        Ok(removed)
    }

    async fn find_live_folder(&self, id: FolderId) -> AppResult<()> {
        let folder = self
            .folder_repo
            .find_by_id(id)
            .await?
            .filter(|f| !f.is_deleted());
        if folder.is_none() {
            return Err(AppError::not_found(format!("Folder {id} not found")));
        }
        Ok(())
    }
}
