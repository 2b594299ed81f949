//! Asset CRUD handlers.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;
use validator::Validate;

use curator_core::error::AppError;
use curator_core::types::{AssetId, FolderId};
use curator_entity::asset::model::{Asset, AssetFieldsUpdate};
use curator_service::asset::service::RegisterAssetRequest as SvcRegisterAsset;

use crate::dto::request::{MoveAssetRequest, RegisterAssetRequest, UpdateAssetRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/assets
pub async fn register_asset(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<RegisterAssetRequest>,
) -> Result<Json<ApiResponse<Asset>>, ApiError> {
    req.validate()
        .map_err(|e| ApiError(AppError::validation(e.to_string())))?;

    let asset = state
        .asset_service
        .register_asset(
            &auth,
            SvcRegisterAsset {
                folder_id: req.folder_id.map(FolderId::from_uuid),
                kind: req.kind,
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
            },
        )
        .await?;

    Ok(Json(ApiResponse::ok(asset)))
}

/// GET /api/assets/{id}
pub async fn get_asset(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Asset>>, ApiError> {
    let asset = state
        .asset_service
        .get_asset(&auth, AssetId::from_uuid(id))
        .await?;
    Ok(Json(ApiResponse::ok(asset)))
}

/// PUT /api/assets/{id}
pub async fn update_asset(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateAssetRequest>,
) -> Result<Json<ApiResponse<Asset>>, ApiError> {
    req.validate()
        .map_err(|e| ApiError(AppError::validation(e.to_string())))?;

    let asset = state
        .asset_service
        .update_asset(
            &auth,
            AssetId::from_uuid(id),
            AssetFieldsUpdate {
                name: req.name,
                caption: req.caption,
                alt_text: req.alt_text,
                description: req.description,
                tags: req.tags,
            },
        )
        .await?;

    Ok(Json(ApiResponse::ok(asset)))
}

/// PUT /api/assets/{id}/move
pub async fn move_asset(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<MoveAssetRequest>,
) -> Result<Json<ApiResponse<Asset>>, ApiError> {
    let asset = state
        .asset_service
        .move_asset(
            &auth,
            AssetId::from_uuid(id),
            req.target_folder_id.map(FolderId::from_uuid),
        )
        .await?;
    Ok(Json(ApiResponse::ok(asset)))
}

/// DELETE /api/assets/{id}
pub async fn delete_asset(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .asset_service
        .delete_asset(&auth, AssetId::from_uuid(id))
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Asset deleted".to_string(),
    })))
}
