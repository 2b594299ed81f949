//! Folder CRUD handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;
use validator::Validate;

use curator_core::error::AppError;
use curator_core::types::FolderId;
use curator_database::repositories::folder::DeletedSubtree;
use curator_entity::folder::model::Folder;
use curator_service::folder::service::{
    CreateFolderRequest as SvcCreateFolder, UpdateFolderRequest as SvcUpdateFolder,
};

use crate::dto::request::{
    CreateFolderRequest, DeleteFolderParams, ListChildrenParams, UpdateFolderRequest,
};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/folders
pub async fn create_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateFolderRequest>,
) -> Result<Json<ApiResponse<Folder>>, ApiError> {
    req.validate()
        .map_err(|e| ApiError(AppError::validation(e.to_string())))?;

    let folder = state
        .folder_service
        .create_folder(
            &auth,
            SvcCreateFolder {
                name: req.name,
                parent_id: req.parent_id.map(FolderId::from_uuid),
                description: req.description,
            },
        )
        .await?;

    Ok(Json(ApiResponse::ok(folder)))
}

/// GET /api/folders/{id}
pub async fn get_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Folder>>, ApiError> {
    let folder = state
        .folder_service
        .get_folder(&auth, FolderId::from_uuid(id))
        .await?;
    Ok(Json(ApiResponse::ok(folder)))
}

/// GET /api/folders/{id}/children
pub async fn list_children(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(params): Query<ListChildrenParams>,
) -> Result<Json<ApiResponse<Vec<Folder>>>, ApiError> {
    let children = state
        .folder_service
        .list_children(
            &auth,
            Some(FolderId::from_uuid(id)),
            params.query.as_deref(),
            params.sort_by.unwrap_or_default(),
            params.sort_order.unwrap_or_default(),
        )
        .await?;
    Ok(Json(ApiResponse::ok(children)))
}

/// GET /api/folders/{id}/descendants
pub async fn list_descendants(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Folder>>>, ApiError> {
    let descendants = state
        .folder_service
        .list_descendants(&auth, FolderId::from_uuid(id))
        .await?;
    Ok(Json(ApiResponse::ok(descendants)))
}

/// PUT /api/folders/{id}
pub async fn update_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateFolderRequest>,
) -> Result<Json<ApiResponse<Folder>>, ApiError> {
    req.validate()
        .map_err(|e| ApiError(AppError::validation(e.to_string())))?;

    let folder = state
        .folder_service
        .update_folder(
            &auth,
            FolderId::from_uuid(id),
            SvcUpdateFolder {
                name: req.name,
                description: req.description,
            },
        )
        .await?;

    Ok(Json(ApiResponse::ok(folder)))
}

/// DELETE /api/folders/{id}
pub async fn delete_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(params): Query<DeleteFolderParams>,
) -> Result<Json<ApiResponse<DeletedSubtree>>, ApiError> {
    let report = state
        .folder_service
        .delete_folder(&auth, FolderId::from_uuid(id), params.recursive)
        .await?;
    Ok(Json(ApiResponse::ok(report)))
}
