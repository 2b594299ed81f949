//! Library entry points: browse, move, trash, restore.

use axum::Json;
use axum::extract::{Query, State};
use validator::Validate;

use curator_core::error::AppError;
use curator_core::types::pagination::PageRequest;
use curator_core::types::FolderId;
use curator_service::library::listing::{LibraryListing, LibraryQuery};
use curator_service::library::selection::SelectionOutcome;
use curator_service::library::transfer::MoveOutcome;

use crate::dto::request::{ListLibraryParams, MoveItemsRequest, SelectionRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/library
pub async fn browse(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListLibraryParams>,
) -> Result<Json<ApiResponse<LibraryListing>>, ApiError> {
    let page = PageRequest::new(
        params.page.unwrap_or(1),
        params.limit.unwrap_or(PageRequest::default().limit),
    );

    let listing = state
        .listing_service
        .browse(
            &auth,
            LibraryQuery {
                folder_id: params.folder_id.map(FolderId::from_uuid),
                query: params.query,
                sort_by: params.sort_by.unwrap_or_default(),
                sort_order: params.sort_order.unwrap_or_default(),
                page,
            },
        )
        .await?;

    Ok(Json(ApiResponse::ok(listing)))
}

/// POST /api/library/move
pub async fn move_items(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<MoveItemsRequest>,
) -> Result<Json<ApiResponse<MoveOutcome>>, ApiError> {
    req.validate()
        .map_err(|e| ApiError(AppError::validation(e.to_string())))?;

    let outcome = state
        .transfer_service
        .move_items(
            &auth,
            &req.item_ids,
            req.target_folder_id.map(FolderId::from_uuid),
        )
        .await?;

    Ok(Json(ApiResponse::ok(outcome)))
}

/// POST /api/library/delete
pub async fn delete_selection(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<SelectionRequest>,
) -> Result<Json<ApiResponse<SelectionOutcome>>, ApiError> {
    req.validate()
        .map_err(|e| ApiError(AppError::validation(e.to_string())))?;

    let outcome = state
        .selection_service
        .soft_delete(&auth, &req.item_ids)
        .await?;
    Ok(Json(ApiResponse::ok(outcome)))
}

/// POST /api/library/restore
pub async fn restore_selection(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<SelectionRequest>,
) -> Result<Json<ApiResponse<SelectionOutcome>>, ApiError> {
    req.validate()
        .map_err(|e| ApiError(AppError::validation(e.to_string())))?;

    let outcome = state
        .selection_service
        .restore(&auth, &req.item_ids)
        .await?;
    Ok(Json(ApiResponse::ok(outcome)))
}
