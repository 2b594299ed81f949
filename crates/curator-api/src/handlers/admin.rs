//! Administrative and maintenance handlers.

use axum::Json;
use axum::extract::State;

use curator_entity::folder::model::Folder;
use curator_service::maintenance::{ConsistencyReport, RepairReport};

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/admin/folders
pub async fn list_folders(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<Folder>>>, ApiError> {
    let folders = state.folder_service.list_all(&auth).await?;
    Ok(Json(ApiResponse::ok(folders)))
}

/// POST /api/admin/maintenance/counters
pub async fn recompute_counters(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let updated = state.maintenance_service.recompute_counters(&auth).await?;
    Ok(Json(ApiResponse::ok(
        serde_json::json!({ "foldersUpdated": updated }),
    )))
}

/// GET /api/admin/maintenance/consistency
pub async fn check_consistency(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<ConsistencyReport>>, ApiError> {
    let report = state.maintenance_service.check_consistency(&auth).await?;
    Ok(Json(ApiResponse::ok(report)))
}

/// POST /api/admin/maintenance/repair
pub async fn repair_paths(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<RepairReport>>, ApiError> {
    let report = state.maintenance_service.repair_paths(&auth).await?;
    Ok(Json(ApiResponse::ok(report)))
}
