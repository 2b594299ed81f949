//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use curator_core::config::AppConfig;
use curator_database::DatabasePool;
use curator_service::asset::AssetService;
use curator_service::folder::FolderService;
use curator_service::library::{ListingService, SelectionService, TransferService};
use curator_service::maintenance::MaintenanceService;
use curator_service::session::SessionService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Database pool (health checks).
    pub db: DatabasePool,
    /// Session validation.
    pub session_service: Arc<SessionService>,
    /// Folder CRUD.
    pub folder_service: Arc<FolderService>,
    /// Asset CRUD.
    pub asset_service: Arc<AssetService>,
    /// Library browsing.
    pub listing_service: Arc<ListingService>,
    /// Multi-select move.
    pub transfer_service: Arc<TransferService>,
    /// Batch soft delete / restore.
    pub selection_service: Arc<SelectionService>,
    /// Reconciliation and repair.
    pub maintenance_service: Arc<MaintenanceService>,
}
