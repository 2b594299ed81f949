//! Route definitions for the Curator HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`. The
//! router receives `AppState` and passes it to all handlers via Axum's
//! `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(library_routes())
        .merge(folder_routes())
        .merge(asset_routes())
        .merge(admin_routes())
        .merge(health_routes());

    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);
    let max_body = state.config.server.max_body_size_bytes;

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Library browsing and multi-select operations
fn library_routes() -> Router<AppState> {
    Router::new()
        .route("/library", get(handlers::library::browse))
        .route("/library/move", post(handlers::library::move_items))
        .route("/library/delete", post(handlers::library::delete_selection))
        .route(
            "/library/restore",
            post(handlers::library::restore_selection),
        )
}

/// Folder CRUD
fn folder_routes() -> Router<AppState> {
    Router::new()
        .route("/folders", post(handlers::folder::create_folder))
        .route("/folders/{id}", get(handlers::folder::get_folder))
        .route("/folders/{id}", put(handlers::folder::update_folder))
        .route("/folders/{id}", delete(handlers::folder::delete_folder))
        .route(
            "/folders/{id}/children",
            get(handlers::folder::list_children),
        )
        .route(
            "/folders/{id}/descendants",
            get(handlers::folder::list_descendants),
        )
}

/// Asset CRUD
fn asset_routes() -> Router<AppState> {
    Router::new()
        .route("/assets", post(handlers::asset::register_asset))
        .route("/assets/{id}", get(handlers::asset::get_asset))
        .route("/assets/{id}", put(handlers::asset::update_asset))
        .route("/assets/{id}", delete(handlers::asset::delete_asset))
        .route("/assets/{id}/move", put(handlers::asset::move_asset))
}

/// Administrative and maintenance endpoints
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/folders", get(handlers::admin::list_folders))
        .route(
            "/admin/maintenance/counters",
            post(handlers::admin::recompute_counters),
        )
        .route(
            "/admin/maintenance/consistency",
            get(handlers::admin::check_consistency),
        )
        .route(
            "/admin/maintenance/repair",
            post(handlers::admin::repair_paths),
        )
}

/// Health endpoints
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}
