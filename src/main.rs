//! Curator Server: CMS asset-library backend
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use curator_core::config::AppConfig;
use curator_core::error::AppError;

#[tokio::main]
async fn main() {
    let env = std::env::var("CURATOR_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Curator v{}", env!("CARGO_PKG_VERSION"));

    // ── Database connection + migrations ─────────────────────────
    let db = curator_database::DatabasePool::connect(&config.database).await?;
    curator_database::migration::run_migrations(db.pool()).await?;
    let pool = db.pool().clone();

    // ── Repositories ─────────────────────────────────────────────
    let user_repo = Arc::new(curator_database::repositories::user::UserRepository::new(
        pool.clone(),
    ));
    let session_repo = Arc::new(
        curator_database::repositories::session::SessionRepository::new(pool.clone()),
    );
    let folder_repo = Arc::new(
        curator_database::repositories::folder::FolderRepository::new(pool.clone()),
    );
    let asset_repo = Arc::new(curator_database::repositories::asset::AssetRepository::new(
        pool.clone(),
    ));
    let transfer_repo = Arc::new(
        curator_database::repositories::transfer::TransferRepository::new(pool.clone()),
    );

    // ── Services ─────────────────────────────────────────────────
    let session_service = Arc::new(curator_service::session::SessionService::new(
        Arc::clone(&session_repo),
        Arc::clone(&user_repo),
    ));
    let folder_service = Arc::new(curator_service::folder::FolderService::new(
        Arc::clone(&folder_repo),
        Arc::clone(&asset_repo),
    ));
    let asset_service = Arc::new(curator_service::asset::AssetService::new(
        Arc::clone(&asset_repo),
        Arc::clone(&folder_repo),
    ));
    let listing_service = Arc::new(curator_service::library::ListingService::new(
        Arc::clone(&folder_repo),
        Arc::clone(&asset_repo),
        Arc::clone(&user_repo),
    ));
    let transfer_service = Arc::new(curator_service::library::TransferService::new(
        Arc::clone(&folder_repo),
        Arc::clone(&asset_repo),
        Arc::clone(&transfer_repo),
    ));
    let selection_service = Arc::new(curator_service::library::SelectionService::new(
        Arc::clone(&folder_repo),
        Arc::clone(&asset_repo),
    ));
    let maintenance_service = Arc::new(curator_service::maintenance::MaintenanceService::new(
        Arc::clone(&folder_repo),
        Arc::clone(&asset_repo),
    ));

    // ── HTTP server ──────────────────────────────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let app_state = curator_api::state::AppState {
        config: Arc::new(config),
        db,
        session_service,
        folder_service,
        asset_service,
        listing_service,
        transfer_service,
        selection_service,
        maintenance_service,
    };

    let app = curator_api::router::build_router(app_state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Curator server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("Curator server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
