//! Shared test helpers for integration tests.
//!
//! These tests run against a live PostgreSQL instance; point
//! `config/test.toml` (or `CURATOR__DATABASE__URL`) at a disposable
//! database before running them.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use curator_core::config::AppConfig;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Database pool for direct queries
    pub db_pool: PgPool,
}

impl TestApp {
    /// Create a new test application
    pub async fn new() -> Self {
        let config = AppConfig::load("test").expect("Failed to load test config");

        let db = curator_database::DatabasePool::connect(&config.database)
            .await
            .expect("Failed to connect to test database");
        curator_database::migration::run_migrations(db.pool())
            .await
            .expect("Failed to run migrations");

        let db_pool = db.pool().clone();
        Self::clean_database(&db_pool).await;

        let user_repo = Arc::new(curator_database::repositories::user::UserRepository::new(
            db_pool.clone(),
        ));
        let session_repo = Arc::new(
            curator_database::repositories::session::SessionRepository::new(db_pool.clone()),
        );
        let folder_repo = Arc::new(
            curator_database::repositories::folder::FolderRepository::new(db_pool.clone()),
        );
        let asset_repo = Arc::new(curator_database::repositories::asset::AssetRepository::new(
            db_pool.clone(),
        ));
        let transfer_repo = Arc::new(
            curator_database::repositories::transfer::TransferRepository::new(db_pool.clone()),
        );

        let app_state = curator_api::state::AppState {
            config: Arc::new(config),
            db,
            session_service: Arc::new(curator_service::session::SessionService::new(
                Arc::clone(&session_repo),
                Arc::clone(&user_repo),
            )),
            folder_service: Arc::new(curator_service::folder::FolderService::new(
                Arc::clone(&folder_repo),
                Arc::clone(&asset_repo),
            )),
            asset_service: Arc::new(curator_service::asset::AssetService::new(
                Arc::clone(&asset_repo),
                Arc::clone(&folder_repo),
            )),
            listing_service: Arc::new(curator_service::library::ListingService::new(
                Arc::clone(&folder_repo),
                Arc::clone(&asset_repo),
                Arc::clone(&user_repo),
            )),
            transfer_service: Arc::new(curator_service::library::TransferService::new(
                Arc::clone(&folder_repo),
                Arc::clone(&asset_repo),
                Arc::clone(&transfer_repo),
            )),
            selection_service: Arc::new(curator_service::library::SelectionService::new(
                Arc::clone(&folder_repo),
                Arc::clone(&asset_repo),
            )),
            maintenance_service: Arc::new(curator_service::maintenance::MaintenanceService::new(
                Arc::clone(&folder_repo),
                Arc::clone(&asset_repo),
            )),
        };

        let router = curator_api::router::build_router(app_state);

        Self { router, db_pool }
    }

    /// Clean all test data from the database
    async fn clean_database(pool: &PgPool) {
        for table in ["assets", "folders", "sessions", "users"] {
            let query = format!("DELETE FROM {table}");
            let _ = sqlx::query(&query).execute(pool).await;
        }
    }

    /// Create a test user and return their ID
    pub async fn create_test_user(&self, username: &str, role: &str) -> Uuid {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO users (id, username, display_name, role) \
             VALUES ($1, $2, $3, $4::user_role)",
        )
        .bind(id)
        .bind(username)
        .bind(username)
        .bind(role)
        .execute(&self.db_pool)
        .await
        .expect("Failed to create test user");
        id
    }

    /// Issue a session for a user and return its bearer token
    pub async fn create_session(&self, user_id: Uuid) -> String {
        let token = format!("test-token-{}", Uuid::new_v4());
        sqlx::query(
            "INSERT INTO sessions (token, user_id, expires_at) \
             VALUES ($1, $2, NOW() + INTERVAL '1 hour')",
        )
        .bind(&token)
        .bind(user_id)
        .execute(&self.db_pool)
        .await
        .expect("Failed to create session");
        token
    }

    /// Create an admin user with a live session; returns the token.
    pub async fn admin_token(&self) -> String {
        let user_id = self.create_test_user("admin", "admin").await;
        self.create_session(user_id).await
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `data` field of a success envelope.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }
}
