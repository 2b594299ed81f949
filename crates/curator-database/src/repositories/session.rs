//! Session repository implementation.
//!
//! Sessions are issued by the external auth collaborator; this repository
//! only reads them back for request validation.

use sqlx::PgPool;

use curator_core::error::{AppError, ErrorKind};
use curator_core::result::AppResult;
use curator_entity::session::model::Session;

/// Read-side repository for sessions.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a session by its bearer token.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find session", e))
    }
}
