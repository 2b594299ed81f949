//! User repository implementation.
//!
//! Users are managed elsewhere in the dashboard; the library only reads
//! them for authorization roles and listing display names.

use std::collections::HashMap;

use sqlx::PgPool;

use curator_core::error::{AppError, ErrorKind};
use curator_core::result::AppResult;
use curator_core::types::UserId;
use curator_entity::user::model::User;

/// Upper bound on ids per `ANY($1)` bind.
const CHUNK_SIZE: usize = 50;

/// Read-side repository for users.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user", e))
    }

    /// Resolve a set of user ids to display labels, chunked.
    ///
    /// Unknown ids are simply absent from the map.
    pub async fn find_labels(&self, ids: &[UserId]) -> AppResult<HashMap<UserId, String>> {
        let mut labels = HashMap::with_capacity(ids.len());
        for chunk in ids.chunks(CHUNK_SIZE) {
            let users = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ANY($1)")
                .bind(chunk.to_vec())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to find users", e)
                })?;
            for user in users {
                labels.insert(user.id, user.label().to_string());
            }
        }
        Ok(labels)
    }
}
