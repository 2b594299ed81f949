//! Session validation.
//!
//! Authentication itself lives with an external collaborator; all this
//! service does is turn a bearer token into a [`RequestContext`] or an
//! unauthorized error.

use std::sync::Arc;

use curator_core::{AppError, AppResult};
use curator_database::repositories::session::SessionRepository;
use curator_database::repositories::user::UserRepository;

use crate::context::RequestContext;

/// Resolves bearer tokens to request contexts.
#[derive(Debug, Clone)]
pub struct SessionService {
    /// Session repository.
    session_repo: Arc<SessionRepository>,
    /// User repository.
    user_repo: Arc<UserRepository>,
}

impl SessionService {
    /// Creates a new session service.
    pub fn new(session_repo: Arc<SessionRepository>, user_repo: Arc<UserRepository>) -> Self {
        Self {
            session_repo,
            user_repo,
        }
    }

    /// Validate a bearer token and build the request context.
    pub async fn validate(&self, token: &str) -> AppResult<RequestContext> {
        let session = self
            .session_repo
            .find_by_token(token)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid session"))?;

        if session.is_expired() {
            return Err(AppError::unauthorized("Session expired"));
        }

        let user = self
            .user_repo
            .find_by_id(session.user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Session user no longer exists"))?;

        Ok(RequestContext::new(user.id, user.username.clone(), user.role))
    }
}
