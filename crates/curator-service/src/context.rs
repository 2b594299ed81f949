//! Request context carrying the authenticated user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use curator_core::types::UserId;
use curator_core::{AppError, AppResult};
use curator_entity::user::UserRole;

/// Context for the current authenticated request.
///
/// Extracted at the API boundary and passed into service methods so that
/// every operation knows *who* is acting. The library treats the role as
/// an opaque fact from the auth collaborator: admin may do everything,
/// everyone else nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: UserId,
    /// The username (convenience field for logging).
    pub username: String,
    /// The user's role.
    pub role: UserRole,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: UserId, username: String, role: UserRole) -> Self {
        Self {
            user_id,
            username,
            role,
            request_time: Utc::now(),
        }
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Error unless the current user is an admin.
    pub fn require_admin(&self) -> AppResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::forbidden("Administrator role required"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_admin() {
        let admin = RequestContext::new(UserId::new(), "root".into(), UserRole::Admin);
        assert!(admin.require_admin().is_ok());

        let editor = RequestContext::new(UserId::new(), "ed".into(), UserRole::Editor);
        let err = editor.require_admin().unwrap_err();
        assert_eq!(err.kind, curator_core::error::ErrorKind::Forbidden);
    }
}
