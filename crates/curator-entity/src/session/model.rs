//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use curator_core::types::{SessionId, UserId};

/// An authenticated session, issued by the external auth collaborator.
///
/// The library only ever reads sessions: a bearer token resolves to a
/// user id and role, nothing more.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Unique session identifier.
    pub id: SessionId,
    /// Opaque bearer token presented by the client.
    pub token: String,
    /// The user this session belongs to.
    pub user_id: UserId,
    /// When the session stops being valid.
    pub expires_at: DateTime<Utc>,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session has expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}
