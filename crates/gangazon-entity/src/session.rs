//! Session and refresh token entity models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Login bookkeeping for one authenticated period. Distinct from the
/// refresh token: a session records where and when a user signed in; a
/// refresh token is the revocable credential itself.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Unique session identifier.
    pub id: Uuid,
    /// The signed-in user.
    pub user_id: Uuid,
    /// The application signed into, if any.
    pub application_id: Option<Uuid>,
    /// Origin IP address.
    pub ip_address: Option<String>,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// When the session started.
    pub created_at: DateTime<Utc>,
    /// When the session ended; `None` while open.
    pub ended_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Whether the session is still open.
    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }
}

/// One issued refresh token, persisted so it can be revoked before its
/// natural expiry.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RefreshToken {
    /// Row id.
    pub id: Uuid,
    /// The owning user.
    pub user_id: Uuid,
    /// The application the token was issued for, if any.
    pub application_id: Option<Uuid>,
    /// The raw token string (the server-side lookup key).
    #[serde(skip_serializing)]
    pub token: String,
    /// When the token was issued.
    pub created_at: DateTime<Utc>,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
}

impl RefreshToken {
    /// Whether the token is past its expiry.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}
