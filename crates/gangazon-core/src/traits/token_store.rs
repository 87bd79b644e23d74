//! Server-side refresh token persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::result::AppResult;

/// A stored refresh token row, keyed server-side by the raw token string.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRefreshToken {
    /// Row id.
    pub id: Uuid,
    /// The owning user.
    pub user_id: Uuid,
    /// The application the token was issued for, if any.
    pub application_id: Option<Uuid>,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
}

/// Persistence operations for refresh tokens.
///
/// Deletions are idempotent: removing an absent token is not an error.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Persist a newly issued refresh token.
    async fn store(
        &self,
        user_id: Uuid,
        application_id: Option<Uuid>,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Look up a stored token by its raw string.
    async fn find_by_token(&self, token: &str) -> AppResult<Option<StoredRefreshToken>>;

    /// Delete a stored token by its raw string. Returns `true` if a row
    /// was removed.
    async fn delete_by_token(&self, token: &str) -> AppResult<bool>;

    /// Delete every stored token belonging to a user. Returns the
    /// number of rows removed.
    async fn delete_all_for_user(&self, user_id: Uuid) -> AppResult<u64>;

    /// Delete every token past its expiry. Returns the number of rows
    /// removed.
    async fn delete_expired(&self) -> AppResult<u64>;
}
