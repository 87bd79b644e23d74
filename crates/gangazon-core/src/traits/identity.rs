//! User identity and per-application permission lookups used by the
//! token lifecycle.

use async_trait::async_trait;
use uuid::Uuid;

use crate::result::AppResult;

/// Projection of a user row as needed for claims construction.
///
/// Role is carried as the raw persisted code; the auth crate parses it
/// into the closed platform role enum.
#[derive(Debug, Clone, PartialEq)]
pub struct UserSnapshot {
    /// The user id.
    pub id: Uuid,
    /// The user's login email.
    pub email: String,
    /// Platform role code.
    pub role: String,
    /// The organization the user is scoped to, if any.
    pub organization_id: Option<Uuid>,
    /// The franchise the user is scoped to, if any.
    pub franchise_id: Option<Uuid>,
    /// Whether the account is active.
    pub is_active: bool,
}

/// User and permission lookups for token issuance and refresh.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Look up a user by id.
    async fn user_by_id(&self, user_id: Uuid) -> AppResult<Option<UserSnapshot>>;

    /// Look up a user by email (case-insensitive).
    async fn user_by_email(&self, email: &str) -> AppResult<Option<UserSnapshot>>;

    /// The permission codes granted to a user, optionally narrowed to
    /// one application.
    ///
    /// Always queried fresh at issue and refresh time; permissions are
    /// never trusted from a previously issued token.
    async fn permission_codes(
        &self,
        user_id: Uuid,
        application_id: Option<Uuid>,
    ) -> AppResult<Vec<String>>;
}
