//! Claims payloads for access and refresh tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gangazon_entity::user::Role;

/// Distinguishes access tokens from refresh tokens on the wire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Short-lived token for API requests.
    Access,
    /// Long-lived, server-tracked token for minting new access tokens.
    Refresh,
}

/// Claims embedded in every access token.
///
/// The permission codes are a snapshot taken at issue time and frozen
/// for the token's short TTL; they are recomputed on refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject — the user id.
    pub sub: Uuid,
    /// The user's login email.
    pub email: String,
    /// Platform role at issue time.
    pub role: Role,
    /// Organization scope, if any.
    pub organization_id: Option<Uuid>,
    /// Franchise scope, if any.
    pub franchise_id: Option<Uuid>,
    /// The application the token was issued for, if any.
    pub application_id: Option<Uuid>,
    /// Permission codes granted at issue time.
    pub permissions: Vec<String>,
    /// Issuer, set and checked by this service.
    pub iss: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Token type discriminator.
    pub token_type: TokenType,
}

impl AccessClaims {
    /// The expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

/// Claims embedded in every refresh token. Deliberately minimal: the
/// user's current state is re-fetched at refresh time, never trusted
/// from here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Subject — the user id.
    pub sub: Uuid,
    /// The application the token was issued for, if any.
    pub application_id: Option<Uuid>,
    /// Issuer, set and checked by this service.
    pub iss: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Token type discriminator.
    pub token_type: TokenType,
}
