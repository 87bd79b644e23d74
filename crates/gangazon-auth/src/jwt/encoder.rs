//! JWT token creation with configurable signing keys and TTLs.

use chrono::{DateTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use gangazon_core::config::auth::AuthConfig;
use gangazon_core::error::AppError;
use gangazon_core::traits::identity::UserSnapshot;
use gangazon_entity::user::Role;

use super::claims::{AccessClaims, RefreshClaims, TokenType};

/// Creates signed access and refresh tokens.
///
/// Access and refresh tokens are signed with distinct secrets; both
/// carry the configured issuer.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC key for access token signing.
    access_key: EncodingKey,
    /// HMAC key for refresh token signing.
    refresh_key: EncodingKey,
    /// Access token TTL in minutes.
    access_ttl_minutes: i64,
    /// Refresh token TTL in days.
    refresh_ttl_days: i64,
    /// Issuer stamped into every token.
    issuer: String,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .field("refresh_ttl_days", &self.refresh_ttl_days)
            .field("issuer", &self.issuer)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            access_key: EncodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_key: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            access_ttl_minutes: config.access_ttl_minutes as i64,
            refresh_ttl_days: config.refresh_ttl_days as i64,
            issuer: config.issuer.clone(),
        }
    }

    /// The refresh token TTL as a chrono duration.
    pub fn refresh_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.refresh_ttl_days)
    }

    /// Generates a signed access token for the given user snapshot and
    /// freshly computed permission codes.
    pub fn encode_access_token(
        &self,
        user: &UserSnapshot,
        role: Role,
        permissions: &[String],
        application_id: Option<Uuid>,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let now = Utc::now();
        let exp = now + chrono::Duration::minutes(self.access_ttl_minutes);

        let claims = AccessClaims {
            sub: user.id,
            email: user.email.clone(),
            role,
            organization_id: user.organization_id,
            franchise_id: user.franchise_id,
            application_id,
            permissions: permissions.to_vec(),
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            token_type: TokenType::Access,
        };

        let token = encode(&Header::default(), &claims, &self.access_key)
            .map_err(|e| AppError::internal(format!("Failed to encode access token: {e}")))?;

        Ok((token, exp))
    }

    /// Generates a signed refresh token for a user.
    pub fn encode_refresh_token(
        &self,
        user_id: Uuid,
        application_id: Option<Uuid>,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let now = Utc::now();
        let exp = now + self.refresh_ttl();

        let claims = RefreshClaims {
            sub: user_id,
            application_id,
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            token_type: TokenType::Refresh,
        };

        let token = encode(&Header::default(), &claims, &self.refresh_key)
            .map_err(|e| AppError::internal(format!("Failed to encode refresh token: {e}")))?;

        Ok((token, exp))
    }
}
