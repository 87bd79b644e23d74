//! The token lifecycle service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use gangazon_core::error::AppError;
use gangazon_core::result::AppResult;
use gangazon_core::traits::identity::{IdentityStore, UserSnapshot};
use gangazon_core::traits::token_store::RefreshTokenStore;
use gangazon_entity::user::Role;

use crate::jwt::{AccessClaims, JwtDecoder, JwtEncoder, TokenRejection};
use crate::permissions::PermissionSet;

/// A freshly issued access/refresh token pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_token: String,
    pub refresh_expires_at: DateTime<Utc>,
}

/// Issues, verifies, refreshes, and revokes tokens.
///
/// Access tokens are stateless; verification is pure signature and
/// claim validation. Refresh tokens are additionally persisted
/// server-side, so revocation takes effect immediately.
#[derive(Clone)]
pub struct TokenService {
    encoder: JwtEncoder,
    decoder: JwtDecoder,
    identities: Arc<dyn IdentityStore>,
    refresh_tokens: Arc<dyn RefreshTokenStore>,
}

impl TokenService {
    pub fn new(
        encoder: JwtEncoder,
        decoder: JwtDecoder,
        identities: Arc<dyn IdentityStore>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
    ) -> Self {
        Self {
            encoder,
            decoder,
            identities,
            refresh_tokens,
        }
    }

    /// Issues a token pair for a user, computing permissions fresh for
    /// the given application scope and persisting the refresh token.
    pub async fn issue_token_pair(
        &self,
        user: &UserSnapshot,
        application_id: Option<Uuid>,
    ) -> AppResult<TokenPair> {
        let role: Role = user.role.parse()?;

        let codes = self
            .identities
            .permission_codes(user.id, application_id)
            .await?;
        let permissions = PermissionSet::from_codes(codes);

        let (access_token, access_expires_at) = self.encoder.encode_access_token(
            user,
            role,
            &permissions.to_claim_codes(),
            application_id,
        )?;
        let (refresh_token, refresh_expires_at) =
            self.encoder.encode_refresh_token(user.id, application_id)?;

        self.refresh_tokens
            .store(user.id, application_id, &refresh_token, refresh_expires_at)
            .await?;

        debug!(user_id = %user.id, "Issued token pair");

        Ok(TokenPair {
            access_token,
            access_expires_at,
            refresh_token,
            refresh_expires_at,
        })
    }

    /// Verifies an access token and returns its claims.
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims, TokenRejection> {
        self.decoder.decode_access_token(token)
    }

    /// Exchanges a valid refresh token for a new access token.
    ///
    /// The token must verify and still exist server-side. Permissions
    /// are recomputed at exchange time, so grants revoked since login
    /// disappear from the new access token. A stored row found past its
    /// expiry is deleted on the spot.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> AppResult<TokenPair> {
        let claims = match self.decoder.decode_refresh_token(refresh_token) {
            Ok(claims) => claims,
            Err(TokenRejection::Expired) => {
                // The row is dead weight once the token itself has
                // expired; drop it on the way out.
                self.refresh_tokens.delete_by_token(refresh_token).await?;
                return Err(AppError::authentication("Refresh token has expired"));
            }
            Err(TokenRejection::Invalid) => {
                return Err(AppError::authentication("Invalid refresh token"));
            }
        };

        let stored = self
            .refresh_tokens
            .find_by_token(refresh_token)
            .await?
            .ok_or_else(|| AppError::authentication("Refresh token has been revoked"))?;

        if stored.expires_at <= Utc::now() {
            // Opportunistic cleanup of the dead row.
            self.refresh_tokens.delete_by_token(refresh_token).await?;
            return Err(AppError::authentication("Refresh token has expired"));
        }

        let user = self
            .identities
            .user_by_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::authentication("User no longer exists"))?;

        if !user.is_active {
            warn!(user_id = %user.id, "Refresh attempt for deactivated user");
            return Err(AppError::authentication("User account is deactivated"));
        }

        let role: Role = user.role.parse()?;
        let codes = self
            .identities
            .permission_codes(user.id, stored.application_id)
            .await?;
        let permissions = PermissionSet::from_codes(codes);

        let (access_token, access_expires_at) = self.encoder.encode_access_token(
            &user,
            role,
            &permissions.to_claim_codes(),
            stored.application_id,
        )?;

        debug!(user_id = %user.id, "Refreshed access token");

        // The refresh token itself is not rotated; it stays valid until
        // expiry or revocation.
        Ok(TokenPair {
            access_token,
            access_expires_at,
            refresh_token: refresh_token.to_string(),
            refresh_expires_at: stored.expires_at,
        })
    }

    /// Revokes a single refresh token. Idempotent.
    pub async fn revoke_refresh_token(&self, refresh_token: &str) -> AppResult<bool> {
        self.refresh_tokens.delete_by_token(refresh_token).await
    }

    /// Revokes every refresh token belonging to a user.
    pub async fn revoke_all_for_user(&self, user_id: Uuid) -> AppResult<u64> {
        let removed = self.refresh_tokens.delete_all_for_user(user_id).await?;
        info!(%user_id, removed, "Revoked all refresh tokens for user");
        Ok(removed)
    }

    /// Deletes every stored refresh token past its expiry.
    pub async fn sweep_expired(&self) -> AppResult<u64> {
        let removed = self.refresh_tokens.delete_expired().await?;
        if removed > 0 {
            info!(removed, "Swept expired refresh tokens");
        }
        Ok(removed)
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("encoder", &self.encoder)
            .finish()
    }
}
