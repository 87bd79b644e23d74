//! JWT validation with a typed expired-vs-invalid split.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use gangazon_core::config::auth::AuthConfig;

use super::claims::{AccessClaims, RefreshClaims, TokenType};

/// Why a token was rejected.
///
/// Callers react differently: an expired access token may trigger the
/// refresh flow; an invalid one is a hard reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenRejection {
    /// Signature was valid but the token is past its expiry.
    #[error("token has expired")]
    Expired,
    /// Malformed token, bad signature, wrong issuer, or wrong type.
    #[error("invalid token")]
    Invalid,
}

/// Validates access and refresh tokens.
///
/// Verification is pure computation over the signed token: no store
/// access is needed per call.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC key for access token verification.
    access_key: DecodingKey,
    /// HMAC key for refresh token verification.
    refresh_key: DecodingKey,
    /// Shared validation settings (expiry, issuer).
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // 5 seconds leeway for clock skew
        validation.set_issuer(&[config.issuer.clone()]);

        Self {
            access_key: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_key: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token string.
    ///
    /// Checks signature, expiry, issuer, and that the token type is
    /// `access`.
    pub fn decode_access_token(&self, token: &str) -> Result<AccessClaims, TokenRejection> {
        let claims = decode::<AccessClaims>(token, &self.access_key, &self.validation)
            .map(|data| data.claims)
            .map_err(rejection_for)?;

        if claims.token_type != TokenType::Access {
            return Err(TokenRejection::Invalid);
        }

        Ok(claims)
    }

    /// Decodes and validates a refresh token string.
    pub fn decode_refresh_token(&self, token: &str) -> Result<RefreshClaims, TokenRejection> {
        let claims = decode::<RefreshClaims>(token, &self.refresh_key, &self.validation)
            .map(|data| data.claims)
            .map_err(rejection_for)?;

        if claims.token_type != TokenType::Refresh {
            return Err(TokenRejection::Invalid);
        }

        Ok(claims)
    }
}

/// Collapses the jsonwebtoken error kinds into the typed rejection.
fn rejection_for(err: jsonwebtoken::errors::Error) -> TokenRejection {
    match err.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenRejection::Expired,
        _ => TokenRejection::Invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::encoder::JwtEncoder;
    use gangazon_core::config::auth::AuthConfig;
    use gangazon_core::traits::identity::UserSnapshot;
    use gangazon_entity::user::Role;
    use uuid::Uuid;

    fn test_config() -> AuthConfig {
        AuthConfig {
            access_secret: "access-secret-for-tests".into(),
            refresh_secret: "refresh-secret-for-tests".into(),
            access_ttl_minutes: 30,
            refresh_ttl_days: 7,
            issuer: "gangazon-auth-service".into(),
        }
    }

    fn snapshot() -> UserSnapshot {
        UserSnapshot {
            id: Uuid::new_v4(),
            email: "worker@gangazon.example".into(),
            role: "employee".into(),
            organization_id: Some(Uuid::new_v4()),
            franchise_id: None,
            is_active: true,
        }
    }

    #[test]
    fn access_token_round_trip() {
        let config = test_config();
        let encoder = JwtEncoder::new(&config);
        let decoder = JwtDecoder::new(&config);
        let user = snapshot();
        let permissions = vec!["checkins.create".to_string()];

        let (token, _) = encoder
            .encode_access_token(&user, Role::Employee, &permissions, None)
            .unwrap();
        let claims = decoder.decode_access_token(&token).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, Role::Employee);
        assert_eq!(claims.permissions, permissions);
        assert_eq!(claims.iss, "gangazon-auth-service");
    }

    #[test]
    fn refresh_token_is_not_an_access_token() {
        let config = test_config();
        let encoder = JwtEncoder::new(&config);
        let decoder = JwtDecoder::new(&config);

        let (token, _) = encoder.encode_refresh_token(Uuid::new_v4(), None).unwrap();
        // Signed with a different secret and a different type.
        assert_eq!(
            decoder.decode_access_token(&token),
            Err(TokenRejection::Invalid)
        );
        assert!(decoder.decode_refresh_token(&token).is_ok());
    }

    #[test]
    fn garbage_is_invalid() {
        let decoder = JwtDecoder::new(&test_config());
        assert_eq!(
            decoder.decode_access_token("not.a.token"),
            Err(TokenRejection::Invalid)
        );
    }

    #[test]
    fn wrong_issuer_is_invalid() {
        let mut other = test_config();
        other.issuer = "someone-else".into();
        let encoder = JwtEncoder::new(&other);
        let decoder = JwtDecoder::new(&test_config());

        let (token, _) = encoder
            .encode_access_token(&snapshot(), Role::Viewer, &[], None)
            .unwrap();
        assert_eq!(
            decoder.decode_access_token(&token),
            Err(TokenRejection::Invalid)
        );
    }
}
