//! Token lifecycle: issue, verify, refresh, revoke.

mod helpers;

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use gangazon_auth::jwt::{JwtDecoder, JwtEncoder, RefreshClaims, TokenType};
use gangazon_auth::{TokenService, Principal};
use gangazon_core::error::ErrorKind;
use gangazon_core::traits::token_store::RefreshTokenStore;
use gangazon_entity::user::Role;
use helpers::{FakeIdentities, FakeRefreshTokens, snapshot, test_auth_config};

struct Harness {
    service: TokenService,
    identities: Arc<FakeIdentities>,
    refresh_tokens: Arc<FakeRefreshTokens>,
}

fn harness() -> Harness {
    let config = test_auth_config();
    let identities = Arc::new(FakeIdentities::default());
    let refresh_tokens = Arc::new(FakeRefreshTokens::default());
    let service = TokenService::new(
        JwtEncoder::new(&config),
        JwtDecoder::new(&config),
        identities.clone(),
        refresh_tokens.clone(),
    );
    Harness {
        service,
        identities,
        refresh_tokens,
    }
}

#[tokio::test]
async fn issued_access_token_verifies_and_carries_permissions() {
    let h = harness();
    let user = snapshot("manager", Some(Uuid::new_v4()));
    h.identities.add_user(user.clone());
    h.identities
        .grant(user.id, None, &["locations.read", "checkins.read"]);

    let pair = h.service.issue_token_pair(&user, None).await.unwrap();
    let claims = h.service.verify_access_token(&pair.access_token).unwrap();

    assert_eq!(claims.sub, user.id);
    assert_eq!(claims.role, Role::Manager);
    assert_eq!(claims.permissions, vec!["checkins.read", "locations.read"]);
    assert_eq!(h.refresh_tokens.len(), 1);
}

#[tokio::test]
async fn permissions_are_scoped_per_application() {
    let h = harness();
    let app = Uuid::new_v4();
    let user = snapshot("employee", Some(Uuid::new_v4()));
    h.identities.add_user(user.clone());
    h.identities.grant(user.id, Some(app), &["checkins.create"]);
    h.identities.grant(user.id, None, &["profile.read"]);

    let pair = h.service.issue_token_pair(&user, Some(app)).await.unwrap();
    let claims = h.service.verify_access_token(&pair.access_token).unwrap();

    assert_eq!(claims.application_id, Some(app));
    assert_eq!(claims.permissions, vec!["checkins.create"]);
}

#[tokio::test]
async fn refresh_recomputes_permissions() {
    let h = harness();
    let user = snapshot("employee", Some(Uuid::new_v4()));
    h.identities.add_user(user.clone());
    h.identities.grant(user.id, None, &["checkins.create"]);

    let pair = h.service.issue_token_pair(&user, None).await.unwrap();

    // Grants revoked after login must not survive a refresh.
    h.identities.revoke_all(user.id);
    let refreshed = h
        .service
        .refresh_access_token(&pair.refresh_token)
        .await
        .unwrap();
    let claims = h.service.verify_access_token(&refreshed.access_token).unwrap();

    assert!(claims.permissions.is_empty());
    // The refresh token itself is unchanged.
    assert_eq!(refreshed.refresh_token, pair.refresh_token);
}

#[tokio::test]
async fn revoked_refresh_token_is_rejected() {
    let h = harness();
    let user = snapshot("viewer", Some(Uuid::new_v4()));
    h.identities.add_user(user.clone());

    let pair = h.service.issue_token_pair(&user, None).await.unwrap();
    assert!(h
        .service
        .revoke_refresh_token(&pair.refresh_token)
        .await
        .unwrap());

    let err = h
        .service
        .refresh_access_token(&pair.refresh_token)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authentication);

    // Revoking again is a no-op, not an error.
    assert!(!h
        .service
        .revoke_refresh_token(&pair.refresh_token)
        .await
        .unwrap());
}

#[tokio::test]
async fn expired_stored_row_is_deleted_on_refresh_attempt() {
    let h = harness();
    let user = snapshot("employee", Some(Uuid::new_v4()));
    h.identities.add_user(user.clone());

    let pair = h.service.issue_token_pair(&user, None).await.unwrap();
    h.refresh_tokens.force_expire(&pair.refresh_token);

    let err = h
        .service
        .refresh_access_token(&pair.refresh_token)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authentication);
    // The dead row is swept as a side effect.
    assert_eq!(h.refresh_tokens.len(), 0);
}

#[tokio::test]
async fn refresh_token_past_its_jwt_expiry_sweeps_the_stored_row() {
    let h = harness();
    let user = snapshot("employee", Some(Uuid::new_v4()));
    h.identities.add_user(user.clone());

    // A refresh token whose embedded expiry has already passed, with
    // its stored row still present as if issued back then.
    let now = Utc::now();
    let expired_at = now - Duration::days(1);
    let claims = RefreshClaims {
        sub: user.id,
        application_id: None,
        iss: "gangazon-auth-service".into(),
        iat: (now - Duration::days(8)).timestamp(),
        exp: expired_at.timestamp(),
        token_type: TokenType::Refresh,
    };
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(b"test-refresh-secret"),
    )
    .unwrap();
    h.refresh_tokens
        .store(user.id, None, &token, expired_at)
        .await
        .unwrap();
    assert_eq!(h.refresh_tokens.len(), 1);

    let err = h.service.refresh_access_token(&token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authentication);
    // The dead row is swept even though decoding rejected the token.
    assert_eq!(h.refresh_tokens.len(), 0);
}

#[tokio::test]
async fn deactivated_user_cannot_refresh() {
    let h = harness();
    let user = snapshot("manager", Some(Uuid::new_v4()));
    h.identities.add_user(user.clone());

    let pair = h.service.issue_token_pair(&user, None).await.unwrap();
    h.identities.deactivate(user.id);

    let err = h
        .service
        .refresh_access_token(&pair.refresh_token)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authentication);
}

#[tokio::test]
async fn revoke_all_clears_every_session_of_a_user() {
    let h = harness();
    let user = snapshot("employee", Some(Uuid::new_v4()));
    let other = snapshot("viewer", Some(Uuid::new_v4()));
    h.identities.add_user(user.clone());
    h.identities.add_user(other.clone());

    h.service.issue_token_pair(&user, None).await.unwrap();
    h.service
        .issue_token_pair(&user, Some(Uuid::new_v4()))
        .await
        .unwrap();
    let kept = h.service.issue_token_pair(&other, None).await.unwrap();

    assert_eq!(h.service.revoke_all_for_user(user.id).await.unwrap(), 2);
    assert_eq!(h.refresh_tokens.len(), 1);
    assert!(h
        .service
        .refresh_access_token(&kept.refresh_token)
        .await
        .is_ok());
}

#[tokio::test]
async fn sweep_removes_only_expired_rows() {
    let h = harness();
    let user = snapshot("employee", Some(Uuid::new_v4()));
    h.identities.add_user(user.clone());

    let stale = h.service.issue_token_pair(&user, None).await.unwrap();
    let _live = h
        .service
        .issue_token_pair(&user, Some(Uuid::new_v4()))
        .await
        .unwrap();
    h.refresh_tokens.force_expire(&stale.refresh_token);

    assert_eq!(h.service.sweep_expired().await.unwrap(), 1);
    assert_eq!(h.refresh_tokens.len(), 1);
}

#[tokio::test]
async fn super_admin_grant_collapses_in_the_issued_token() {
    let h = harness();
    let user = snapshot("admin", Some(Uuid::new_v4()));
    h.identities.add_user(user.clone());
    h.identities
        .grant(user.id, None, &["users.read", "super_admin", "users.write"]);

    let pair = h.service.issue_token_pair(&user, None).await.unwrap();
    let claims = h.service.verify_access_token(&pair.access_token).unwrap();

    assert_eq!(claims.permissions, vec!["super_admin"]);
    let principal = Principal::from(claims);
    assert!(principal.is_super_admin());
}

#[tokio::test]
async fn unknown_role_code_fails_issuance() {
    let h = harness();
    let user = snapshot("warlord", Some(Uuid::new_v4()));
    h.identities.add_user(user.clone());

    let err = h.service.issue_token_pair(&user, None).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}
