//! Session lifecycle manager, orchestrating the full login and logout
//! flows.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use gangazon_auth::password::PasswordHasher;
use gangazon_auth::token::{TokenPair, TokenService};
use gangazon_core::error::AppError;
use gangazon_core::result::AppResult;
use gangazon_core::traits::audit::{AuditEvent, AuditSink};
use gangazon_core::traits::identity::UserSnapshot;
use gangazon_database::repositories::{ApplicationRepository, SessionRepository, UserRepository};
use gangazon_entity::session::Session;

/// Credentials and context presented at login.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Code of the application the client is logging into, if any.
    pub application_code: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginResult {
    /// Generated token pair.
    pub tokens: TokenPair,
    /// Created session row.
    pub session: Session,
    /// The authenticated user.
    pub user: UserSnapshot,
}

/// Manages the complete session lifecycle.
///
/// Credential failures are deliberately indistinguishable: an unknown
/// email and a wrong password produce the same error, so the login
/// endpoint cannot be used to enumerate accounts.
#[derive(Clone)]
pub struct SessionManager {
    /// Token issuance and revocation.
    tokens: Arc<TokenService>,
    /// Password verification.
    hasher: Arc<PasswordHasher>,
    /// User repository.
    users: Arc<UserRepository>,
    /// Registered application lookup.
    applications: Arc<ApplicationRepository>,
    /// Session persistence.
    sessions: Arc<SessionRepository>,
    /// Audit trail.
    audit: Arc<dyn AuditSink>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager").finish()
    }
}

impl SessionManager {
    /// Creates a new session manager with all required dependencies.
    pub fn new(
        tokens: Arc<TokenService>,
        hasher: Arc<PasswordHasher>,
        users: Arc<UserRepository>,
        applications: Arc<ApplicationRepository>,
        sessions: Arc<SessionRepository>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            tokens,
            hasher,
            users,
            applications,
            sessions,
            audit,
        }
    }

    /// Performs the complete login flow:
    ///
    /// 1. Resolve the target application by code (must be active)
    /// 2. Find the user by email and verify the password
    /// 3. Reject deactivated accounts
    /// 4. Issue the token pair with freshly computed permissions
    /// 5. Open a session row and append an audit entry
    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResult> {
        let application = match &request.application_code {
            Some(code) => {
                let app = self
                    .applications
                    .find_by_code(code)
                    .await?
                    .filter(|app| app.is_active)
                    .ok_or_else(|| {
                        AppError::authentication(format!("Unknown or inactive application '{code}'"))
                    })?;
                Some(app)
            }
            None => None,
        };
        let application_id = application.as_ref().map(|app| app.id);

        let user = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::authentication("Invalid email or password"))?;

        if !self
            .hasher
            .verify_password(&request.password, &user.password_hash)?
        {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(AppError::authentication("Invalid email or password"));
        }

        if !user.is_active {
            warn!(user_id = %user.id, "Login rejected: account deactivated");
            return Err(AppError::authentication("User account is deactivated"));
        }

        let snapshot = UserSnapshot {
            id: user.id,
            email: user.email.clone(),
            role: user.role.as_str().to_string(),
            organization_id: user.organization_id,
            franchise_id: user.franchise_id,
            is_active: user.is_active,
        };

        let tokens = self.tokens.issue_token_pair(&snapshot, application_id).await?;

        let session = self
            .sessions
            .open(
                user.id,
                application_id,
                request.ip_address.as_deref(),
                request.user_agent.as_deref(),
            )
            .await?;

        let mut event = AuditEvent::new(Some(user.id), "login")
            .with_details(json!({ "session_id": session.id }));
        if let Some(application_id) = application_id {
            event = event.with_application(application_id);
        }
        if let Some(ip) = &request.ip_address {
            event = event.with_ip(ip.clone());
        }
        self.audit.record(event).await?;

        info!(user_id = %user.id, session_id = %session.id, "User logged in");

        Ok(LoginResult {
            tokens,
            session,
            user: snapshot,
        })
    }

    /// Exchanges a refresh token for a fresh access token.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair> {
        self.tokens.refresh_access_token(refresh_token).await
    }

    /// Logs a user out: revokes the refresh token, closes open
    /// sessions, and appends an audit entry.
    pub async fn logout(&self, user_id: Uuid, refresh_token: &str) -> AppResult<()> {
        self.tokens.revoke_refresh_token(refresh_token).await?;
        let closed = self.sessions.close_all_for_user(user_id).await?;

        self.audit
            .record(
                AuditEvent::new(Some(user_id), "logout")
                    .with_details(json!({ "sessions_closed": closed })),
            )
            .await?;

        info!(%user_id, closed, "User logged out");
        Ok(())
    }

    /// Revokes every refresh token and session of a user, for account
    /// deactivation and credential-compromise response.
    pub async fn revoke_everywhere(&self, user_id: Uuid) -> AppResult<()> {
        let revoked = self.tokens.revoke_all_for_user(user_id).await?;
        let closed = self.sessions.close_all_for_user(user_id).await?;

        self.audit
            .record(
                AuditEvent::new(Some(user_id), "sessions_revoked").with_details(json!({
                    "tokens_revoked": revoked,
                    "sessions_closed": closed,
                })),
            )
            .await?;
        Ok(())
    }
}
