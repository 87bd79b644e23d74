//! User management: administration by privileged roles plus
//! self-service profile and password operations.

use std::sync::Arc;

use serde_json::json;
use tracing::info;
use uuid::Uuid;

use gangazon_auth::Principal;
use gangazon_auth::access::AccessControlEngine;
use gangazon_auth::password::PasswordHasher;
use gangazon_core::error::AppError;
use gangazon_core::result::AppResult;
use gangazon_core::traits::audit::{AuditEvent, AuditSink};
use gangazon_core::traits::identity::UserSnapshot;
use gangazon_core::types::pagination::{PageRequest, PageResponse};
use gangazon_database::repositories::UserRepository;
use gangazon_entity::user::model::CreateUser;
use gangazon_entity::user::{Role, User};

use crate::session::SessionManager;

/// Data for creating a user.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
    pub organization_id: Option<Uuid>,
    pub franchise_id: Option<Uuid>,
}

/// Data for updating a user's profile.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

/// User administration and self-service.
#[derive(Clone)]
pub struct UserService {
    users: Arc<UserRepository>,
    engine: Arc<AccessControlEngine>,
    hasher: Arc<PasswordHasher>,
    sessions: Arc<SessionManager>,
    audit: Arc<dyn AuditSink>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        users: Arc<UserRepository>,
        engine: Arc<AccessControlEngine>,
        hasher: Arc<PasswordHasher>,
        sessions: Arc<SessionManager>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            users,
            engine,
            hasher,
            sessions,
            audit,
        }
    }

    /// Fetches a user the caller may see: themselves, or someone they
    /// manage. A denial is reported as not-found.
    pub async fn get(&self, principal: &Principal, id: Uuid) -> AppResult<User> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if !self
            .engine
            .can_access_user(principal, &snapshot_of(&user))
            .is_allowed()
        {
            return Err(AppError::not_found("User not found"));
        }
        Ok(user)
    }

    /// Lists users of the caller's organization. Admin-level only.
    pub async fn list(
        &self,
        principal: &Principal,
        page: &PageRequest,
    ) -> AppResult<PageResponse<User>> {
        if !principal.is_super_admin() && !principal.role.is_organization_scoped() {
            return Err(AppError::authorization(
                "Your role does not grant permission to list users",
            ));
        }
        let organization_id = principal
            .organization_id
            .ok_or_else(|| AppError::authorization("No organization scope"))?;

        self.users.find_by_organization(organization_id, page).await
    }

    /// Creates a user the caller is allowed to manage.
    pub async fn create(
        &self,
        principal: &Principal,
        request: CreateUserRequest,
    ) -> AppResult<User> {
        if !request.email.contains('@') {
            return Err(AppError::validation("Invalid email format"));
        }
        if request.password.len() < 8 {
            return Err(AppError::validation(
                "Password must be at least 8 characters",
            ));
        }

        // The manage rule is evaluated against the user as they would
        // exist, so role escalation is caught before the insert.
        let prospective = UserSnapshot {
            id: Uuid::nil(),
            email: request.email.clone(),
            role: request.role.as_str().to_string(),
            organization_id: request.organization_id,
            franchise_id: request.franchise_id,
            is_active: true,
        };
        self.engine.can_manage_user(principal, &prospective).require()?;

        let password_hash = self.hasher.hash_password(&request.password)?;
        let user = self
            .users
            .create(&CreateUser {
                email: request.email,
                password_hash,
                first_name: request.first_name,
                last_name: request.last_name,
                phone: request.phone,
                role: request.role,
                organization_id: request.organization_id,
                franchise_id: request.franchise_id,
            })
            .await?;

        self.audit
            .record(
                AuditEvent::new(Some(principal.user_id), "user_created")
                    .with_details(json!({ "user_id": user.id, "role": user.role })),
            )
            .await?;

        info!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// Updates a profile: one's own, or that of a managed user.
    pub async fn update_profile(
        &self,
        principal: &Principal,
        id: Uuid,
        request: UpdateProfileRequest,
    ) -> AppResult<User> {
        // Re-uses the masked visibility rule.
        let _ = self.get(principal, id).await?;

        self.users
            .update_profile(
                id,
                request.first_name.as_deref(),
                request.last_name.as_deref(),
                request.phone.as_deref(),
            )
            .await
    }

    /// Changes the caller's own password, verifying the current one.
    pub async fn change_password(
        &self,
        principal: &Principal,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        if new_password.len() < 8 {
            return Err(AppError::validation(
                "Password must be at least 8 characters",
            ));
        }

        let user = self
            .users
            .find_by_id(principal.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if !self
            .hasher
            .verify_password(current_password, &user.password_hash)?
        {
            return Err(AppError::authentication("Current password is incorrect"));
        }

        let password_hash = self.hasher.hash_password(new_password)?;
        self.users
            .update_password(principal.user_id, &password_hash)
            .await?;

        self.audit
            .record(AuditEvent::new(Some(principal.user_id), "password_changed"))
            .await?;
        Ok(())
    }

    /// Changes a managed user's platform role.
    pub async fn change_role(&self, principal: &Principal, id: Uuid, role: Role) -> AppResult<User> {
        let target = self.get(principal, id).await?;
        self.engine
            .can_manage_user(principal, &snapshot_of(&target))
            .require()?;

        // The new role must also be one the caller may manage,
        // otherwise a franchisee could promote someone to admin.
        let escalated = UserSnapshot {
            role: role.as_str().to_string(),
            ..snapshot_of(&target)
        };
        self.engine.can_manage_user(principal, &escalated).require()?;

        let updated = self.users.update_role(id, role).await?;

        self.audit
            .record(
                AuditEvent::new(Some(principal.user_id), "user_role_changed")
                    .with_details(json!({ "user_id": id, "role": role })),
            )
            .await?;
        Ok(updated)
    }

    /// Deactivates a managed user, revoking all their tokens and
    /// closing their sessions.
    pub async fn deactivate(&self, principal: &Principal, id: Uuid) -> AppResult<User> {
        let target = self.get(principal, id).await?;
        self.engine
            .can_manage_user(principal, &snapshot_of(&target))
            .require()?;

        let updated = self.users.set_active(id, false).await?;
        self.sessions.revoke_everywhere(id).await?;

        self.audit
            .record(
                AuditEvent::new(Some(principal.user_id), "user_deactivated")
                    .with_details(json!({ "user_id": id })),
            )
            .await?;

        info!(user_id = %id, "User deactivated");
        Ok(updated)
    }

    /// Reactivates a managed user.
    pub async fn reactivate(&self, principal: &Principal, id: Uuid) -> AppResult<User> {
        let target = self.get(principal, id).await?;
        self.engine
            .can_manage_user(principal, &snapshot_of(&target))
            .require()?;

        let updated = self.users.set_active(id, true).await?;

        self.audit
            .record(
                AuditEvent::new(Some(principal.user_id), "user_reactivated")
                    .with_details(json!({ "user_id": id })),
            )
            .await?;
        Ok(updated)
    }
}

fn snapshot_of(user: &User) -> UserSnapshot {
    UserSnapshot {
        id: user.id,
        email: user.email.clone(),
        role: user.role.as_str().to_string(),
        organization_id: user.organization_id,
        franchise_id: user.franchise_id,
        is_active: user.is_active,
    }
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService").finish()
    }
}
