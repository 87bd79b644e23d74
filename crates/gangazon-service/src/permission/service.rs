//! Permission definition and grant orchestration.
//!
//! Grants take effect lazily: a fresh permission set is computed at the
//! next token issue or refresh, never by rewriting live tokens.

use std::sync::Arc;

use serde_json::json;
use tracing::info;
use uuid::Uuid;

use gangazon_auth::Principal;
use gangazon_auth::access::{AccessControlEngine, protected};
use gangazon_core::error::AppError;
use gangazon_core::result::AppResult;
use gangazon_core::traits::audit::{AuditEvent, AuditSink};
use gangazon_core::traits::identity::UserSnapshot;
use gangazon_database::repositories::{PermissionRepository, UserRepository};
use gangazon_entity::permission::{Permission, PermissionGrant, SUPER_ADMIN_CODE};
use gangazon_entity::user::{Role, User};

/// Data for defining a new permission under an application.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct DefinePermissionRequest {
    pub application_id: Uuid,
    pub code: String,
    pub display_name: String,
    pub description: Option<String>,
    pub category: Option<String>,
}

/// Permission catalogue and grant management.
#[derive(Clone)]
pub struct PermissionService {
    permissions: Arc<PermissionRepository>,
    users: Arc<UserRepository>,
    engine: Arc<AccessControlEngine>,
    audit: Arc<dyn AuditSink>,
}

impl PermissionService {
    /// Creates a new permission service.
    pub fn new(
        permissions: Arc<PermissionRepository>,
        users: Arc<UserRepository>,
        engine: Arc<AccessControlEngine>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            permissions,
            users,
            engine,
            audit,
        }
    }

    /// Lists the permissions defined under an application.
    pub async fn list_for_application(
        &self,
        principal: &Principal,
        application_id: Uuid,
    ) -> AppResult<Vec<Permission>> {
        require_platform_admin(principal)?;
        self.permissions.find_by_application(application_id).await
    }

    /// Defines a new permission. The universal bypass code is reserved.
    pub async fn define(
        &self,
        principal: &Principal,
        request: DefinePermissionRequest,
    ) -> AppResult<Permission> {
        require_super_admin(principal)?;

        if request.code.trim().is_empty() {
            return Err(AppError::validation("Permission code must not be empty"));
        }
        if request.code == SUPER_ADMIN_CODE {
            return Err(AppError::validation(
                "Permission code 'super_admin' is reserved",
            ));
        }

        let permission = self
            .permissions
            .create(
                request.application_id,
                &request.code,
                &request.display_name,
                request.description.as_deref(),
                request.category.as_deref(),
            )
            .await?;

        info!(permission_id = %permission.id, code = %permission.code, "permission defined");
        self.audit
            .record(
                AuditEvent::new(Some(principal.user_id), "permission_defined")
                    .with_application(permission.application_id)
                    .with_details(json!({
                        "permission_id": permission.id,
                        "code": permission.code,
                    })),
            )
            .await?;

        Ok(permission)
    }

    /// Deactivates a permission definition. The universal bypass row is
    /// protected.
    pub async fn deactivate(&self, principal: &Principal, id: Uuid) -> AppResult<()> {
        require_super_admin(principal)?;

        let permission = self
            .permissions
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Permission not found"))?;
        protected::ensure_permission_mutable(&permission)?;

        self.permissions.deactivate(id).await?;

        info!(permission_id = %id, code = %permission.code, "permission deactivated");
        self.audit
            .record(
                AuditEvent::new(Some(principal.user_id), "permission_deactivated")
                    .with_application(permission.application_id)
                    .with_details(json!({
                        "permission_id": id,
                        "code": permission.code,
                    })),
            )
            .await?;

        Ok(())
    }

    /// Grants a permission to a user.
    ///
    /// Only a universal-grant holder may hand out the universal grant
    /// itself.
    pub async fn grant(
        &self,
        principal: &Principal,
        user_id: Uuid,
        permission_id: Uuid,
    ) -> AppResult<PermissionGrant> {
        let (permission, target) = self.load_grant_pair(principal, user_id, permission_id).await?;

        if permission.code == SUPER_ADMIN_CODE && !principal.is_super_admin() {
            return Err(AppError::authorization(
                "Only a super administrator may grant the universal permission",
            ));
        }
        if !permission.is_active {
            return Err(AppError::validation("Permission is not active"));
        }
        if !target.is_active {
            return Err(AppError::validation("User account is deactivated"));
        }

        let grant = self
            .permissions
            .grant(user_id, permission_id, Some(principal.user_id))
            .await?;

        info!(user_id = %user_id, code = %permission.code, "permission granted");
        self.audit
            .record(
                AuditEvent::new(Some(principal.user_id), "permission_granted")
                    .with_application(permission.application_id)
                    .with_details(json!({
                        "user_id": user_id,
                        "permission_id": permission_id,
                        "code": permission.code,
                    })),
            )
            .await?;

        Ok(grant)
    }

    /// Revokes a granted permission from a user.
    pub async fn revoke(
        &self,
        principal: &Principal,
        user_id: Uuid,
        permission_id: Uuid,
    ) -> AppResult<()> {
        let (permission, _target) = self.load_grant_pair(principal, user_id, permission_id).await?;

        if permission.code == SUPER_ADMIN_CODE && !principal.is_super_admin() {
            return Err(AppError::authorization(
                "Only a super administrator may revoke the universal permission",
            ));
        }

        let removed = self.permissions.revoke(user_id, permission_id).await?;
        if !removed {
            return Err(AppError::not_found(
                "User does not hold the given permission",
            ));
        }

        info!(user_id = %user_id, code = %permission.code, "permission revoked");
        self.audit
            .record(
                AuditEvent::new(Some(principal.user_id), "permission_revoked")
                    .with_application(permission.application_id)
                    .with_details(json!({
                        "user_id": user_id,
                        "permission_id": permission_id,
                        "code": permission.code,
                    })),
            )
            .await?;

        Ok(())
    }

    /// Lists a user's grants, visible to the user themselves and to
    /// their administrators.
    pub async fn grants_for_user(
        &self,
        principal: &Principal,
        user_id: Uuid,
    ) -> AppResult<Vec<PermissionGrant>> {
        if principal.user_id != user_id {
            let target = self.target_snapshot(user_id).await?;
            self.engine.can_access_user(principal, &target).require()?;
        }
        self.permissions.grants_for_user(user_id).await
    }

    /// Loads the permission row and the target user for a grant or
    /// revoke, with management rights over the target checked.
    async fn load_grant_pair(
        &self,
        principal: &Principal,
        user_id: Uuid,
        permission_id: Uuid,
    ) -> AppResult<(Permission, User)> {
        require_platform_admin(principal)?;

        let permission = self
            .permissions
            .find_by_id(permission_id)
            .await?
            .ok_or_else(|| AppError::not_found("Permission not found"))?;
        let target = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        self.engine
            .can_manage_user(principal, &snapshot_of(&target))
            .require()?;

        Ok((permission, target))
    }

    async fn target_snapshot(&self, user_id: Uuid) -> AppResult<UserSnapshot> {
        let target = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        Ok(snapshot_of(&target))
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

/// Super-admin grant or platform administrator role.
fn require_platform_admin(principal: &Principal) -> AppResult<()> {
    if principal.is_super_admin() || principal.role == Role::Admin {
        return Ok(());
    }
    Err(AppError::authorization(
        "Administrator privileges are required",
    ))
}

/// Super-admin grant only.
fn require_super_admin(principal: &Principal) -> AppResult<()> {
    if principal.is_super_admin() {
        return Ok(());
    }
    Err(AppError::authorization(
        "Super administrator privileges are required",
    ))
}

impl std::fmt::Debug for PermissionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionService").finish()
    }
}
