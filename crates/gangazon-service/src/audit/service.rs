//! Audit trail query orchestration.
//!
//! The trail itself is append-only; writes go through the `AuditSink`
//! recorded by the mutating services. This service only reads.

use std::sync::Arc;

use uuid::Uuid;

use gangazon_auth::Principal;
use gangazon_auth::access::AccessControlEngine;
use gangazon_core::error::AppError;
use gangazon_core::result::AppResult;
use gangazon_core::traits::identity::{IdentityStore, UserSnapshot};
use gangazon_core::types::pagination::{PageRequest, PageResponse};
use gangazon_database::repositories::AuditLogRepository;
use gangazon_entity::audit::AuditLogEntry;

/// Read-only access to the audit trail.
#[derive(Clone)]
pub struct AuditService {
    entries: Arc<AuditLogRepository>,
    identities: Arc<dyn IdentityStore>,
    engine: Arc<AccessControlEngine>,
}

impl AuditService {
    /// Creates a new audit service.
    pub fn new(
        entries: Arc<AuditLogRepository>,
        identities: Arc<dyn IdentityStore>,
        engine: Arc<AccessControlEngine>,
    ) -> Self {
        Self {
            entries,
            identities,
            engine,
        }
    }

    /// The most recent entries across the whole platform.
    pub async fn recent(
        &self,
        principal: &Principal,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AuditLogEntry>> {
        require_super_admin(principal)?;
        self.entries.find_recent(page).await
    }

    /// Entries whose action starts with the given prefix, e.g.
    /// `"checkin_"`.
    pub async fn by_action(
        &self,
        principal: &Principal,
        action_prefix: &str,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AuditLogEntry>> {
        require_super_admin(principal)?;
        if action_prefix.trim().is_empty() {
            return Err(AppError::validation("Action prefix must not be empty"));
        }
        self.entries.find_by_action(action_prefix, page).await
    }

    /// One user's trail. Users may read their own; administrators may
    /// read the trail of anyone they manage.
    pub async fn for_user(
        &self,
        principal: &Principal,
        user_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AuditLogEntry>> {
        if principal.user_id != user_id {
            let target = self.target_snapshot(user_id).await?;
            self.engine.can_access_user(principal, &target).require()?;
        }
        self.entries.find_by_user(user_id, page).await
    }

    async fn target_snapshot(&self, user_id: Uuid) -> AppResult<UserSnapshot> {
        self.identities
            .user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }
}

fn require_super_admin(principal: &Principal) -> AppResult<()> {
    if principal.is_super_admin() {
        return Ok(());
    }
    Err(AppError::authorization(
        "Super administrator privileges are required",
    ))
}

impl std::fmt::Debug for AuditService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditService").finish()
    }
}
