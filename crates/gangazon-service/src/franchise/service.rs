//! Franchise CRUD orchestration behind the access engine.

use std::sync::Arc;

use serde_json::json;
use tracing::info;
use uuid::Uuid;

use gangazon_auth::access::{AccessControlEngine, protected};
use gangazon_auth::Principal;
use gangazon_core::error::AppError;
use gangazon_core::result::AppResult;
use gangazon_core::traits::audit::{AuditEvent, AuditSink};
use gangazon_core::types::pagination::{PageRequest, PageResponse};
use gangazon_database::repositories::FranchiseRepository;
use gangazon_entity::franchise::{Franchise, FranchiseStatus};
use gangazon_entity::user::Role;

use crate::scope::{ListScope, resolve_list_scope};

/// Data for creating a franchise.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct CreateFranchiseRequest {
    pub organization_id: Uuid,
    pub code: String,
    pub name: String,
    pub max_locations: i32,
}

/// Data for updating a franchise.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct UpdateFranchiseRequest {
    pub name: Option<String>,
    pub status: Option<FranchiseStatus>,
    pub max_locations: Option<i32>,
}

/// Franchise management gated by the access engine.
#[derive(Clone)]
pub struct FranchiseService {
    franchises: Arc<FranchiseRepository>,
    engine: Arc<AccessControlEngine>,
    audit: Arc<dyn AuditSink>,
}

impl FranchiseService {
    /// Creates a new franchise service.
    pub fn new(
        franchises: Arc<FranchiseRepository>,
        engine: Arc<AccessControlEngine>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            franchises,
            engine,
            audit,
        }
    }

    /// Lists the franchises visible to the caller, optionally filtered.
    pub async fn list(
        &self,
        principal: &Principal,
        requested_ids: Option<&[Uuid]>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Franchise>> {
        let scope = self.engine.franchise_scope(principal).await?;
        match resolve_list_scope(&scope, requested_ids) {
            ListScope::All => self.franchises.find_all(page).await,
            ListScope::Ids(ids) => self.franchises.find_by_ids(&ids, page).await,
            ListScope::Empty => Ok(PageResponse::empty(page)),
        }
    }

    /// Fetches a franchise the caller may see.
    ///
    /// A denial is reported as not-found so the existence of foreign
    /// franchises cannot be probed.
    pub async fn get(&self, principal: &Principal, id: Uuid) -> AppResult<Franchise> {
        let decision = self.engine.can_access_franchise(principal, id).await?;
        if !decision.is_allowed() {
            return Err(AppError::not_found("Franchise not found"));
        }
        self.franchises
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Franchise not found"))
    }

    /// Creates a franchise. Admin-level, within the caller's own
    /// organization.
    pub async fn create(
        &self,
        principal: &Principal,
        request: CreateFranchiseRequest,
    ) -> AppResult<Franchise> {
        self.require_admin_over(principal, request.organization_id)?;

        if request.code.trim().is_empty() {
            return Err(AppError::validation("Franchise code cannot be empty"));
        }
        if request.max_locations < 1 {
            return Err(AppError::validation("max_locations must be at least 1"));
        }

        let franchise = self
            .franchises
            .create(
                request.organization_id,
                request.code.trim(),
                request.name.trim(),
                request.max_locations,
            )
            .await?;

        self.audit
            .record(
                AuditEvent::new(Some(principal.user_id), "franchise_created")
                    .with_details(json!({ "franchise_id": franchise.id, "code": franchise.code })),
            )
            .await?;

        info!(franchise_id = %franchise.id, code = %franchise.code, "Franchise created");
        Ok(franchise)
    }

    /// Updates a franchise the caller controls. The head-office
    /// franchise rejects all mutation.
    pub async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        request: UpdateFranchiseRequest,
    ) -> AppResult<Franchise> {
        let existing = self.get(principal, id).await?;
        self.require_admin_over(principal, existing.organization_id)?;
        protected::ensure_franchise_mutable(&existing)?;

        let updated = self
            .franchises
            .update(
                id,
                request.name.as_deref(),
                request.status,
                request.max_locations,
            )
            .await?;

        self.audit
            .record(
                AuditEvent::new(Some(principal.user_id), "franchise_updated")
                    .with_details(json!({ "franchise_id": id })),
            )
            .await?;

        Ok(updated)
    }

    /// Soft-deletes a franchise. The head-office franchise rejects all
    /// mutation.
    pub async fn delete(&self, principal: &Principal, id: Uuid) -> AppResult<()> {
        let existing = self.get(principal, id).await?;
        self.require_admin_over(principal, existing.organization_id)?;
        protected::ensure_franchise_mutable(&existing)?;

        self.franchises.deactivate(id).await?;

        self.audit
            .record(
                AuditEvent::new(Some(principal.user_id), "franchise_deleted")
                    .with_details(json!({ "franchise_id": id })),
            )
            .await?;

        info!(franchise_id = %id, "Franchise deactivated");
        Ok(())
    }

    /// Admin-level mutation gate: super_admin anywhere, admins within
    /// their own organization.
    fn require_admin_over(&self, principal: &Principal, organization_id: Uuid) -> AppResult<()> {
        if principal.is_super_admin() {
            return Ok(());
        }
        if principal.role != Role::Admin {
            return Err(AppError::authorization(
                "Your role does not grant permission to manage franchises",
            ));
        }
        if principal.organization_id != Some(organization_id) {
            return Err(AppError::authorization(
                "Franchise does not belong to your organization",
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for FranchiseService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FranchiseService").finish()
    }
}
