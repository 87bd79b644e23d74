//! Organization orchestration.
//!
//! Organizations sit above franchises in the hierarchy. Creating and
//! retiring them is platform-level work; administrators may read and
//! update their own.

use std::sync::Arc;

use serde_json::json;
use tracing::info;
use uuid::Uuid;

use gangazon_auth::Principal;
use gangazon_core::error::AppError;
use gangazon_core::result::AppResult;
use gangazon_core::traits::audit::{AuditEvent, AuditSink};
use gangazon_core::types::pagination::{PageRequest, PageResponse};
use gangazon_database::repositories::OrganizationRepository;
use gangazon_entity::organization::Organization;
use gangazon_entity::user::Role;

/// Data for creating an organization.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct CreateOrganizationRequest {
    pub name: String,
    pub description: Option<String>,
    pub industry: Option<String>,
}

/// Data for updating an organization.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct UpdateOrganizationRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub industry: Option<String>,
}

/// Organization management.
#[derive(Clone)]
pub struct OrganizationService {
    organizations: Arc<OrganizationRepository>,
    audit: Arc<dyn AuditSink>,
}

impl OrganizationService {
    /// Creates a new organization service.
    pub fn new(organizations: Arc<OrganizationRepository>, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            organizations,
            audit,
        }
    }

    /// Lists active organizations. Platform-level view.
    pub async fn list(
        &self,
        principal: &Principal,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Organization>> {
        require_super_admin(principal)?;
        self.organizations.find_all(page).await
    }

    /// Fetches an organization the caller belongs to or oversees.
    pub async fn get(&self, principal: &Principal, id: Uuid) -> AppResult<Organization> {
        require_member_or_super_admin(principal, id)?;
        self.organizations
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Organization not found"))
    }

    /// Creates a new organization. Platform-level operation.
    pub async fn create(
        &self,
        principal: &Principal,
        request: CreateOrganizationRequest,
    ) -> AppResult<Organization> {
        require_super_admin(principal)?;

        if request.name.trim().is_empty() {
            return Err(AppError::validation("Organization name must not be empty"));
        }

        let organization = self
            .organizations
            .create(
                &request.name,
                request.description.as_deref(),
                request.industry.as_deref(),
            )
            .await?;

        info!(organization_id = %organization.id, "organization created");
        self.audit
            .record(
                AuditEvent::new(Some(principal.user_id), "organization_created")
                    .with_details(json!({
                        "organization_id": organization.id,
                        "name": organization.name,
                    })),
            )
            .await?;

        Ok(organization)
    }

    /// Updates an organization's profile. Administrators may update
    /// their own organization.
    pub async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        request: UpdateOrganizationRequest,
    ) -> AppResult<Organization> {
        if !principal.is_super_admin()
            && !(principal.role == Role::Admin && principal.organization_id == Some(id))
        {
            return Err(AppError::authorization(
                "You may only update your own organization",
            ));
        }

        let organization = self
            .organizations
            .update(
                id,
                request.name.as_deref(),
                request.description.as_deref(),
                request.industry.as_deref(),
            )
            .await?;

        info!(organization_id = %id, "organization updated");
        self.audit
            .record(
                AuditEvent::new(Some(principal.user_id), "organization_updated")
                    .with_details(json!({ "organization_id": id })),
            )
            .await?;

        Ok(organization)
    }

    /// Retires an organization. Platform-level operation.
    pub async fn deactivate(&self, principal: &Principal, id: Uuid) -> AppResult<()> {
        require_super_admin(principal)?;

        self.organizations.deactivate(id).await?;

        info!(organization_id = %id, "organization deactivated");
        self.audit
            .record(
                AuditEvent::new(Some(principal.user_id), "organization_deactivated")
                    .with_details(json!({ "organization_id": id })),
            )
            .await?;

        Ok(())
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

fn require_member_or_super_admin(principal: &Principal, organization_id: Uuid) -> AppResult<()> {
    if principal.is_super_admin() || principal.organization_id == Some(organization_id) {
        return Ok(());
    }
    Err(AppError::authorization(
        "You do not belong to this organization",
    ))
}

impl std::fmt::Debug for OrganizationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrganizationService").finish()
    }
}
