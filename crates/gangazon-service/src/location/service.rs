//! Location CRUD orchestration behind the access engine.

use std::sync::Arc;

use serde_json::json;
use tracing::info;
use uuid::Uuid;

use gangazon_auth::Principal;
use gangazon_auth::access::AccessControlEngine;
use gangazon_core::error::AppError;
use gangazon_core::result::AppResult;
use gangazon_core::traits::audit::{AuditEvent, AuditSink};
use gangazon_core::types::pagination::{PageRequest, PageResponse};
use gangazon_database::repositories::{FranchiseRepository, LocationRepository};
use gangazon_entity::location::Location;
use gangazon_entity::user::Role;

use crate::scope::{ListScope, resolve_list_scope};

/// Data for creating a location.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct CreateLocationRequest {
    pub franchise_id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub max_employees: i32,
}

/// Data for updating a location.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct UpdateLocationRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub max_employees: Option<i32>,
}

/// Location management gated by the access engine.
#[derive(Clone)]
pub struct LocationService {
    locations: Arc<LocationRepository>,
    franchises: Arc<FranchiseRepository>,
    engine: Arc<AccessControlEngine>,
    audit: Arc<dyn AuditSink>,
}

impl LocationService {
    /// Creates a new location service.
    pub fn new(
        locations: Arc<LocationRepository>,
        franchises: Arc<FranchiseRepository>,
        engine: Arc<AccessControlEngine>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            locations,
            franchises,
            engine,
            audit,
        }
    }

    /// Lists the locations visible to the caller, optionally filtered.
    pub async fn list(
        &self,
        principal: &Principal,
        requested_ids: Option<&[Uuid]>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Location>> {
        let scope = self.engine.location_scope(principal).await?;
        match resolve_list_scope(&scope, requested_ids) {
            ListScope::All => self.locations.find_all(page).await,
            ListScope::Ids(ids) => self.locations.find_by_ids(&ids, page).await,
            ListScope::Empty => Ok(PageResponse::empty(page)),
        }
    }

    /// Fetches a location the caller may see. A denial is reported as
    /// not-found.
    pub async fn get(&self, principal: &Principal, id: Uuid) -> AppResult<Location> {
        let decision = self.engine.can_access_location(principal, id).await?;
        if !decision.is_allowed() {
            return Err(AppError::not_found("Location not found"));
        }
        self.locations
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Location not found"))
    }

    /// Creates a location under a franchise the caller controls,
    /// enforcing the franchise's `max_locations` bound.
    pub async fn create(
        &self,
        principal: &Principal,
        request: CreateLocationRequest,
    ) -> AppResult<Location> {
        if !principal.is_super_admin() && !principal.role.is_organization_scoped() {
            return Err(AppError::authorization(
                "Your role does not grant permission to create locations",
            ));
        }
        self.engine
            .can_access_franchise(principal, request.franchise_id)
            .await?
            .require()?;

        let franchise = self
            .franchises
            .find_by_id(request.franchise_id)
            .await?
            .ok_or_else(|| AppError::not_found("Franchise not found"))?;

        let current = self
            .franchises
            .count_active_locations(request.franchise_id)
            .await?;
        if current >= franchise.max_locations as i64 {
            return Err(AppError::validation(format!(
                "Franchise has reached its limit of {} locations",
                franchise.max_locations
            )));
        }

        if request.max_employees < 1 {
            return Err(AppError::validation("max_employees must be at least 1"));
        }

        let location = self
            .locations
            .create(
                request.franchise_id,
                request.name.trim(),
                request.address.as_deref(),
                request.latitude,
                request.longitude,
                request.max_employees,
            )
            .await?;

        self.audit
            .record(
                AuditEvent::new(Some(principal.user_id), "location_created").with_details(json!({
                    "location_id": location.id,
                    "franchise_id": location.franchise_id,
                })),
            )
            .await?;

        info!(location_id = %location.id, "Location created");
        Ok(location)
    }

    /// Updates a location the caller may modify. Managers may update
    /// locations they hold an active manager assignment at.
    pub async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        request: UpdateLocationRequest,
    ) -> AppResult<Location> {
        self.engine
            .can_modify_location(principal, id)
            .await?
            .require()?;

        if let Some(max_employees) = request.max_employees {
            if max_employees < 1 {
                return Err(AppError::validation("max_employees must be at least 1"));
            }
        }

        let updated = self
            .locations
            .update(
                id,
                request.name.as_deref(),
                request.address.as_deref(),
                request.latitude,
                request.longitude,
                request.max_employees,
            )
            .await?;

        self.audit
            .record(
                AuditEvent::new(Some(principal.user_id), "location_updated")
                    .with_details(json!({ "location_id": id })),
            )
            .await?;

        Ok(updated)
    }

    /// Soft-deletes a location. Restricted to organization-scoped
    /// roles; managers may not delete the locations they run.
    pub async fn delete(&self, principal: &Principal, id: Uuid) -> AppResult<()> {
        if !principal.is_super_admin() && principal.role == Role::Manager {
            return Err(AppError::authorization(
                "Your role does not grant permission to delete locations",
            ));
        }
        self.engine
            .can_modify_location(principal, id)
            .await?
            .require()?;

        self.locations.deactivate(id).await?;

        self.audit
            .record(
                AuditEvent::new(Some(principal.user_id), "location_deleted")
                    .with_details(json!({ "location_id": id })),
            )
            .await?;

        info!(location_id = %id, "Location deactivated");
        Ok(())
    }
}

impl std::fmt::Debug for LocationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationService").finish()
    }
}
