//! The check-in state machine.
//!
//! A user has at most one open check-in at a time. Opening requires an
//! active assignment at the location; closing stamps the worked hours.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use gangazon_auth::Principal;
use gangazon_auth::access::AccessControlEngine;
use gangazon_auth::access::proximity::{Coordinates, ProximityGuard};
use gangazon_core::error::AppError;
use gangazon_core::result::AppResult;
use gangazon_core::traits::audit::{AuditEvent, AuditSink};
use gangazon_core::types::pagination::{PageRequest, PageResponse};
use gangazon_database::repositories::{AssignmentRepository, CheckinRepository};
use gangazon_entity::checkin::{CheckinMethod, EmployeeCheckin, hours_worked};

use crate::scope::{ListScope, resolve_list_scope};

/// Data for opening a check-in.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct CheckinRequest {
    pub location_id: Uuid,
    pub method: CheckinMethod,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub notes: Option<String>,
}

/// Data for closing a check-in.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct CheckoutRequest {
    /// A specific check-in to close; defaults to the caller's open one.
    pub checkin_id: Option<Uuid>,
    pub break_duration_minutes: Option<i32>,
    pub notes: Option<String>,
}

/// Check-in lifecycle, gated by assignments and GPS proximity.
#[derive(Clone)]
pub struct CheckinService {
    checkins: Arc<CheckinRepository>,
    assignments: Arc<AssignmentRepository>,
    engine: Arc<AccessControlEngine>,
    proximity: Arc<ProximityGuard>,
    audit: Arc<dyn AuditSink>,
}

impl CheckinService {
    /// Creates a new check-in service.
    pub fn new(
        checkins: Arc<CheckinRepository>,
        assignments: Arc<AssignmentRepository>,
        engine: Arc<AccessControlEngine>,
        proximity: Arc<ProximityGuard>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            checkins,
            assignments,
            engine,
            proximity,
            audit,
        }
    }

    /// Opens a check-in at a location.
    ///
    /// The caller must hold an active assignment there. A GPS check-in
    /// requires coordinates; whenever coordinates are supplied, the
    /// reported position is validated against the location's stored
    /// coordinates. A second open check-in is a conflict, which the
    /// partial unique index also enforces under concurrency.
    pub async fn check_in(
        &self,
        principal: &Principal,
        request: CheckinRequest,
    ) -> AppResult<EmployeeCheckin> {
        let assignment = self
            .assignments
            .find_active(principal.user_id, request.location_id)
            .await?
            .ok_or_else(|| {
                AppError::authorization("You are not assigned to this location")
            })?;

        if let Some(open) = self.checkins.find_open_for_user(principal.user_id).await? {
            return Err(AppError::conflict(format!(
                "You already have an open check-in since {}",
                open.check_in_time
            )));
        }

        let coordinates = match (request.latitude, request.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            (None, None) => None,
            _ => {
                return Err(AppError::validation(
                    "Both latitude and longitude are required",
                ));
            }
        };

        if request.method == CheckinMethod::Gps && coordinates.is_none() {
            return Err(AppError::validation(
                "GPS check-in requires coordinates",
            ));
        }

        let mut distance_meters = None;
        if let Some(coordinates) = coordinates {
            let check = self
                .proximity
                .validate_proximity(coordinates, request.location_id, None)
                .await?;
            if !check.valid {
                return Err(AppError::validation(format!(
                    "Too far from the location ({} m)",
                    check.distance_meters.unwrap_or_default()
                )));
            }
            distance_meters = check.distance_meters;
        }

        let checkin = self
            .checkins
            .open(
                principal.user_id,
                request.location_id,
                Some(assignment.id),
                request.method,
                request.latitude,
                request.longitude,
                request.notes.as_deref(),
            )
            .await?;

        self.audit
            .record(
                AuditEvent::new(Some(principal.user_id), "checkin_opened").with_details(json!({
                    "checkin_id": checkin.id,
                    "location_id": checkin.location_id,
                    "method": checkin.check_in_method,
                    "distance_meters": distance_meters,
                })),
            )
            .await?;

        info!(checkin_id = %checkin.id, "Check-in opened");
        Ok(checkin)
    }

    /// Closes the caller's open check-in and stamps worked hours,
    /// rounded to two decimals.
    pub async fn check_out(
        &self,
        principal: &Principal,
        request: CheckoutRequest,
    ) -> AppResult<EmployeeCheckin> {
        let open = match request.checkin_id {
            Some(id) => self
                .checkins
                .find_by_id(id)
                .await?
                .filter(|c| c.user_id == principal.user_id && c.is_open())
                .ok_or_else(|| AppError::not_found("No open check-in with that id"))?,
            None => self
                .checkins
                .find_open_for_user(principal.user_id)
                .await?
                .ok_or_else(|| AppError::not_found("No open check-in to close"))?,
        };

        if let Some(minutes) = request.break_duration_minutes {
            if minutes < 0 {
                return Err(AppError::validation("Break duration cannot be negative"));
            }
        }

        let check_out_time = Utc::now();
        let hours = hours_worked(open.check_in_time, check_out_time);

        let closed = self
            .checkins
            .close(
                open.id,
                check_out_time,
                hours,
                request.break_duration_minutes,
                request.notes.as_deref(),
            )
            .await?;

        self.audit
            .record(
                AuditEvent::new(Some(principal.user_id), "checkin_closed").with_details(json!({
                    "checkin_id": closed.id,
                    "hours_worked": closed.hours_worked,
                })),
            )
            .await?;

        info!(checkin_id = %closed.id, hours, "Check-in closed");
        Ok(closed)
    }

    /// The caller's open check-in, if any.
    pub async fn current(&self, principal: &Principal) -> AppResult<Option<EmployeeCheckin>> {
        self.checkins.find_open_for_user(principal.user_id).await
    }

    /// Lists the caller's own check-in history, newest first.
    pub async fn history(
        &self,
        principal: &Principal,
        page: &PageRequest,
    ) -> AppResult<PageResponse<EmployeeCheckin>> {
        self.checkins.find_by_user(principal.user_id, page).await
    }

    /// Lists check-ins across the locations the caller can see.
    pub async fn list_for_locations(
        &self,
        principal: &Principal,
        requested_ids: Option<&[Uuid]>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<EmployeeCheckin>> {
        let scope = self.engine.location_scope(principal).await?;
        match resolve_list_scope(&scope, requested_ids) {
            ListScope::All => self.checkins.find_all(page).await,
            ListScope::Ids(ids) => self.checkins.find_by_locations(&ids, page).await,
            ListScope::Empty => Ok(PageResponse::empty(page)),
        }
    }
}

impl std::fmt::Debug for CheckinService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckinService").finish()
    }
}
