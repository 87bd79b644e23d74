//! Assignment orchestration: placing employees at locations and ending
//! those placements.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use gangazon_auth::Principal;
use gangazon_auth::access::AccessControlEngine;
use gangazon_core::error::AppError;
use gangazon_core::result::AppResult;
use gangazon_core::traits::audit::{AuditEvent, AuditSink};
use gangazon_core::traits::identity::UserSnapshot;
use gangazon_database::repositories::{
    AssignmentRepository, LocationRepository, UserRepository,
};
use gangazon_entity::assignment::{
    CreateAssignment, EmployeeAssignment, LocationRole, ShiftType,
};
use gangazon_entity::user::User;

/// Data for creating an assignment.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct CreateAssignmentRequest {
    pub user_id: Uuid,
    pub location_id: Uuid,
    pub role_at_location: LocationRole,
    pub shift_type: Option<ShiftType>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Assignment management gated by the access engine.
#[derive(Clone)]
pub struct AssignmentService {
    assignments: Arc<AssignmentRepository>,
    locations: Arc<LocationRepository>,
    users: Arc<UserRepository>,
    engine: Arc<AccessControlEngine>,
    audit: Arc<dyn AuditSink>,
}

impl AssignmentService {
    /// Creates a new assignment service.
    pub fn new(
        assignments: Arc<AssignmentRepository>,
        locations: Arc<LocationRepository>,
        users: Arc<UserRepository>,
        engine: Arc<AccessControlEngine>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            assignments,
            locations,
            users,
            engine,
            audit,
        }
    }

    /// Places a user at a location.
    ///
    /// The caller needs modify rights at the location. The target user
    /// must hold an assignment-capable platform role, belong to the
    /// organization owning the location's franchise, and dates must
    /// form a valid window that overlaps no existing active assignment
    /// there. The location's `max_employees` bound is enforced, and the
    /// database backstops the overlap check with an exclusion
    /// constraint.
    pub async fn create(
        &self,
        principal: &Principal,
        request: CreateAssignmentRequest,
    ) -> AppResult<EmployeeAssignment> {
        self.engine
            .can_modify_location(principal, request.location_id)
            .await?
            .require()?;

        let target = self
            .users
            .find_by_id(request.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        if !target.role.is_assignment_holder() {
            return Err(AppError::validation(format!(
                "Users with role '{}' cannot hold location assignments",
                target.role
            )));
        }
        if !target.is_active {
            return Err(AppError::validation("User account is deactivated"));
        }

        // A user can only work under their own organization's
        // franchises, regardless of who the caller is.
        self.engine
            .can_assign_user(&snapshot_of(&target), request.location_id)
            .await?
            .require()?;

        if let Some(end_date) = request.end_date {
            if end_date < request.start_date {
                return Err(AppError::validation("end_date cannot precede start_date"));
            }
        }

        let existing = self.assignments.find_by_user(request.user_id).await?;
        let overlapping = existing.iter().any(|a| {
            a.location_id == request.location_id
                && a.is_active
                && a.overlaps(request.start_date, request.end_date)
        });
        if overlapping {
            return Err(AppError::conflict(
                "User already has an active assignment overlapping these dates at this location",
            ));
        }

        let location = self
            .locations
            .find_by_id(request.location_id)
            .await?
            .ok_or_else(|| AppError::not_found("Location not found"))?;
        let active = self
            .locations
            .count_active_assignments(request.location_id)
            .await?;
        if active >= location.max_employees as i64 {
            return Err(AppError::validation(format!(
                "Location has reached its limit of {} assigned employees",
                location.max_employees
            )));
        }

        let assignment = self
            .assignments
            .create(&CreateAssignment {
                user_id: request.user_id,
                location_id: request.location_id,
                role_at_location: request.role_at_location,
                shift_type: request.shift_type,
                start_date: request.start_date,
                end_date: request.end_date,
                notes: request.notes,
            })
            .await?;

        self.audit
            .record(
                AuditEvent::new(Some(principal.user_id), "assignment_created").with_details(
                    json!({
                        "assignment_id": assignment.id,
                        "user_id": assignment.user_id,
                        "location_id": assignment.location_id,
                        "role_at_location": assignment.role_at_location,
                    }),
                ),
            )
            .await?;

        info!(assignment_id = %assignment.id, "Assignment created");
        Ok(assignment)
    }

    /// Ends an assignment, clearing its active flag.
    pub async fn end(&self, principal: &Principal, id: Uuid) -> AppResult<EmployeeAssignment> {
        let assignment = self
            .assignments
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Assignment not found"))?;

        self.engine
            .can_modify_location(principal, assignment.location_id)
            .await?
            .require()?;

        let ended = self.assignments.end(id).await?;

        self.audit
            .record(
                AuditEvent::new(Some(principal.user_id), "assignment_ended")
                    .with_details(json!({ "assignment_id": id })),
            )
            .await?;

        Ok(ended)
    }

    /// Lists a user's assignments: one's own, or at locations the
    /// caller can see.
    pub async fn list_for_user(
        &self,
        principal: &Principal,
        user_id: Uuid,
    ) -> AppResult<Vec<EmployeeAssignment>> {
        if principal.user_id != user_id
            && !principal.is_super_admin()
            && !principal.role.is_organization_scoped()
        {
            return Err(AppError::authorization(
                "Your role does not grant permission to view other users' assignments",
            ));
        }
        self.assignments.find_by_user(user_id).await
    }

    /// Lists active assignments at a location the caller can see.
    pub async fn list_for_location(
        &self,
        principal: &Principal,
        location_id: Uuid,
    ) -> AppResult<Vec<EmployeeAssignment>> {
        let decision = self
            .engine
            .can_access_location(principal, location_id)
            .await?;
        if !decision.is_allowed() {
            return Err(AppError::not_found("Location not found"));
        }
        self.assignments.find_active_by_location(location_id).await
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

impl std::fmt::Debug for AssignmentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssignmentService").finish()
    }
}
