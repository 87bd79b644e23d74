//! Employee assignment repository implementation.
//!
//! Overlap of active assignments for the same user and location is
//! closed by an exclusion constraint on the date range, so a lost race
//! surfaces as a conflict here rather than a second active row.

use sqlx::PgPool;
use uuid::Uuid;

use gangazon_core::error::{AppError, ErrorKind};
use gangazon_core::result::AppResult;
use gangazon_entity::assignment::{CreateAssignment, EmployeeAssignment};

/// Repository for employee assignment rows.
#[derive(Debug, Clone)]
pub struct AssignmentRepository {
    pool: PgPool,
}

impl AssignmentRepository {
    /// Create a new assignment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an assignment by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<EmployeeAssignment>> {
        sqlx::query_as::<_, EmployeeAssignment>(
            "SELECT * FROM employee_assignments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find assignment by id", e)
        })
    }

    /// List a user's assignments, active first, newest first.
    pub async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<EmployeeAssignment>> {
        sqlx::query_as::<_, EmployeeAssignment>(
            "SELECT * FROM employee_assignments WHERE user_id = $1 \
             ORDER BY is_active DESC, created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list assignments by user", e)
        })
    }

    /// List active assignments at a location.
    pub async fn find_active_by_location(
        &self,
        location_id: Uuid,
    ) -> AppResult<Vec<EmployeeAssignment>> {
        sqlx::query_as::<_, EmployeeAssignment>(
            "SELECT * FROM employee_assignments \
             WHERE location_id = $1 AND is_active = TRUE \
             ORDER BY created_at DESC",
        )
        .bind(location_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                "Failed to list assignments by location",
                e,
            )
        })
    }

    /// The user's active assignment at a location, if any.
    pub async fn find_active(
        &self,
        user_id: Uuid,
        location_id: Uuid,
    ) -> AppResult<Option<EmployeeAssignment>> {
        sqlx::query_as::<_, EmployeeAssignment>(
            "SELECT * FROM employee_assignments \
             WHERE user_id = $1 AND location_id = $2 AND is_active = TRUE",
        )
        .bind(user_id)
        .bind(location_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find active assignment", e)
        })
    }

    /// Create a new assignment.
    pub async fn create(&self, data: &CreateAssignment) -> AppResult<EmployeeAssignment> {
        sqlx::query_as::<_, EmployeeAssignment>(
            "INSERT INTO employee_assignments \
             (user_id, location_id, role_at_location, shift_type, start_date, end_date, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(data.user_id)
        .bind(data.location_id)
        .bind(data.role_at_location)
        .bind(data.shift_type)
        .bind(data.start_date)
        .bind(data.end_date)
        .bind(&data.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            super::conflict_or_database(
                e,
                "User already has an active assignment overlapping these dates at this location",
                "Failed to create assignment",
            )
        })
    }

    /// End an assignment: clears the active flag and stamps the end date.
    pub async fn end(&self, id: Uuid) -> AppResult<EmployeeAssignment> {
        sqlx::query_as::<_, EmployeeAssignment>(
            "UPDATE employee_assignments \
             SET is_active = FALSE, end_date = COALESCE(end_date, CURRENT_DATE) \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to end assignment", e))?
        .ok_or_else(|| AppError::not_found(format!("Assignment {id} not found")))
    }
}
