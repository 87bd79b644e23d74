//! Employee check-in repository implementation.
//!
//! The one-open-check-in-per-user invariant is closed by a partial
//! unique index on `(user_id) WHERE check_out_time IS NULL`, so a
//! concurrent double check-in loses the race as a conflict.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use gangazon_core::error::{AppError, ErrorKind};
use gangazon_core::result::AppResult;
use gangazon_core::types::pagination::{PageRequest, PageResponse};
use gangazon_entity::checkin::{CheckinMethod, EmployeeCheckin};

/// Repository for employee check-in rows.
#[derive(Debug, Clone)]
pub struct CheckinRepository {
    pool: PgPool,
}

impl CheckinRepository {
    /// Create a new check-in repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a check-in by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<EmployeeCheckin>> {
        sqlx::query_as::<_, EmployeeCheckin>("SELECT * FROM employee_checkins WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find check-in by id", e)
            })
    }

    /// The user's open check-in, if one exists.
    pub async fn find_open_for_user(&self, user_id: Uuid) -> AppResult<Option<EmployeeCheckin>> {
        sqlx::query_as::<_, EmployeeCheckin>(
            "SELECT * FROM employee_checkins \
             WHERE user_id = $1 AND check_out_time IS NULL \
             ORDER BY check_in_time DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find open check-in", e)
        })
    }

    /// List a user's check-ins, newest first, paginated.
    pub async fn find_by_user(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<EmployeeCheckin>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM employee_checkins WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count check-ins", e)
                })?;

        let checkins = sqlx::query_as::<_, EmployeeCheckin>(
            "SELECT * FROM employee_checkins WHERE user_id = $1 \
             ORDER BY check_in_time DESC LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list check-ins", e))?;

        Ok(PageResponse::new(
            checkins,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// List check-ins at the given locations, newest first, paginated.
    pub async fn find_by_locations(
        &self,
        location_ids: &[Uuid],
        page: &PageRequest,
    ) -> AppResult<PageResponse<EmployeeCheckin>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM employee_checkins WHERE location_id = ANY($1)",
        )
        .bind(location_ids)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count check-ins", e))?;

        let checkins = sqlx::query_as::<_, EmployeeCheckin>(
            "SELECT * FROM employee_checkins WHERE location_id = ANY($1) \
             ORDER BY check_in_time DESC LIMIT $2 OFFSET $3",
        )
        .bind(location_ids)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list check-ins", e))?;

        Ok(PageResponse::new(
            checkins,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// List all check-ins, newest first, paginated.
    pub async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<EmployeeCheckin>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employee_checkins")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count check-ins", e)
            })?;

        let checkins = sqlx::query_as::<_, EmployeeCheckin>(
            "SELECT * FROM employee_checkins ORDER BY check_in_time DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list check-ins", e))?;

        Ok(PageResponse::new(
            checkins,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Open a new check-in.
    #[allow(clippy::too_many_arguments)]
    pub async fn open(
        &self,
        user_id: Uuid,
        location_id: Uuid,
        assignment_id: Option<Uuid>,
        method: CheckinMethod,
        latitude: Option<f64>,
        longitude: Option<f64>,
        notes: Option<&str>,
    ) -> AppResult<EmployeeCheckin> {
        sqlx::query_as::<_, EmployeeCheckin>(
            "INSERT INTO employee_checkins \
             (user_id, location_id, assignment_id, check_in_method, \
              check_in_latitude, check_in_longitude, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(user_id)
        .bind(location_id)
        .bind(assignment_id)
        .bind(method)
        .bind(latitude)
        .bind(longitude)
        .bind(notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            super::conflict_or_database(
                e,
                "User already has an open check-in",
                "Failed to open check-in",
            )
        })
    }

    /// Close an open check-in, stamping worked hours and break minutes.
    pub async fn close(
        &self,
        id: Uuid,
        check_out_time: DateTime<Utc>,
        hours_worked: f64,
        break_duration_minutes: Option<i32>,
        notes: Option<&str>,
    ) -> AppResult<EmployeeCheckin> {
        sqlx::query_as::<_, EmployeeCheckin>(
            "UPDATE employee_checkins \
             SET check_out_time = $2, hours_worked = $3, \
                 break_duration_minutes = COALESCE($4, break_duration_minutes), \
                 notes = COALESCE($5, notes) \
             WHERE id = $1 AND check_out_time IS NULL RETURNING *",
        )
        .bind(id)
        .bind(check_out_time)
        .bind(hours_worked)
        .bind(break_duration_minutes)
        .bind(notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to close check-in", e))?
        .ok_or_else(|| AppError::not_found(format!("Open check-in {id} not found")))
    }
}
