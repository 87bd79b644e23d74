//! Location repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use gangazon_core::error::{AppError, ErrorKind};
use gangazon_core::result::AppResult;
use gangazon_core::types::pagination::{PageRequest, PageResponse};
use gangazon_entity::location::Location;

/// Repository for location rows.
#[derive(Debug, Clone)]
pub struct LocationRepository {
    pool: PgPool,
}

impl LocationRepository {
    /// Create a new location repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a location by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Location>> {
        sqlx::query_as::<_, Location>("SELECT * FROM locations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find location by id", e)
            })
    }

    /// List locations restricted to the given ids, paginated.
    pub async fn find_by_ids(
        &self,
        ids: &[Uuid],
        page: &PageRequest,
    ) -> AppResult<PageResponse<Location>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM locations WHERE id = ANY($1) AND is_active = TRUE",
        )
        .bind(ids)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count locations", e))?;

        let locations = sqlx::query_as::<_, Location>(
            "SELECT * FROM locations WHERE id = ANY($1) AND is_active = TRUE \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(ids)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list locations", e))?;

        Ok(PageResponse::new(
            locations,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// List all active locations, paginated.
    pub async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<Location>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM locations WHERE is_active = TRUE")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count locations", e)
                })?;

        let locations = sqlx::query_as::<_, Location>(
            "SELECT * FROM locations WHERE is_active = TRUE \
             ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list locations", e))?;

        Ok(PageResponse::new(
            locations,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Create a new location.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        franchise_id: Uuid,
        name: &str,
        address: Option<&str>,
        latitude: Option<f64>,
        longitude: Option<f64>,
        max_employees: i32,
    ) -> AppResult<Location> {
        sqlx::query_as::<_, Location>(
            "INSERT INTO locations (franchise_id, name, address, latitude, longitude, max_employees) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(franchise_id)
        .bind(name)
        .bind(address)
        .bind(latitude)
        .bind(longitude)
        .bind(max_employees)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            super::conflict_or_database(
                e,
                &format!("Location '{name}' already exists in this franchise"),
                "Failed to create location",
            )
        })
    }

    /// Update a location's mutable fields.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        address: Option<&str>,
        latitude: Option<f64>,
        longitude: Option<f64>,
        max_employees: Option<i32>,
    ) -> AppResult<Location> {
        sqlx::query_as::<_, Location>(
            "UPDATE locations SET name = COALESCE($2, name), \
                                  address = COALESCE($3, address), \
                                  latitude = COALESCE($4, latitude), \
                                  longitude = COALESCE($5, longitude), \
                                  max_employees = COALESCE($6, max_employees), \
                                  updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(name)
        .bind(address)
        .bind(latitude)
        .bind(longitude)
        .bind(max_employees)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update location", e))?
        .ok_or_else(|| AppError::not_found(format!("Location {id} not found")))
    }

    /// Soft-delete a location.
    pub async fn deactivate(&self, id: Uuid) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE locations SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to deactivate location", e)
                })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Location {id} not found")));
        }
        Ok(())
    }

    /// Count users holding active assignments at a location.
    pub async fn count_active_assignments(&self, location_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM employee_assignments \
             WHERE location_id = $1 AND is_active = TRUE",
        )
        .bind(location_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count assignments", e)
        })
    }
}
