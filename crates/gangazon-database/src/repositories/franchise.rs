//! Franchise repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use gangazon_core::error::{AppError, ErrorKind};
use gangazon_core::result::AppResult;
use gangazon_core::types::pagination::{PageRequest, PageResponse};
use gangazon_entity::franchise::{Franchise, FranchiseStatus};

/// Repository for franchise rows.
#[derive(Debug, Clone)]
pub struct FranchiseRepository {
    pool: PgPool,
}

impl FranchiseRepository {
    /// Create a new franchise repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a franchise by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Franchise>> {
        sqlx::query_as::<_, Franchise>("SELECT * FROM franchises WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find franchise by id", e)
            })
    }

    /// Find a franchise by its unique code.
    pub async fn find_by_code(&self, code: &str) -> AppResult<Option<Franchise>> {
        sqlx::query_as::<_, Franchise>("SELECT * FROM franchises WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find franchise by code", e)
            })
    }

    /// List franchises restricted to the given ids, paginated.
    pub async fn find_by_ids(
        &self,
        ids: &[Uuid],
        page: &PageRequest,
    ) -> AppResult<PageResponse<Franchise>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM franchises WHERE id = ANY($1) AND is_active = TRUE",
        )
        .bind(ids)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count franchises", e))?;

        let franchises = sqlx::query_as::<_, Franchise>(
            "SELECT * FROM franchises WHERE id = ANY($1) AND is_active = TRUE \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(ids)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list franchises", e))?;

        Ok(PageResponse::new(
            franchises,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// List all active franchises, paginated.
    pub async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<Franchise>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM franchises WHERE is_active = TRUE")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count franchises", e)
                })?;

        let franchises = sqlx::query_as::<_, Franchise>(
            "SELECT * FROM franchises WHERE is_active = TRUE \
             ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list franchises", e))?;

        Ok(PageResponse::new(
            franchises,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Count active locations under a franchise.
    pub async fn count_active_locations(&self, franchise_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM locations WHERE franchise_id = $1 AND is_active = TRUE",
        )
        .bind(franchise_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count locations", e))
    }

    /// Create a new franchise.
    pub async fn create(
        &self,
        organization_id: Uuid,
        code: &str,
        name: &str,
        max_locations: i32,
    ) -> AppResult<Franchise> {
        sqlx::query_as::<_, Franchise>(
            "INSERT INTO franchises (organization_id, code, name, max_locations) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(organization_id)
        .bind(code)
        .bind(name)
        .bind(max_locations)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            super::conflict_or_database(
                e,
                &format!("Franchise code '{code}' already exists"),
                "Failed to create franchise",
            )
        })
    }

    /// Update a franchise's mutable fields.
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        status: Option<FranchiseStatus>,
        max_locations: Option<i32>,
    ) -> AppResult<Franchise> {
        sqlx::query_as::<_, Franchise>(
            "UPDATE franchises SET name = COALESCE($2, name), \
                                   status = COALESCE($3, status), \
                                   max_locations = COALESCE($4, max_locations), \
                                   updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(name)
        .bind(status)
        .bind(max_locations)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update franchise", e))?
        .ok_or_else(|| AppError::not_found(format!("Franchise {id} not found")))
    }

    /// Soft-delete a franchise.
    pub async fn deactivate(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE franchises SET is_active = FALSE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to deactivate franchise", e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Franchise {id} not found")));
        }
        Ok(())
    }
}
