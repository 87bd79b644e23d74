//! Organization repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use gangazon_core::error::{AppError, ErrorKind};
use gangazon_core::result::AppResult;
use gangazon_core::types::pagination::{PageRequest, PageResponse};
use gangazon_entity::organization::Organization;

/// Repository for organization rows.
#[derive(Debug, Clone)]
pub struct OrganizationRepository {
    pool: PgPool,
}

impl OrganizationRepository {
    /// Create a new organization repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an organization by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Organization>> {
        sqlx::query_as::<_, Organization>("SELECT * FROM organizations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find organization by id", e)
            })
    }

    /// List active organizations with pagination.
    pub async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<Organization>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM organizations WHERE is_active = TRUE")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count organizations", e)
                })?;

        let organizations = sqlx::query_as::<_, Organization>(
            "SELECT * FROM organizations WHERE is_active = TRUE \
             ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list organizations", e)
        })?;

        Ok(PageResponse::new(
            organizations,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Create a new organization.
    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        industry: Option<&str>,
    ) -> AppResult<Organization> {
        sqlx::query_as::<_, Organization>(
            "INSERT INTO organizations (name, description, industry) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(name)
        .bind(description)
        .bind(industry)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            super::conflict_or_database(
                e,
                &format!("Organization '{name}' already exists"),
                "Failed to create organization",
            )
        })
    }

    /// Update an organization's profile fields.
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
        industry: Option<&str>,
    ) -> AppResult<Organization> {
        sqlx::query_as::<_, Organization>(
            "UPDATE organizations SET name = COALESCE($2, name), \
                                      description = COALESCE($3, description), \
                                      industry = COALESCE($4, industry) \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(industry)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update organization", e)
        })?
        .ok_or_else(|| AppError::not_found(format!("Organization {id} not found")))
    }

    /// Soft-delete an organization.
    pub async fn deactivate(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("UPDATE organizations SET is_active = FALSE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to deactivate organization", e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Organization {id} not found")));
        }
        Ok(())
    }
}
