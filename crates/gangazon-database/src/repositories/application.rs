//! Application repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use gangazon_core::error::{AppError, ErrorKind};
use gangazon_core::result::AppResult;
use gangazon_entity::application::Application;

/// Repository for registered client application rows.
#[derive(Debug, Clone)]
pub struct ApplicationRepository {
    pool: PgPool,
}

impl ApplicationRepository {
    /// Create a new application repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an application by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Application>> {
        sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find application by id", e)
            })
    }

    /// Find an application by its unique code.
    pub async fn find_by_code(&self, code: &str) -> AppResult<Option<Application>> {
        sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find application by code", e)
            })
    }

    /// Find an application by its API key.
    pub async fn find_by_api_key(&self, api_key: &str) -> AppResult<Option<Application>> {
        sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE api_key = $1")
            .bind(api_key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    "Failed to find application by API key",
                    e,
                )
            })
    }

    /// List all active applications.
    pub async fn find_all_active(&self) -> AppResult<Vec<Application>> {
        sqlx::query_as::<_, Application>(
            "SELECT * FROM applications WHERE is_active = TRUE ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list applications", e))
    }

    /// Register a new application.
    pub async fn create(
        &self,
        code: &str,
        name: &str,
        description: Option<&str>,
        api_key: &str,
        redirect_url: Option<&str>,
    ) -> AppResult<Application> {
        sqlx::query_as::<_, Application>(
            "INSERT INTO applications (code, name, description, api_key, redirect_url) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(code)
        .bind(name)
        .bind(description)
        .bind(api_key)
        .bind(redirect_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            super::conflict_or_database(
                e,
                &format!("Application code '{code}' already exists"),
                "Failed to create application",
            )
        })
    }

    /// Update an application's mutable fields.
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
        redirect_url: Option<&str>,
    ) -> AppResult<Application> {
        sqlx::query_as::<_, Application>(
            "UPDATE applications SET name = COALESCE($2, name), \
                                     description = COALESCE($3, description), \
                                     redirect_url = COALESCE($4, redirect_url), \
                                     updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(redirect_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update application", e)
        })?
        .ok_or_else(|| AppError::not_found(format!("Application {id} not found")))
    }

    /// Replace an application's API key.
    pub async fn rotate_api_key(&self, id: Uuid, api_key: &str) -> AppResult<Application> {
        sqlx::query_as::<_, Application>(
            "UPDATE applications SET api_key = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(api_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to rotate API key", e))?
        .ok_or_else(|| AppError::not_found(format!("Application {id} not found")))
    }

    /// Soft-delete an application.
    pub async fn deactivate(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE applications SET is_active = FALSE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to deactivate application", e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Application {id} not found")));
        }
        Ok(())
    }
}
