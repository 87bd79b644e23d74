//! Permission and grant repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use gangazon_core::error::{AppError, ErrorKind};
use gangazon_core::result::AppResult;
use gangazon_entity::permission::{Permission, PermissionGrant};

/// Repository for permission definitions and per-user grants.
#[derive(Debug, Clone)]
pub struct PermissionRepository {
    pool: PgPool,
}

impl PermissionRepository {
    /// Create a new permission repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a permission by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Permission>> {
        sqlx::query_as::<_, Permission>("SELECT * FROM permissions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find permission by id", e)
            })
    }

    /// Find a permission by application and code.
    pub async fn find_by_code(
        &self,
        application_id: Uuid,
        code: &str,
    ) -> AppResult<Option<Permission>> {
        sqlx::query_as::<_, Permission>(
            "SELECT * FROM permissions WHERE application_id = $1 AND code = $2",
        )
        .bind(application_id)
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find permission by code", e)
        })
    }

    /// List the active permissions defined for an application.
    pub async fn find_by_application(&self, application_id: Uuid) -> AppResult<Vec<Permission>> {
        sqlx::query_as::<_, Permission>(
            "SELECT * FROM permissions \
             WHERE application_id = $1 AND is_active = TRUE \
             ORDER BY category NULLS LAST, code ASC",
        )
        .bind(application_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list permissions", e))
    }

    /// Define a new permission under an application.
    pub async fn create(
        &self,
        application_id: Uuid,
        code: &str,
        display_name: &str,
        description: Option<&str>,
        category: Option<&str>,
    ) -> AppResult<Permission> {
        sqlx::query_as::<_, Permission>(
            "INSERT INTO permissions (application_id, code, display_name, description, category) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(application_id)
        .bind(code)
        .bind(display_name)
        .bind(description)
        .bind(category)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            super::conflict_or_database(
                e,
                &format!("Permission '{code}' already exists for this application"),
                "Failed to create permission",
            )
        })
    }

    /// Grant a permission to a user. Granting twice is a conflict.
    pub async fn grant(
        &self,
        user_id: Uuid,
        permission_id: Uuid,
        granted_by: Option<Uuid>,
    ) -> AppResult<PermissionGrant> {
        sqlx::query_as::<_, PermissionGrant>(
            "INSERT INTO user_permissions (user_id, permission_id, granted_by) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(user_id)
        .bind(permission_id)
        .bind(granted_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            super::conflict_or_database(
                e,
                "Permission is already granted to this user",
                "Failed to grant permission",
            )
        })
    }

    /// Revoke a granted permission. Returns `true` if a grant existed.
    pub async fn revoke(&self, user_id: Uuid, permission_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM user_permissions WHERE user_id = $1 AND permission_id = $2",
        )
        .bind(user_id)
        .bind(permission_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to revoke permission", e))?;

        Ok(result.rows_affected() > 0)
    }

    /// List a user's grants.
    pub async fn grants_for_user(&self, user_id: Uuid) -> AppResult<Vec<PermissionGrant>> {
        sqlx::query_as::<_, PermissionGrant>(
            "SELECT * FROM user_permissions WHERE user_id = $1 ORDER BY granted_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list grants", e))
    }

    /// Soft-delete a permission definition.
    pub async fn deactivate(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE permissions SET is_active = FALSE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to deactivate permission", e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Permission {id} not found")));
        }
        Ok(())
    }
}
