//! PostgreSQL-backed hierarchy queries for the access-control engine.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use gangazon_core::error::{AppError, ErrorKind};
use gangazon_core::result::AppResult;
use gangazon_core::traits::hierarchy::{HierarchyStore, StoredPosition};

/// Scoping and membership queries over organizations, franchises,
/// locations, and assignments.
#[derive(Debug, Clone)]
pub struct PgHierarchyStore {
    pool: PgPool,
}

impl PgHierarchyStore {
    /// Create a new hierarchy store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HierarchyStore for PgHierarchyStore {
    async fn franchise_organization(&self, franchise_id: Uuid) -> AppResult<Option<Uuid>> {
        sqlx::query_scalar("SELECT organization_id FROM franchises WHERE id = $1")
            .bind(franchise_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    "Failed to resolve franchise organization",
                    e,
                )
            })
    }

    async fn franchise_ids_by_organization(&self, organization_id: Uuid) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar(
            "SELECT id FROM franchises WHERE organization_id = $1 AND is_active = TRUE",
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                "Failed to list franchises by organization",
                e,
            )
        })
    }

    async fn location_franchise(&self, location_id: Uuid) -> AppResult<Option<Uuid>> {
        sqlx::query_scalar("SELECT franchise_id FROM locations WHERE id = $1")
            .bind(location_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    "Failed to resolve location franchise",
                    e,
                )
            })
    }

    async fn location_ids_by_franchises(&self, franchise_ids: &[Uuid]) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar(
            "SELECT id FROM locations WHERE franchise_id = ANY($1) AND is_active = TRUE",
        )
        .bind(franchise_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                "Failed to list locations by franchises",
                e,
            )
        })
    }

    async fn assigned_location_ids(&self, user_id: Uuid) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar(
            "SELECT location_id FROM employee_assignments \
             WHERE user_id = $1 AND is_active = TRUE",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                "Failed to list assigned locations",
                e,
            )
        })
    }

    async fn franchise_ids_by_locations(&self, location_ids: &[Uuid]) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar(
            "SELECT DISTINCT franchise_id FROM locations WHERE id = ANY($1)",
        )
        .bind(location_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                "Failed to list franchises by locations",
                e,
            )
        })
    }

    async fn active_assignment_role(
        &self,
        user_id: Uuid,
        location_id: Uuid,
    ) -> AppResult<Option<String>> {
        sqlx::query_scalar(
            "SELECT role_at_location::text FROM employee_assignments \
             WHERE user_id = $1 AND location_id = $2 AND is_active = TRUE",
        )
        .bind(user_id)
        .bind(location_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                "Failed to resolve assignment role",
                e,
            )
        })
    }

    async fn location_position(&self, location_id: Uuid) -> AppResult<Option<StoredPosition>> {
        let row: Option<(Option<f64>, Option<f64>)> =
            sqlx::query_as("SELECT latitude, longitude FROM locations WHERE id = $1")
                .bind(location_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Database,
                        "Failed to resolve location position",
                        e,
                    )
                })?;

        Ok(row.map(|(latitude, longitude)| match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => StoredPosition::At {
                latitude,
                longitude,
            },
            _ => StoredPosition::Unconfigured,
        }))
    }
}
