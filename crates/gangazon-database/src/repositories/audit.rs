//! Audit log repository implementation.
//!
//! The audit trail is append-only: this repository exposes inserts and
//! reads, never updates or deletes.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use gangazon_core::error::{AppError, ErrorKind};
use gangazon_core::result::AppResult;
use gangazon_core::traits::audit::{AuditEvent, AuditSink};
use gangazon_core::types::pagination::{PageRequest, PageResponse};
use gangazon_entity::audit::AuditLogEntry;

/// Repository for the append-only audit log.
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    /// Create a new audit log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List entries for a user, newest first, paginated.
    pub async fn find_by_user(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AuditLogEntry>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM audit_logs WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count audit entries", e)
            })?;

        let entries = sqlx::query_as::<_, AuditLogEntry>(
            "SELECT * FROM audit_logs WHERE user_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list audit entries", e)
        })?;

        Ok(PageResponse::new(
            entries,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// List entries matching an action prefix, newest first, paginated.
    pub async fn find_by_action(
        &self,
        action_prefix: &str,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AuditLogEntry>> {
        let pattern = format!("{action_prefix}%");

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM audit_logs WHERE action LIKE $1")
                .bind(&pattern)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count audit entries", e)
                })?;

        let entries = sqlx::query_as::<_, AuditLogEntry>(
            "SELECT * FROM audit_logs WHERE action LIKE $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(&pattern)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list audit entries", e)
        })?;

        Ok(PageResponse::new(
            entries,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// List the most recent entries, paginated.
    pub async fn find_recent(&self, page: &PageRequest) -> AppResult<PageResponse<AuditLogEntry>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM audit_logs")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count audit entries", e)
            })?;

        let entries = sqlx::query_as::<_, AuditLogEntry>(
            "SELECT * FROM audit_logs ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list audit entries", e)
        })?;

        Ok(PageResponse::new(
            entries,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}

#[async_trait]
impl AuditSink for AuditLogRepository {
    async fn record(&self, event: AuditEvent) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO audit_logs (user_id, application_id, action, ip_address, details) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(event.user_id)
        .bind(event.application_id)
        .bind(&event.action)
        .bind(&event.ip_address)
        .bind(&event.details)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to record audit entry", e)
        })?;
        Ok(())
    }
}
