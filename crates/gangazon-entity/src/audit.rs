//! Audit log entry entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An immutable audit log entry. Append-only: never mutated or deleted
/// through the services.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLogEntry {
    /// Unique audit entry identifier.
    pub id: Uuid,
    /// The acting user, when known.
    pub user_id: Option<Uuid>,
    /// The application context, when known.
    pub application_id: Option<Uuid>,
    /// The action performed, e.g. `"login"`, `"permission_granted"`.
    pub action: String,
    /// Origin IP address.
    pub ip_address: Option<String>,
    /// Free-form structured details.
    pub details: Option<serde_json::Value>,
    /// When the action occurred.
    pub created_at: DateTime<Utc>,
}
