//! Permission entity: a per-application grant code, plus the rows that
//! grant a permission to a user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The universal bypass permission code. Holding it for any application
/// grants unrestricted access everywhere; its row can never be edited
/// or deleted through the management services.
pub const SUPER_ADMIN_CODE: &str = "super_admin";

/// A fine-grained permission scoped to one application.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Permission {
    /// Unique permission identifier.
    pub id: Uuid,
    /// The owning application.
    pub application_id: Uuid,
    /// Permission code, unique per application, e.g. `"users.create"`.
    pub code: String,
    /// Human-readable name.
    pub display_name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Grouping category for display.
    pub category: Option<String>,
    /// Whether the permission is active.
    pub is_active: bool,
    /// When the permission was created.
    pub created_at: DateTime<Utc>,
    /// When the permission was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Permission {
    /// Whether this is the protected universal bypass permission.
    pub fn is_system(&self) -> bool {
        self.code == SUPER_ADMIN_CODE
    }
}

/// A grant linking a user to a permission.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PermissionGrant {
    /// Unique grant identifier.
    pub id: Uuid,
    /// The granted user.
    pub user_id: Uuid,
    /// The granted permission.
    pub permission_id: Uuid,
    /// Who granted it, when known.
    pub granted_by: Option<Uuid>,
    /// When the grant was made.
    pub granted_at: DateTime<Utc>,
}
