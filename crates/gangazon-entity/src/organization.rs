//! Organization entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The top of the hierarchy: an organization owns zero-or-more
/// franchises.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Organization {
    /// Unique organization identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Industry label.
    pub industry: Option<String>,
    /// Whether the organization is active.
    pub is_active: bool,
    /// When the organization was created.
    pub created_at: DateTime<Utc>,
}
