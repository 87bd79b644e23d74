//! Location entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A physical location belonging to a franchise.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Location {
    /// Unique location identifier.
    pub id: Uuid,
    /// The owning franchise.
    pub franchise_id: Uuid,
    /// Display name.
    pub name: String,
    /// Street address.
    pub address: Option<String>,
    /// Stored GPS latitude, when configured.
    pub latitude: Option<f64>,
    /// Stored GPS longitude, when configured.
    pub longitude: Option<f64>,
    /// Maximum number of concurrently assigned employees.
    pub max_employees: i32,
    /// Whether the location is active (soft-delete flag).
    pub is_active: bool,
    /// When the location was created.
    pub created_at: DateTime<Utc>,
    /// When the location was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Location {
    /// The stored coordinate pair, when both components are configured.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }
}
