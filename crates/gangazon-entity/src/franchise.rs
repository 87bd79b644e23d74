//! Franchise entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Code of the distinguished head-office franchise, protected from
/// deletion and modification.
pub const SYSTEM_FRANCHISE_CODE: &str = "GANGAZON_HQ";

/// Operating status of a franchise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "franchise_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FranchiseStatus {
    /// Operating normally.
    Active,
    /// Temporarily suspended.
    Suspended,
    /// Contract terminated.
    Terminated,
    /// Signed but not yet operating.
    Pending,
}

impl FranchiseStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Terminated => "terminated",
            Self::Pending => "pending",
        }
    }
}

impl fmt::Display for FranchiseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FranchiseStatus {
    type Err = gangazon_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "suspended" => Ok(Self::Suspended),
            "terminated" => Ok(Self::Terminated),
            "pending" => Ok(Self::Pending),
            _ => Err(gangazon_core::AppError::validation(format!(
                "Invalid franchise status: '{s}'"
            ))),
        }
    }
}

/// A franchise under an organization, owning zero-or-more locations.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Franchise {
    /// Unique franchise identifier.
    pub id: Uuid,
    /// The owning organization.
    pub organization_id: Uuid,
    /// Unique short code, e.g. `"MADRID_01"`.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Operating status.
    pub status: FranchiseStatus,
    /// Maximum number of locations this franchise may open.
    pub max_locations: i32,
    /// Whether the franchise is active (soft-delete flag).
    pub is_active: bool,
    /// When the franchise was created.
    pub created_at: DateTime<Utc>,
    /// When the franchise was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Franchise {
    /// Whether this is the protected head-office franchise.
    pub fn is_system(&self) -> bool {
        self.code == SYSTEM_FRANCHISE_CODE
    }
}
