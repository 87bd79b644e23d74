//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::Role;

/// A registered user of the Gangazon platform.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Unique login email.
    pub email: String,
    /// Password digest (opaque to everything but the hasher).
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Platform role.
    pub role: Role,
    /// The organization the user is scoped to, if any.
    pub organization_id: Option<Uuid>,
    /// The franchise the user is scoped to, if any.
    pub franchise_id: Option<Uuid>,
    /// Whether the account may authenticate. Deactivated users fail
    /// authentication before any access-control check runs.
    pub is_active: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Display name assembled from the name fields.
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => self.email.clone(),
        }
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Login email.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Assigned platform role.
    pub role: Role,
    /// Organization scope.
    pub organization_id: Option<Uuid>,
    /// Franchise scope.
    pub franchise_id: Option<Uuid>,
}
