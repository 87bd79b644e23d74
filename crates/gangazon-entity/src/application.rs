//! Application entity: a client app of the auth service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Code of the distinguished admin-panel application, protected from
/// deletion and modification.
pub const SYSTEM_APPLICATION_CODE: &str = "ADMIN_PANEL";

/// A registered application that users authenticate into.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Application {
    /// Unique application identifier.
    pub id: Uuid,
    /// Unique short code, e.g. `"ADMIN_PANEL"`.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Opaque API key used for application-level authentication.
    #[serde(skip_serializing)]
    pub api_key: String,
    /// Where to send users after login.
    pub redirect_url: Option<String>,
    /// Whether the application may be used.
    pub is_active: bool,
    /// When the application was registered.
    pub created_at: DateTime<Utc>,
    /// When the application was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Application {
    /// Whether this is the protected admin-panel application.
    pub fn is_system(&self) -> bool {
        self.code == SYSTEM_APPLICATION_CODE
    }
}
