//! Application registry orchestration.
//!
//! Applications are the platform's OAuth-style clients. Each carries an
//! opaque API key; rotating the key invalidates the old one immediately
//! because lookups go by the stored value.

use std::sync::Arc;

use rand::RngExt;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use gangazon_auth::Principal;
use gangazon_auth::access::protected;
use gangazon_core::error::AppError;
use gangazon_core::result::AppResult;
use gangazon_core::traits::audit::{AuditEvent, AuditSink};
use gangazon_database::repositories::ApplicationRepository;
use gangazon_entity::application::Application;

/// Prefix identifying platform API keys at a glance.
const API_KEY_PREFIX: &str = "ganz_";

/// Data for registering an application.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct RegisterApplicationRequest {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub redirect_url: Option<String>,
}

/// Data for updating an application.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct UpdateApplicationRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub redirect_url: Option<String>,
}

/// Application registry, restricted to super administrators.
#[derive(Clone)]
pub struct ApplicationService {
    applications: Arc<ApplicationRepository>,
    audit: Arc<dyn AuditSink>,
}

impl ApplicationService {
    /// Creates a new application service.
    pub fn new(applications: Arc<ApplicationRepository>, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            applications,
            audit,
        }
    }

    /// Lists active applications.
    pub async fn list(&self, principal: &Principal) -> AppResult<Vec<Application>> {
        require_super_admin(principal)?;
        self.applications.find_all_active().await
    }

    /// Fetches an application by id.
    pub async fn get(&self, principal: &Principal, id: Uuid) -> AppResult<Application> {
        require_super_admin(principal)?;
        self.applications
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Application not found"))
    }

    /// Registers a new application and mints its API key.
    ///
    /// The key is only returned here; reads serialize it away.
    pub async fn register(
        &self,
        principal: &Principal,
        request: RegisterApplicationRequest,
    ) -> AppResult<Application> {
        require_super_admin(principal)?;

        if request.code.trim().is_empty() {
            return Err(AppError::validation("Application code must not be empty"));
        }
        if request.name.trim().is_empty() {
            return Err(AppError::validation("Application name must not be empty"));
        }

        let api_key = generate_api_key();
        let application = self
            .applications
            .create(
                &request.code,
                &request.name,
                request.description.as_deref(),
                &api_key,
                request.redirect_url.as_deref(),
            )
            .await?;

        info!(application_id = %application.id, code = %application.code, "application registered");
        self.audit
            .record(
                AuditEvent::new(Some(principal.user_id), "application_registered")
                    .with_application(application.id)
                    .with_details(json!({ "code": application.code })),
            )
            .await?;

        Ok(application)
    }

    /// Updates an application's mutable fields.
    pub async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        request: UpdateApplicationRequest,
    ) -> AppResult<Application> {
        require_super_admin(principal)?;

        let current = self.get(principal, id).await?;
        protected::ensure_application_mutable(&current)?;

        let updated = self
            .applications
            .update(
                id,
                request.name.as_deref(),
                request.description.as_deref(),
                request.redirect_url.as_deref(),
            )
            .await?;

        info!(application_id = %id, "application updated");
        self.audit
            .record(
                AuditEvent::new(Some(principal.user_id), "application_updated")
                    .with_application(id)
                    .with_details(json!({ "code": updated.code })),
            )
            .await?;

        Ok(updated)
    }

    /// Replaces an application's API key with a freshly minted one.
    pub async fn rotate_api_key(&self, principal: &Principal, id: Uuid) -> AppResult<Application> {
        require_super_admin(principal)?;

        let current = self.get(principal, id).await?;
        protected::ensure_application_mutable(&current)?;

        let api_key = generate_api_key();
        let updated = self.applications.rotate_api_key(id, &api_key).await?;

        info!(application_id = %id, "application API key rotated");
        self.audit
            .record(
                AuditEvent::new(Some(principal.user_id), "application_key_rotated")
                    .with_application(id)
                    .with_details(json!({ "code": updated.code })),
            )
            .await?;

        Ok(updated)
    }

    /// Deactivates an application. Tokens already scoped to it keep
    /// working until they expire; refresh is refused at login lookup.
    pub async fn deactivate(&self, principal: &Principal, id: Uuid) -> AppResult<()> {
        require_super_admin(principal)?;

        let current = self.get(principal, id).await?;
        protected::ensure_application_mutable(&current)?;

        self.applications.deactivate(id).await?;

        info!(application_id = %id, code = %current.code, "application deactivated");
        self.audit
            .record(
                AuditEvent::new(Some(principal.user_id), "application_deactivated")
                    .with_application(id)
                    .with_details(json!({ "code": current.code })),
            )
            .await?;

        Ok(())
    }
}

/// Mints an opaque API key: the platform prefix plus 32 random bytes
/// hex-encoded.
fn generate_api_key() -> String {
    let mut rng = rand::rng();
    let mut key = String::with_capacity(API_KEY_PREFIX.len() + 64);
    key.push_str(API_KEY_PREFIX);
    for _ in 0..32 {
        let byte: u8 = rng.random();
        key.push_str(&format!("{byte:02x}"));
    }
    key
}

fn require_super_admin(principal: &Principal) -> AppResult<()> {
    if principal.is_super_admin() {
        return Ok(());
    }
    Err(AppError::authorization(
        "Super administrator privileges are required",
    ))
}

impl std::fmt::Debug for ApplicationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationService").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_keys_carry_prefix_and_are_unique() {
        let a = generate_api_key();
        let b = generate_api_key();
        assert!(a.starts_with("ganz_"));
        assert_eq!(a.len(), 5 + 64);
        assert_ne!(a, b);
    }
}
