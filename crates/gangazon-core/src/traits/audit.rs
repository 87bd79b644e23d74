//! Append-only audit sink.

use async_trait::async_trait;
use uuid::Uuid;

use crate::result::AppResult;

/// A single audit event to append.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    /// The acting user, when known.
    pub user_id: Option<Uuid>,
    /// The application context, when known.
    pub application_id: Option<Uuid>,
    /// Action code, e.g. `"login"`, `"permission_granted"`.
    pub action: String,
    /// Origin IP address.
    pub ip_address: Option<String>,
    /// Free-form structured details.
    pub details: Option<serde_json::Value>,
}

impl AuditEvent {
    /// Create an event with just an actor and action.
    pub fn new(user_id: Option<Uuid>, action: impl Into<String>) -> Self {
        Self {
            user_id,
            application_id: None,
            action: action.into(),
            ip_address: None,
            details: None,
        }
    }

    /// Attach an application context.
    pub fn with_application(mut self, application_id: Uuid) -> Self {
        self.application_id = Some(application_id);
        self
    }

    /// Attach an origin IP.
    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }

    /// Attach structured details.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Append-only sink for audit events. Entries are never mutated or
/// deleted through this interface.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Append one event.
    async fn record(&self, event: AuditEvent) -> AppResult<()>;
}
