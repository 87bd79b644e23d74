//! Read-only audit trail queries.

pub mod service;

pub use service::AuditService;
