//! Organization management.

pub mod service;

pub use service::{CreateOrganizationRequest, OrganizationService, UpdateOrganizationRequest};
