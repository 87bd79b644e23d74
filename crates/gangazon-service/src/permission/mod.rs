//! Permission definitions and per-user grants.

pub mod service;

pub use service::{DefinePermissionRequest, PermissionService};
