//! Employee assignment management.

pub mod service;

pub use service::{AssignmentService, CreateAssignmentRequest};
