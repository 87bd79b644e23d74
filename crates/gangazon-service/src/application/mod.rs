//! Client application registry.

pub mod service;

pub use service::{ApplicationService, RegisterApplicationRequest, UpdateApplicationRequest};
