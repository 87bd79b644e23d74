//! Franchise management service.

pub mod service;

pub use service::{CreateFranchiseRequest, FranchiseService, UpdateFranchiseRequest};
