//! Location management service.

pub mod service;

pub use service::{CreateLocationRequest, LocationService, UpdateLocationRequest};
