//! User management and self-service.

pub mod service;

pub use service::{CreateUserRequest, UpdateProfileRequest, UserService};
