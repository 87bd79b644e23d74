//! Session lifecycle: login, logout, refresh orchestration.

pub mod service;

pub use service::{LoginRequest, LoginResult, SessionManager};
