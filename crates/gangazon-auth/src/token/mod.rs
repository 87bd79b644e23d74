//! Token lifecycle: issuance, verification, refresh, revocation.

pub mod service;

pub use service::{TokenPair, TokenService};
