//! # gangazon-auth
//!
//! Authentication and authorization core for the Gangazon franchise
//! platform.
//!
//! ## Modules
//!
//! - `password` — Argon2id password hashing and verification
//! - `jwt` — token claims, encoding, and issuer-checked decoding
//! - `permissions` — the per-application permission set with the
//!   `super_admin` bypass collapsed in exactly one place
//! - `principal` — the per-request authenticated actor
//! - `access` — the hierarchical access-control engine, scoping
//!   filters, GPS proximity guard, and protected-resource layer
//! - `token` — the refresh-token lifecycle (issue, refresh, revoke,
//!   sweep)
//!
//! The engine and token service consume the trait seams defined in
//! `gangazon_core::traits`; they never query tables directly.

pub mod access;
pub mod jwt;
pub mod password;
pub mod permissions;
pub mod principal;
pub mod token;

pub use access::{AccessControlEngine, AccessDecision, ProximityGuard, ScopeFilter};
pub use jwt::{AccessClaims, JwtDecoder, JwtEncoder, TokenRejection};
pub use password::PasswordHasher;
pub use permissions::PermissionSet;
pub use principal::Principal;
pub use token::{TokenPair, TokenService};
