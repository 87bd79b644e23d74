//! # gangazon-core
//!
//! Core crate for the Gangazon auth service. Contains configuration
//! schemas, the unified error system, pagination types, and the trait
//! seams (hierarchy, identity, refresh-token, audit stores) that the
//! authorization engine consumes.
//!
//! This crate has **no** internal dependencies on other Gangazon crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
