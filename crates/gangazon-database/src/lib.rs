//! # gangazon-database
//!
//! PostgreSQL connection management and concrete repository
//! implementations for all Gangazon entities. The store traits from
//! `gangazon_core::traits` are implemented here so the auth crate
//! stays persistence-agnostic.

pub mod connection;
pub mod hierarchy;
pub mod repositories;

pub use connection::DatabasePool;
pub use hierarchy::PgHierarchyStore;
