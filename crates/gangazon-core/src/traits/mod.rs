//! Trait seams between the authorization engine and its collaborators.
//!
//! The engine and token lifecycle consume these traits rather than
//! concrete repositories so that the access-control semantics can be
//! exercised without a live database. `gangazon-database` provides the
//! PostgreSQL implementations.

pub mod audit;
pub mod hierarchy;
pub mod identity;
pub mod token_store;

pub use audit::{AuditEvent, AuditSink};
pub use hierarchy::{HierarchyStore, StoredPosition};
pub use identity::{IdentityStore, UserSnapshot};
pub use token_store::{RefreshTokenStore, StoredRefreshToken};
