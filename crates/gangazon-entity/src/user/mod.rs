//! User entity and platform role.

pub mod model;
pub mod role;

pub use model::{CreateUser, User};
pub use role::Role;
