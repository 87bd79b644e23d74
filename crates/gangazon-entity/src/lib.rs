//! # gangazon-entity
//!
//! Domain entity models for the Gangazon franchise platform: users and
//! platform roles, the organization → franchise → location hierarchy,
//! employee assignments, check-ins, applications and their permissions,
//! sessions/refresh tokens, and the audit log.

pub mod application;
pub mod assignment;
pub mod audit;
pub mod checkin;
pub mod franchise;
pub mod location;
pub mod organization;
pub mod permission;
pub mod session;
pub mod user;
