//! Hierarchical access-control engine.
//!
//! Decisions are computed from the principal's role, the organization →
//! franchise → location hierarchy, and active assignments. The
//! `super_admin` permission bypasses every check except the
//! protected-resource layer.

pub mod decision;
pub mod engine;
pub mod protected;
pub mod proximity;

pub use decision::{AccessDecision, ScopeFilter};
pub use engine::AccessControlEngine;
pub use proximity::{Coordinates, ProximityCheck, ProximityGuard, haversine_distance_meters};
