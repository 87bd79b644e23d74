//! # gangazon-service
//!
//! Business logic services for the Gangazon platform. Each service
//! orchestrates repositories behind the access-control engine: every
//! read and write is gated by an engine decision, and list operations
//! are narrowed to the caller's visible scope before touching the
//! database.

pub mod application;
pub mod assignment;
pub mod audit;
pub mod checkin;
pub mod franchise;
pub mod location;
pub mod organization;
pub mod permission;
pub mod scope;
pub mod session;
pub mod user;

pub use application::ApplicationService;
pub use assignment::AssignmentService;
pub use audit::AuditService;
pub use checkin::CheckinService;
pub use franchise::FranchiseService;
pub use location::LocationService;
pub use organization::OrganizationService;
pub use permission::PermissionService;
pub use session::SessionManager;
pub use user::UserService;
