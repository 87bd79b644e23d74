//! Repository implementations for all Gangazon entities.

pub mod application;
pub mod assignment;
pub mod audit;
pub mod checkin;
pub mod franchise;
pub mod location;
pub mod organization;
pub mod permission;
pub mod refresh_token;
pub mod session;
pub mod user;

pub use application::ApplicationRepository;
pub use assignment::AssignmentRepository;
pub use audit::AuditLogRepository;
pub use checkin::CheckinRepository;
pub use franchise::FranchiseRepository;
pub use location::LocationRepository;
pub use organization::OrganizationRepository;
pub use permission::PermissionRepository;
pub use refresh_token::RefreshTokenRepository;
pub use session::SessionRepository;
pub use user::UserRepository;

use gangazon_core::error::{AppError, ErrorKind};

/// SQLSTATE for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";
/// SQLSTATE for exclusion constraint violations.
const EXCLUSION_VIOLATION: &str = "23P01";

/// Maps a sqlx error to [`ErrorKind::Conflict`] when a unique or
/// exclusion constraint fired, otherwise to a database error.
///
/// Concurrency-sensitive invariants (one open check-in per user,
/// non-overlapping active assignments) are closed by constraints, so
/// the lost race must surface as a conflict rather than an opaque
/// database failure.
pub(crate) fn conflict_or_database(
    err: sqlx::Error,
    conflict_message: &str,
    context: &str,
) -> AppError {
    if let sqlx::Error::Database(ref db_err) = err {
        if matches!(
            db_err.code().as_deref(),
            Some(UNIQUE_VIOLATION) | Some(EXCLUSION_VIOLATION)
        ) {
            return AppError::conflict(conflict_message.to_string());
        }
    }
    AppError::with_source(ErrorKind::Database, context.to_string(), err)
}
