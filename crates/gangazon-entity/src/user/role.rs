//! Platform role enumeration and the fixed role hierarchy.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Rank assigned to role codes outside the closed set when comparing
/// raw strings. Sorts after every valid role.
const UNKNOWN_RANK: u16 = 999;

/// Platform-level roles, a closed set with a fixed total order.
///
/// Lower rank means more privilege:
/// admin(1) < franchisee(2) < manager(3) < supervisor(4) < employee(5) < viewer(6).
///
/// This ordering is distinct from, and composable with, the
/// per-application permission grants (`super_admin` is a permission
/// code, not a role).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "platform_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Head-office administrator.
    Admin,
    /// Franchise owner.
    Franchisee,
    /// Location manager.
    Manager,
    /// Location supervisor.
    Supervisor,
    /// Location employee.
    Employee,
    /// Read-only access.
    Viewer,
}

impl Role {
    /// The role's rank in the fixed hierarchy (lower = more privilege).
    pub fn rank(&self) -> u16 {
        match self {
            Self::Admin => 1,
            Self::Franchisee => 2,
            Self::Manager => 3,
            Self::Supervisor => 4,
            Self::Employee => 5,
            Self::Viewer => 6,
        }
    }

    /// Compare two roles by hierarchy: `Less` means `self` outranks
    /// `other` (more privilege).
    pub fn compare(&self, other: &Role) -> Ordering {
        self.rank().cmp(&other.rank())
    }

    /// Whether this role strictly outranks `other`.
    pub fn has_higher_privilege(&self, other: &Role) -> bool {
        self.rank() < other.rank()
    }

    /// Whether a raw role code belongs to the closed set.
    pub fn is_valid_code(code: &str) -> bool {
        code.parse::<Role>().is_ok()
    }

    /// Rank of a raw role code; unknown codes sort last.
    pub fn rank_of(code: &str) -> u16 {
        code.parse::<Role>().map_or(UNKNOWN_RANK, |r| r.rank())
    }

    /// Whether the role may work shifts (holds location assignments).
    pub fn is_assignment_holder(&self) -> bool {
        matches!(
            self,
            Self::Manager | Self::Supervisor | Self::Employee | Self::Viewer
        )
    }

    /// Whether the role scopes by organization rather than assignments.
    pub fn is_organization_scoped(&self) -> bool {
        matches!(self, Self::Admin | Self::Franchisee)
    }

    /// Return the role as a lowercase code string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Franchisee => "franchisee",
            Self::Manager => "manager",
            Self::Supervisor => "supervisor",
            Self::Employee => "employee",
            Self::Viewer => "viewer",
        }
    }

    /// All roles in hierarchy order.
    pub fn all() -> [Role; 6] {
        [
            Self::Admin,
            Self::Franchisee,
            Self::Manager,
            Self::Supervisor,
            Self::Employee,
            Self::Viewer,
        ]
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = gangazon_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "franchisee" => Ok(Self::Franchisee),
            "manager" => Ok(Self::Manager),
            "supervisor" => Ok(Self::Supervisor),
            "employee" => Ok(Self::Employee),
            "viewer" => Ok(Self::Viewer),
            _ => Err(gangazon_core::AppError::validation(format!(
                "Invalid role: '{s}'. Expected one of: admin, franchisee, manager, supervisor, employee, viewer"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hierarchy_ordering() {
        assert!(Role::Admin.has_higher_privilege(&Role::Franchisee));
        assert!(Role::Franchisee.has_higher_privilege(&Role::Manager));
        assert!(Role::Supervisor.has_higher_privilege(&Role::Employee));
        assert!(!Role::Viewer.has_higher_privilege(&Role::Employee));
        assert!(!Role::Admin.has_higher_privilege(&Role::Admin));
    }

    #[test]
    fn compare_is_antisymmetric_and_reflexive() {
        for a in Role::all() {
            assert_eq!(a.compare(&a), Ordering::Equal);
            for b in Role::all() {
                assert_eq!(a.compare(&b), b.compare(&a).reverse());
            }
        }
    }

    #[test]
    fn unknown_codes_sort_last() {
        assert_eq!(Role::rank_of("viewer"), 6);
        assert_eq!(Role::rank_of("intern"), 999);
        assert!(Role::rank_of("admin") < Role::rank_of("nonsense"));
    }

    #[test]
    fn parse_round_trip() {
        for role in Role::all() {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("root".parse::<Role>().is_err());
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
    }
}
