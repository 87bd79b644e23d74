//! Employee assignment entity: the link authorizing a user to work at
//! a location for a date range.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The role an employee holds at one specific location. Independent of
/// the platform role on the user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "location_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LocationRole {
    /// Runs the location.
    Manager,
    /// Supervises shifts.
    Supervisor,
    /// Works shifts.
    Employee,
    /// Read-only.
    Viewer,
}

impl LocationRole {
    /// Return the role as a lowercase code string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::Supervisor => "supervisor",
            Self::Employee => "employee",
            Self::Viewer => "viewer",
        }
    }
}

impl fmt::Display for LocationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LocationRole {
    type Err = gangazon_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "manager" => Ok(Self::Manager),
            "supervisor" => Ok(Self::Supervisor),
            "employee" => Ok(Self::Employee),
            "viewer" => Ok(Self::Viewer),
            _ => Err(gangazon_core::AppError::validation(format!(
                "Invalid location role: '{s}'"
            ))),
        }
    }
}

/// Shift pattern of an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "shift_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ShiftType {
    /// Full-time contract.
    FullTime,
    /// Part-time contract.
    PartTime,
    /// Temporary cover for a fixed period.
    Temporary,
    /// One-off cover shift.
    Cover,
}

/// Links a user to a location with a role and a validity window.
///
/// Assignments are never hard-deleted while audit history must be
/// retained; deactivation sets `is_active = false` and stamps
/// `end_date`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmployeeAssignment {
    /// Unique assignment identifier.
    pub id: Uuid,
    /// The assigned user.
    pub user_id: Uuid,
    /// The location worked at.
    pub location_id: Uuid,
    /// Role held at the location.
    pub role_at_location: LocationRole,
    /// Shift pattern.
    pub shift_type: Option<ShiftType>,
    /// First day of validity.
    pub start_date: NaiveDate,
    /// Last day of validity; open-ended when `None`.
    pub end_date: Option<NaiveDate>,
    /// Whether the assignment is currently active.
    pub is_active: bool,
    /// Free-form notes.
    pub notes: Option<String>,
    /// When the assignment was created.
    pub created_at: DateTime<Utc>,
}

impl EmployeeAssignment {
    /// Whether this assignment's date window overlaps `[start, end]`.
    /// An open `end_date` (here or in the candidate) extends to infinity.
    pub fn overlaps(&self, start: NaiveDate, end: Option<NaiveDate>) -> bool {
        let starts_before_candidate_ends = match end {
            Some(end) => self.start_date <= end,
            None => true,
        };
        let ends_after_candidate_starts = match self.end_date {
            Some(own_end) => own_end >= start,
            None => true,
        };
        starts_before_candidate_ends && ends_after_candidate_starts
    }
}

/// Data required to create a new assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAssignment {
    /// The user to assign.
    pub user_id: Uuid,
    /// The location to assign to.
    pub location_id: Uuid,
    /// Role held at the location.
    pub role_at_location: LocationRole,
    /// Shift pattern.
    pub shift_type: Option<ShiftType>,
    /// First day of validity.
    pub start_date: NaiveDate,
    /// Last day of validity, if bounded.
    pub end_date: Option<NaiveDate>,
    /// Free-form notes.
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn assignment(start: &str, end: Option<&str>) -> EmployeeAssignment {
        EmployeeAssignment {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            location_id: Uuid::new_v4(),
            role_at_location: LocationRole::Employee,
            shift_type: None,
            start_date: start.parse().unwrap(),
            end_date: end.map(|e| e.parse().unwrap()),
            is_active: true,
            notes: None,
            created_at: Utc::now(),
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn open_ended_windows_overlap() {
        let existing = assignment("2024-01-01", None);
        assert!(existing.overlaps(date("2024-01-15"), None));
        assert!(existing.overlaps(date("2023-06-01"), Some(date("2024-01-01"))));
    }

    #[test]
    fn disjoint_windows_do_not_overlap() {
        let existing = assignment("2024-01-01", Some("2024-03-31"));
        assert!(!existing.overlaps(date("2024-04-01"), None));
        assert!(!existing.overlaps(date("2023-01-01"), Some(date("2023-12-31"))));
    }

    #[test]
    fn touching_boundaries_overlap() {
        let existing = assignment("2024-01-01", Some("2024-03-31"));
        assert!(existing.overlaps(date("2024-03-31"), None));
        assert!(existing.overlaps(date("2023-12-01"), Some(date("2024-01-01"))));
    }
}
