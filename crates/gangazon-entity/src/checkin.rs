//! Employee check-in entity and the worked-hours computation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// How a check-in was performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "checkin_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CheckinMethod {
    /// Entered manually.
    Manual,
    /// Verified against the location's stored coordinate.
    Gps,
    /// Scanned a location QR code.
    QrCode,
    /// Tapped an NFC tag.
    Nfc,
}

impl CheckinMethod {
    /// Return the method as a snake_case code string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Gps => "gps",
            Self::QrCode => "qr_code",
            Self::Nfc => "nfc",
        }
    }
}

impl fmt::Display for CheckinMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CheckinMethod {
    type Err = gangazon_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "manual" => Ok(Self::Manual),
            "gps" => Ok(Self::Gps),
            "qr_code" => Ok(Self::QrCode),
            "nfc" => Ok(Self::Nfc),
            _ => Err(gangazon_core::AppError::validation(format!(
                "Invalid check-in method: '{s}'"
            ))),
        }
    }
}

/// One check-in/check-out cycle for a user at a location.
///
/// A record with no `check_out_time` is "open"; a user may hold at most
/// one open record at a time (single-slot state machine).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmployeeCheckin {
    /// Unique check-in identifier.
    pub id: Uuid,
    /// The user who checked in.
    pub user_id: Uuid,
    /// The location worked at.
    pub location_id: Uuid,
    /// The authorizing assignment, when resolved at check-in time.
    pub assignment_id: Option<Uuid>,
    /// When the user checked in.
    pub check_in_time: DateTime<Utc>,
    /// When the user checked out; `None` while the record is open.
    pub check_out_time: Option<DateTime<Utc>>,
    /// How the check-in was performed.
    pub check_in_method: CheckinMethod,
    /// Reported GPS latitude at check-in.
    pub check_in_latitude: Option<f64>,
    /// Reported GPS longitude at check-in.
    pub check_in_longitude: Option<f64>,
    /// Break duration in minutes, stamped at check-out.
    pub break_duration_minutes: Option<i32>,
    /// Hours worked, computed at check-out, rounded to 2 decimals.
    pub hours_worked: Option<f64>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl EmployeeCheckin {
    /// Whether the record is still open (no check-out yet).
    pub fn is_open(&self) -> bool {
        self.check_out_time.is_none()
    }
}

/// Hours between check-in and check-out, rounded to 2 decimal places.
pub fn hours_worked(
    check_in_time: DateTime<Utc>,
    check_out_time: DateTime<Utc>,
) -> f64 {
    let seconds = (check_out_time - check_in_time).num_seconds() as f64;
    (seconds / 3600.0 * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn eight_and_a_half_hours() {
        let check_in = Utc.with_ymd_and_hms(2024, 5, 10, 9, 0, 0).unwrap();
        let check_out = Utc.with_ymd_and_hms(2024, 5, 10, 17, 30, 0).unwrap();
        assert_eq!(hours_worked(check_in, check_out), 8.5);
    }

    #[test]
    fn rounds_to_two_decimals() {
        let check_in = Utc.with_ymd_and_hms(2024, 5, 10, 9, 0, 0).unwrap();
        let check_out = Utc.with_ymd_and_hms(2024, 5, 10, 9, 50, 0).unwrap();
        // 50 minutes = 0.8333... hours
        assert_eq!(hours_worked(check_in, check_out), 0.83);
    }

    #[test]
    fn zero_duration() {
        let t = Utc.with_ymd_and_hms(2024, 5, 10, 9, 0, 0).unwrap();
        assert_eq!(hours_worked(t, t), 0.0);
    }
}
