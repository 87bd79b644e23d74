//! GPS proximity validation for location check-ins.

use std::sync::Arc;

use uuid::Uuid;

use gangazon_core::config::gps::GpsConfig;
use gangazon_core::error::AppError;
use gangazon_core::result::AppResult;
use gangazon_core::traits::hierarchy::{HierarchyStore, StoredPosition};

/// Mean Earth radius in meters.
const EARTH_RADIUS_METERS: f64 = 6_371e3;

/// A latitude / longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// The outcome of a proximity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProximityCheck {
    /// Whether the reported position is within tolerance.
    pub valid: bool,
    /// Distance to the stored position, rounded to the nearest meter.
    /// `None` when the location has no configured coordinates.
    pub distance_meters: Option<u32>,
}

/// Great-circle distance between two points, in meters.
pub fn haversine_distance_meters(a: Coordinates, b: Coordinates) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let delta_phi = (b.latitude - a.latitude).to_radians();
    let delta_lambda = (b.longitude - a.longitude).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Validates that a reported position is close enough to a location's
/// stored coordinates.
#[derive(Clone)]
pub struct ProximityGuard {
    store: Arc<dyn HierarchyStore>,
    config: GpsConfig,
}

impl ProximityGuard {
    pub fn new(store: Arc<dyn HierarchyStore>, config: GpsConfig) -> Self {
        Self { store, config }
    }

    /// Checks a reported position against a location.
    ///
    /// A location with no configured coordinates accepts any position.
    /// An explicit `tolerance_meters` overrides the configured default;
    /// either way the tolerance is clamped to the configured maximum.
    pub async fn validate_proximity(
        &self,
        reported: Coordinates,
        location_id: Uuid,
        tolerance_meters: Option<u32>,
    ) -> AppResult<ProximityCheck> {
        let tolerance = self.config.effective_tolerance(tolerance_meters);

        let position = self
            .store
            .location_position(location_id)
            .await?
            .ok_or_else(|| AppError::not_found("Location not found"))?;

        match position {
            StoredPosition::Unconfigured => Ok(ProximityCheck {
                valid: true,
                distance_meters: None,
            }),
            StoredPosition::At { latitude, longitude } => {
                let distance = haversine_distance_meters(
                    reported,
                    Coordinates {
                        latitude,
                        longitude,
                    },
                );
                let rounded = distance.round() as u32;
                Ok(ProximityCheck {
                    valid: rounded <= tolerance,
                    distance_meters: Some(rounded),
                })
            }
        }
    }
}

impl std::fmt::Debug for ProximityGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProximityGuard")
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_to_self_is_zero() {
        let p = Coordinates {
            latitude: 40.4168,
            longitude: -3.7038,
        };
        assert!(haversine_distance_meters(p, p).abs() < f64::EPSILON);
    }

    #[test]
    fn known_offset_is_about_150_meters() {
        // Roughly 0.00135 degrees of latitude at the equator.
        let a = Coordinates {
            latitude: 0.0,
            longitude: 0.0,
        };
        let b = Coordinates {
            latitude: 0.00135,
            longitude: 0.0,
        };
        let d = haversine_distance_meters(a, b);
        assert!((d - 150.0).abs() < 1.0, "distance was {d}");
    }

    #[test]
    fn antipodal_points_are_half_the_circumference() {
        let a = Coordinates {
            latitude: 0.0,
            longitude: 0.0,
        };
        let b = Coordinates {
            latitude: 0.0,
            longitude: 180.0,
        };
        let d = haversine_distance_meters(a, b);
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_METERS;
        assert!((d - half_circumference).abs() < 1.0);
    }
}
