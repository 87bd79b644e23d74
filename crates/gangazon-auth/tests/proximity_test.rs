//! GPS proximity guard behavior against stored location coordinates.

mod helpers;

use std::sync::Arc;

use uuid::Uuid;

use gangazon_auth::access::proximity::{Coordinates, ProximityGuard};
use gangazon_core::config::gps::GpsConfig;
use gangazon_core::error::ErrorKind;
use helpers::FakeHierarchy;

const MADRID: Coordinates = Coordinates {
    latitude: 40.4168,
    longitude: -3.7038,
};

#[tokio::test]
async fn on_the_spot_check_in_is_valid() {
    let mut hierarchy = FakeHierarchy::default();
    let franchise = hierarchy.add_franchise(Uuid::new_v4());
    let location = hierarchy.add_location(franchise);
    hierarchy.place(location, MADRID.latitude, MADRID.longitude);

    let guard = ProximityGuard::new(Arc::new(hierarchy), GpsConfig::default());
    let check = guard.validate_proximity(MADRID, location, None).await.unwrap();

    assert!(check.valid);
    assert_eq!(check.distance_meters, Some(0));
}

#[tokio::test]
async fn beyond_tolerance_is_invalid_with_distance_reported() {
    let mut hierarchy = FakeHierarchy::default();
    let franchise = hierarchy.add_franchise(Uuid::new_v4());
    let location = hierarchy.add_location(franchise);
    hierarchy.place(location, 0.0, 0.0);

    let guard = ProximityGuard::new(Arc::new(hierarchy), GpsConfig::default());
    // Roughly 150 m north of the stored point, default tolerance 100 m.
    let reported = Coordinates {
        latitude: 0.00135,
        longitude: 0.0,
    };
    let check = guard
        .validate_proximity(reported, location, None)
        .await
        .unwrap();

    assert!(!check.valid);
    let distance = check.distance_meters.unwrap();
    assert!((149..=151).contains(&distance), "distance was {distance}");

    // The same position passes with a wider per-call tolerance.
    let relaxed = guard
        .validate_proximity(reported, location, Some(200))
        .await
        .unwrap();
    assert!(relaxed.valid);
}

#[tokio::test]
async fn location_without_coordinates_accepts_any_position() {
    let mut hierarchy = FakeHierarchy::default();
    let franchise = hierarchy.add_franchise(Uuid::new_v4());
    let location = hierarchy.add_location(franchise);

    let guard = ProximityGuard::new(Arc::new(hierarchy), GpsConfig::default());
    let check = guard.validate_proximity(MADRID, location, None).await.unwrap();

    assert!(check.valid);
    assert_eq!(check.distance_meters, None);
}

#[tokio::test]
async fn unknown_location_is_not_found() {
    let guard = ProximityGuard::new(
        Arc::new(FakeHierarchy::default()),
        GpsConfig::default(),
    );
    let err = guard
        .validate_proximity(MADRID, Uuid::new_v4(), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn per_call_tolerance_cannot_exceed_the_ceiling() {
    let mut hierarchy = FakeHierarchy::default();
    let franchise = hierarchy.add_franchise(Uuid::new_v4());
    let location = hierarchy.add_location(franchise);
    hierarchy.place(location, 0.0, 0.0);

    let guard = ProximityGuard::new(Arc::new(hierarchy), GpsConfig::default());
    // About 1 km away. Even a huge requested tolerance is clamped to 500 m.
    let reported = Coordinates {
        latitude: 0.009,
        longitude: 0.0,
    };
    let check = guard
        .validate_proximity(reported, location, Some(100_000))
        .await
        .unwrap();
    assert!(!check.valid);
}
