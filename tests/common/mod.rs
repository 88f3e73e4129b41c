// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use group_rides::config::Config;
use group_rides::db::{FirestoreRideStore, MemoryRideStore, RideStore};
use group_rides::models::{Ride, RideInput, User};
use group_rides::services::{AvailabilityController, RideView, RosterEngine};
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test Firestore connection (emulator).
#[allow(dead_code)]
pub async fn test_firestore() -> FirestoreRideStore {
    FirestoreRideStore::new(&Config::test_default())
        .await
        .expect("Failed to connect to Firestore emulator")
}

#[allow(dead_code)]
pub fn user(id: &str) -> User {
    User::new(id, format!("{}@example.com", id)).with_display_name(format!("Rider {}", id))
}

/// Valid creation input with the given capacity.
#[allow(dead_code)]
pub fn ride_input(title: &str, max_participants: u32) -> RideInput {
    RideInput {
        title: title.to_string(),
        description: "Coffee ride along the bay".to_string(),
        start_location: "Ferry Building".to_string(),
        start_latitude: Some(37.7955),
        start_longitude: Some(-122.3937),
        date: "2026-11-21".to_string(),
        time: "08:00".to_string(),
        difficulty: "Easy".to_string(),
        distance_km: 30,
        max_participants,
    }
}

/// A valid ride organized by `creator_id`.
#[allow(dead_code)]
pub fn ride(title: &str, creator_id: &str, max_participants: u32) -> Ride {
    Ride::validate_creation(
        &ride_input(title, max_participants),
        &user(creator_id),
        Config::test_default().default_point(),
    )
    .expect("Test ride input should be valid")
}

/// In-memory store, engine and a live view loaded with `rides`.
#[allow(dead_code)]
pub async fn live_setup(rides: Vec<Ride>) -> (Arc<MemoryRideStore>, RosterEngine, RideView) {
    let store = Arc::new(MemoryRideStore::with_rides(rides));
    let dyn_store: Arc<dyn RideStore> = store.clone();
    let engine = RosterEngine::new(dyn_store.clone(), Config::test_default().default_point());
    let controller =
        AvailabilityController::new(dyn_store).expect("Sample rides should parse");
    let view = controller.load().await.expect("Live load should succeed");
    (store, engine, view)
}

/// Assert the roster invariants on every ride in a view.
#[allow(dead_code)]
pub async fn assert_view_consistent(view: &RideView) {
    for ride in view.snapshot().await.rides() {
        assert!(
            ride.roster_is_consistent(),
            "Roster invariants violated for {}: {:?}",
            ride.id,
            ride.participants
        );
    }
}
