//! Backing store layer (Firestore, in-memory).

pub mod firestore;
pub mod memory;

pub use self::firestore::FirestoreRideStore;
pub use memory::MemoryRideStore;

use crate::error::StoreError;
use crate::models::Ride;
use async_trait::async_trait;

/// Collection names as constants.
pub mod collections {
    pub const RIDES: &str = "rides";
}

/// Roster fields written by a join or leave.
///
/// `expected_participants` is the roster the change was computed from; the
/// store must reject the write with [`StoreError::Conflict`] when the stored
/// roster differs.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterWrite {
    pub expected_participants: Vec<String>,
    pub participants: Vec<String>,
    pub current_participants: u32,
    pub updated_at: String,
}

impl RosterWrite {
    /// Build the write that turns `before` into `after`.
    pub fn between(before: &Ride, after: &Ride) -> Self {
        Self {
            expected_participants: before.participants.clone(),
            participants: after.participants.clone(),
            current_participants: after.current_participants,
            updated_at: after.updated_at.clone(),
        }
    }

    /// Apply these roster fields onto a stored ride.
    pub fn apply_to(&self, ride: &mut Ride) {
        ride.participants = self.participants.clone();
        ride.current_participants = self.current_participants;
        ride.updated_at = self.updated_at.clone();
    }
}

/// Ride persistence collaborator.
///
/// Timeouts are the store's responsibility and surface as [`StoreError`].
#[async_trait]
pub trait RideStore: Send + Sync {
    /// All rides, newest `created_at` first.
    ///
    /// Fails with [`StoreError::NotProvisioned`] when the backing database
    /// does not exist for this deployment.
    async fn list_rides(&self) -> Result<Vec<Ride>, StoreError>;

    /// Persist a newly created ride.
    async fn create_ride(&self, ride: &Ride) -> Result<(), StoreError>;

    /// Write only the roster fields of a ride and return the stored result.
    async fn update_roster(&self, ride_id: &str, write: &RosterWrite) -> Result<Ride, StoreError>;
}
