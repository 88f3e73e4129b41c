// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Roster engine: the only path that changes ride membership.
//!
//! Every join/leave follows the same steps:
//! 1. Reject immediately if the view is in read-only demo mode
//! 2. Acquire the per-ride lock (one in-flight mutation per ride)
//! 3. Re-read the ride from the view (a previous holder may have changed it)
//! 4. Compute the new roster and write it to the store, guarded by the old one
//! 5. Apply the store's result to the view, unless the view was closed or
//!    reloaded while the write was in flight

use crate::db::{RideStore, RosterWrite};
use crate::error::{RosterError, ValidationError};
use crate::models::{Ride, RideCollection, RideInput, RosterChange, User};
use crate::services::availability::AvailabilityMode;
use crate::time_utils::now_rfc3339;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Per-ride mutation locks, keyed by ride ID.
pub type RideLocks = Arc<DashMap<String, Arc<Mutex<()>>>>;

/// Shared handle to the ride collection shown by one catalog page.
///
/// Cloning shares the same underlying state. Readers take snapshots; only the
/// roster engine and the availability controller write.
#[derive(Clone, Default)]
pub struct RideView {
    inner: Arc<RwLock<ViewState>>,
}

#[derive(Default)]
struct ViewState {
    collection: RideCollection,
    mode: AvailabilityMode,
    /// Bumped on every completed load
    epoch: u64,
    closed: bool,
}

impl RideView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current collection.
    pub async fn snapshot(&self) -> RideCollection {
        self.inner.read().await.collection.clone()
    }

    pub async fn mode(&self) -> AvailabilityMode {
        self.inner.read().await.mode
    }

    pub async fn is_read_only(&self) -> bool {
        self.inner.read().await.collection.read_only()
    }

    pub async fn epoch(&self) -> u64 {
        self.inner.read().await.epoch
    }

    /// Mark the view as gone (page navigated away).
    ///
    /// Results of mutations still in flight are discarded.
    pub async fn close(&self) {
        self.inner.write().await.closed = true;
    }

    pub async fn is_closed(&self) -> bool {
        self.inner.read().await.closed
    }

    /// Replace the contents after a completed load.
    pub(crate) async fn finish_load(&self, collection: RideCollection, mode: AvailabilityMode) {
        let mut state = self.inner.write().await;
        state.collection = collection;
        state.mode = mode;
        state.epoch += 1;
    }

    /// Current epoch, read-only flag and ride, read under one lock.
    async fn read_ride(&self, ride_id: &str) -> (u64, bool, Option<Ride>) {
        let state = self.inner.read().await;
        (
            state.epoch,
            state.collection.read_only(),
            state.collection.get(ride_id).cloned(),
        )
    }

    /// Run `apply` only if the view is open and still on `epoch`.
    async fn apply_if_current<F>(&self, epoch: u64, apply: F) -> bool
    where
        F: FnOnce(&mut RideCollection),
    {
        let mut state = self.inner.write().await;
        if state.closed || state.epoch != epoch {
            return false;
        }
        apply(&mut state.collection);
        true
    }
}

/// Roster engine.
///
/// The store write happens before any local change; a rejected or failed
/// write leaves the view exactly as it was.
#[derive(Clone)]
pub struct RosterEngine {
    store: Arc<dyn RideStore>,
    ride_locks: RideLocks,
    default_point: (f64, f64),
}

impl RosterEngine {
    /// `default_point` is the (latitude, longitude) used for rides created
    /// without coordinates.
    pub fn new(store: Arc<dyn RideStore>, default_point: (f64, f64)) -> Self {
        Self {
            store,
            ride_locks: Arc::new(DashMap::new()),
            default_point,
        }
    }

    /// Add `user` to a ride. Returns the ride as persisted by the store.
    pub async fn join(
        &self,
        view: &RideView,
        ride_id: &str,
        user: &User,
    ) -> Result<Ride, RosterError> {
        self.change_roster(view, ride_id, &user.id, RosterChange::Join)
            .await
    }

    /// Remove `user` from a ride. The creator can never leave.
    pub async fn leave(
        &self,
        view: &RideView,
        ride_id: &str,
        user: &User,
    ) -> Result<Ride, RosterError> {
        self.change_roster(view, ride_id, &user.id, RosterChange::Leave)
            .await
    }

    /// Whether a join/leave for this ride is currently in flight.
    ///
    /// Lets presentation code disable the triggering control.
    pub fn is_pending(&self, ride_id: &str) -> bool {
        self.ride_locks
            .get(ride_id)
            .is_some_and(|lock| lock.try_lock().is_err())
    }

    async fn change_roster(
        &self,
        view: &RideView,
        ride_id: &str,
        identity: &str,
        change: RosterChange,
    ) -> Result<Ride, RosterError> {
        // Fail fast: demo mode never reaches the store or the lock
        if view.is_read_only().await {
            tracing::debug!(ride_id, op = change.as_str(), "Rejected in read-only mode");
            return Err(RosterError::ReadOnlyMode);
        }

        let lock = self
            .ride_locks
            .entry(ride_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let result = {
            let _guard = lock.lock().await;
            self.change_locked(view, ride_id, identity, change).await
        };

        // Drop the entry once no other request holds or waits on it.
        // Removal runs under the map's shard lock, so no new clone can race it.
        drop(lock);
        self.ride_locks
            .remove_if(ride_id, |_, lock| Arc::strong_count(lock) == 1);

        result
    }

    /// Body of a roster change; the caller holds the ride's lock.
    async fn change_locked(
        &self,
        view: &RideView,
        ride_id: &str,
        identity: &str,
        change: RosterChange,
    ) -> Result<Ride, RosterError> {
        // Re-read after acquiring the lock; the previous holder may have
        // changed the roster (or a reload may have switched modes).
        let (epoch, read_only, current) = view.read_ride(ride_id).await;
        if read_only {
            return Err(RosterError::ReadOnlyMode);
        }
        let current = current.ok_or_else(|| RosterError::RideNotFound(ride_id.to_string()))?;

        if !current.roster_is_consistent() {
            tracing::warn!(ride_id, "Ride roster is inconsistent, recomputing from participants");
        }

        let updated = current.apply_participant_change(identity, change, &now_rfc3339())?;
        let write = RosterWrite::between(&current, &updated);

        let persisted = self
            .store
            .update_roster(ride_id, &write)
            .await
            .map_err(|e| {
                tracing::warn!(
                    ride_id,
                    user_id = identity,
                    op = change.as_str(),
                    error = %e,
                    "Roster write failed, keeping last confirmed state"
                );
                RosterError::from(e)
            })?;

        let applied = view
            .apply_if_current(epoch, |collection| {
                collection.replace(persisted.clone());
            })
            .await;

        if applied {
            tracing::info!(
                ride_id,
                user_id = identity,
                op = change.as_str(),
                participants = persisted.current_participants,
                "Roster updated"
            );
        } else {
            tracing::debug!(
                ride_id,
                op = change.as_str(),
                "View closed or reloaded during write, result discarded"
            );
        }

        Ok(persisted)
    }

    /// Validate and persist a new ride organized by `creator`, then show it
    /// first in the view.
    pub async fn create_ride(
        &self,
        view: &RideView,
        input: &RideInput,
        creator: &User,
    ) -> Result<Ride, CreateRideError> {
        if view.is_read_only().await {
            return Err(RosterError::ReadOnlyMode.into());
        }

        let ride = Ride::validate_creation(input, creator, self.default_point)?;
        let epoch = view.epoch().await;

        self.store
            .create_ride(&ride)
            .await
            .map_err(RosterError::PersistenceFailure)?;

        let applied = view
            .apply_if_current(epoch, |collection| collection.insert_newest(ride.clone()))
            .await;

        tracing::info!(
            ride_id = %ride.id,
            user_id = %creator.id,
            applied,
            "Ride created"
        );

        Ok(ride)
    }
}

/// Ride creation failures: bad input or a rejected write.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CreateRideError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Roster(#[from] RosterError),
}

impl From<CreateRideError> for crate::error::AppError {
    fn from(err: CreateRideError) -> Self {
        match err {
            CreateRideError::Validation(e) => e.into(),
            CreateRideError::Roster(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryRideStore;
    use std::time::Duration;

    fn loop_ride(creator: &User) -> Ride {
        let input = RideInput {
            title: "Loop".to_string(),
            description: "Flat loop".to_string(),
            start_location: "Ferry Building".to_string(),
            date: "2026-11-21".to_string(),
            time: "08:00".to_string(),
            difficulty: "Easy".to_string(),
            distance_km: 25,
            max_participants: 5,
            ..Default::default()
        };
        Ride::validate_creation(&input, creator, (37.7749, -122.4194)).unwrap()
    }

    #[tokio::test]
    async fn test_idle_ride_locks_are_released() {
        let alice = User::new("alice", "alice@example.com");
        let bob = User::new("bob", "bob@example.com");
        let carol = User::new("carol", "carol@example.com");
        let ride = loop_ride(&alice);
        let ride_id = ride.id.clone();

        let store = Arc::new(MemoryRideStore::with_rides(vec![ride.clone()]));
        store.set_write_delay(Duration::from_millis(20)).await;
        let view = RideView::new();
        view.finish_load(RideCollection::live(vec![ride]), AvailabilityMode::Live)
            .await;
        let engine = RosterEngine::new(store, (37.7749, -122.4194));

        let (first, second) = tokio::join!(
            engine.join(&view, &ride_id, &bob),
            engine.join(&view, &ride_id, &carol)
        );
        first.unwrap();
        second.unwrap();
        assert!(engine.ride_locks.is_empty());

        // Rejected changes release the entry too
        engine.join(&view, &ride_id, &bob).await.unwrap_err();
        assert!(engine.ride_locks.is_empty());
        assert!(!engine.is_pending(&ride_id));
    }
}
