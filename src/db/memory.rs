// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process ride store for tests and local embedding.
//!
//! Supports fault injection (missing database, failing reads or writes,
//! write latency) and counts calls so tests can assert what reached the store.

use crate::db::{RideStore, RosterWrite};
use crate::error::StoreError;
use crate::models::Ride;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

pub struct MemoryRideStore {
    rides: Mutex<Vec<Ride>>,
    provisioned: AtomicBool,
    next_list_error: Mutex<Option<StoreError>>,
    next_write_error: Mutex<Option<StoreError>>,
    write_delay: Mutex<Duration>,
    list_calls: AtomicU64,
    create_calls: AtomicU64,
    update_calls: AtomicU64,
}

impl Default for MemoryRideStore {
    fn default() -> Self {
        Self {
            rides: Mutex::new(Vec::new()),
            provisioned: AtomicBool::new(true),
            next_list_error: Mutex::new(None),
            next_write_error: Mutex::new(None),
            write_delay: Mutex::new(Duration::ZERO),
            list_calls: AtomicU64::new(0),
            create_calls: AtomicU64::new(0),
            update_calls: AtomicU64::new(0),
        }
    }
}

impl MemoryRideStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `rides` (any order).
    pub fn with_rides(rides: Vec<Ride>) -> Self {
        Self {
            rides: Mutex::new(rides),
            ..Self::default()
        }
    }

    /// Store whose database was never created.
    pub fn unprovisioned() -> Self {
        let store = Self::default();
        store.provisioned.store(false, Ordering::SeqCst);
        store
    }

    pub fn set_provisioned(&self, provisioned: bool) {
        self.provisioned.store(provisioned, Ordering::SeqCst);
    }

    /// Fail the next `list_rides` call with `err`.
    pub async fn fail_next_list(&self, err: StoreError) {
        *self.next_list_error.lock().await = Some(err);
    }

    /// Fail the next `create_ride` or `update_roster` call with `err`.
    pub async fn fail_next_write(&self, err: StoreError) {
        *self.next_write_error.lock().await = Some(err);
    }

    /// Delay every write by `delay` before it is applied.
    pub async fn set_write_delay(&self, delay: Duration) {
        *self.write_delay.lock().await = delay;
    }

    /// Overwrite a stored ride directly, bypassing roster checks.
    ///
    /// Simulates a write made by another client.
    pub async fn put_ride(&self, ride: Ride) {
        let mut rides = self.rides.lock().await;
        match rides.iter_mut().find(|r| r.id == ride.id) {
            Some(slot) => *slot = ride,
            None => rides.push(ride),
        }
    }

    pub async fn stored_ride(&self, ride_id: &str) -> Option<Ride> {
        self.rides
            .lock()
            .await
            .iter()
            .find(|r| r.id == ride_id)
            .cloned()
    }

    pub fn list_calls(&self) -> u64 {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> u64 {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> u64 {
        self.update_calls.load(Ordering::SeqCst)
    }

    fn check_provisioned(&self) -> Result<(), StoreError> {
        if self.provisioned.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::NotProvisioned(
                "Database for project rides-local not found".to_string(),
            ))
        }
    }

    async fn before_write(&self) -> Result<(), StoreError> {
        let delay = *self.write_delay.lock().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = self.next_write_error.lock().await.take() {
            return Err(err);
        }
        self.check_provisioned()
    }
}

#[async_trait]
impl RideStore for MemoryRideStore {
    async fn list_rides(&self) -> Result<Vec<Ride>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.next_list_error.lock().await.take() {
            return Err(err);
        }
        self.check_provisioned()?;

        let mut rides = self.rides.lock().await.clone();
        // Stable sort keeps insertion order (newest first) for equal timestamps
        rides.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rides)
    }

    async fn create_ride(&self, ride: &Ride) -> Result<(), StoreError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.before_write().await?;

        let mut rides = self.rides.lock().await;
        if rides.iter().any(|r| r.id == ride.id) {
            return Err(StoreError::Backend(format!(
                "Ride {} already exists",
                ride.id
            )));
        }
        rides.insert(0, ride.clone());
        Ok(())
    }

    async fn update_roster(&self, ride_id: &str, write: &RosterWrite) -> Result<Ride, StoreError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.before_write().await?;

        let mut rides = self.rides.lock().await;
        let ride = rides
            .iter_mut()
            .find(|r| r.id == ride_id)
            .ok_or_else(|| StoreError::NotFound(ride_id.to_string()))?;

        if ride.participants != write.expected_participants {
            return Err(StoreError::Conflict(ride_id.to_string()));
        }

        write.apply_to(ride);
        Ok(ride.clone())
    }
}
