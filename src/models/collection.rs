// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The working set of rides held by a catalog view.

use crate::models::Ride;

/// Ordered rides (newest first) plus the read-only flag set in demo mode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RideCollection {
    rides: Vec<Ride>,
    read_only: bool,
}

impl RideCollection {
    /// Collection backed by the live store.
    pub fn live(rides: Vec<Ride>) -> Self {
        Self {
            rides,
            read_only: false,
        }
    }

    /// Collection backed by the bundled sample rides; never mutated.
    pub fn fallback(rides: Vec<Ride>) -> Self {
        Self {
            rides,
            read_only: true,
        }
    }

    pub fn rides(&self) -> &[Ride] {
        &self.rides
    }

    pub fn read_only(&self) -> bool {
        self.read_only
    }

    pub fn len(&self) -> usize {
        self.rides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rides.is_empty()
    }

    pub fn get(&self, ride_id: &str) -> Option<&Ride> {
        self.rides.iter().find(|r| r.id == ride_id)
    }

    /// Replace the ride with the same ID in place, keeping its position.
    ///
    /// Returns `false` if no ride with that ID exists.
    pub(crate) fn replace(&mut self, ride: Ride) -> bool {
        match self.rides.iter_mut().find(|r| r.id == ride.id) {
            Some(slot) => {
                *slot = ride;
                true
            }
            None => false,
        }
    }

    /// Insert a newly created ride at the head (newest first).
    pub(crate) fn insert_newest(&mut self, ride: Ride) {
        self.rides.insert(0, ride);
    }
}
