// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Catalog search/difficulty filtering and the per-ride action surface.
//!
//! Both are pure functions over a collection snapshot and are safe to
//! recompute on every keystroke.

use crate::error::ValidationError;
use crate::models::{Difficulty, Ride, RideCollection, User};
use serde::Serialize;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Difficulty selector: everything, or one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DifficultyFilter {
    #[default]
    All,
    Only(Difficulty),
}

impl DifficultyFilter {
    pub fn matches(&self, difficulty: Difficulty) -> bool {
        match self {
            DifficultyFilter::All => true,
            DifficultyFilter::Only(wanted) => *wanted == difficulty,
        }
    }
}

impl FromStr for DifficultyFilter {
    type Err = ValidationError;

    /// Parses the selector values `"all"`, `"Easy"`, `"Moderate"`, `"Hard"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(DifficultyFilter::All);
        }
        s.parse().map(DifficultyFilter::Only)
    }
}

/// Visible subset of `collection`, in collection order.
///
/// A ride is visible when the query is a case-insensitive substring of its
/// title, start location or description, and its difficulty passes
/// `difficulty`. An empty query matches every ride.
pub fn filter<'a>(
    collection: &'a RideCollection,
    query: &str,
    difficulty: DifficultyFilter,
) -> Vec<&'a Ride> {
    let needle = query.to_lowercase();

    collection
        .rides()
        .iter()
        .filter(|ride| difficulty.matches(ride.difficulty))
        .filter(|ride| needle.is_empty() || text_matches(ride, &needle))
        .collect()
}

fn text_matches(ride: &Ride, needle: &str) -> bool {
    [&ride.title, &ride.start_location, &ride.description]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Action offered for a ride, shared by the list and map views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum RideAffordance {
    /// Nobody signed in
    SignInRequired,
    /// The viewer organizes this ride
    YourRide,
    /// Demo mode: join/leave disabled
    DemoMode,
    Leave,
    Join,
    /// Not a participant and no seats left
    Full,
}

impl RideAffordance {
    pub fn for_ride(ride: &Ride, user: Option<&User>, read_only: bool) -> Self {
        let Some(user) = user else {
            return RideAffordance::SignInRequired;
        };

        if ride.is_creator(&user.id) {
            RideAffordance::YourRide
        } else if read_only {
            RideAffordance::DemoMode
        } else if ride.has_participant(&user.id) {
            RideAffordance::Leave
        } else if ride.is_full() {
            RideAffordance::Full
        } else {
            RideAffordance::Join
        }
    }

    /// Whether the action button is enabled.
    pub fn is_actionable(&self) -> bool {
        matches!(self, RideAffordance::Join | RideAffordance::Leave)
    }

    /// Button or badge label.
    pub fn label(&self) -> &'static str {
        match self {
            RideAffordance::SignInRequired => "Sign In",
            RideAffordance::YourRide => "Your Ride",
            RideAffordance::DemoMode => "Demo Mode",
            RideAffordance::Leave => "Leave Ride",
            RideAffordance::Join => "Join Ride",
            RideAffordance::Full => "Full",
        }
    }
}
