// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - ride catalog logic.

pub mod availability;
pub mod catalog;
pub mod identity;
pub mod map_view;
pub mod roster;

pub use availability::{AvailabilityController, AvailabilityMode};
pub use catalog::{filter, DifficultyFilter, RideAffordance};
pub use identity::{require_user, IdentityProvider, LocalIdentityProvider};
pub use map_view::{MapMarker, MapState, MapViewport};
pub use roster::{CreateRideError, RideView, RosterEngine};
