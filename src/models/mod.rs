// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the ride catalog.

pub mod collection;
pub mod ride;
pub mod user;

pub use collection::RideCollection;
pub use ride::{Difficulty, Ride, RideInput, RosterChange};
pub use user::User;
