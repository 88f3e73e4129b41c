// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Group Rides: discover, create and join group cycling rides
//!
//! This crate provides the ride roster and availability engine behind a
//! group-ride catalog: membership changes that stay consistent under
//! concurrent use, a read-only demo mode when the ride store is not yet
//! provisioned, search/difficulty filtering, and map state for the
//! visible rides.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod time_utils;

use config::Config;
use db::RideStore;
use services::{AvailabilityController, RosterEngine};
use std::sync::Arc;

/// Shared engine state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn RideStore>,
    pub availability: AvailabilityController,
    pub roster: RosterEngine,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn RideStore>) -> error::Result<Self> {
        let availability = AvailabilityController::new(store.clone())
            .map_err(|e| anyhow::anyhow!("Failed to parse sample rides: {}", e))?;
        let roster = RosterEngine::new(store.clone(), config.default_point());

        Ok(Self {
            config,
            store,
            availability,
            roster,
        })
    }
}
