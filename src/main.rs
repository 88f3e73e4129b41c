// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Group Rides catalog probe
//!
//! Connects to the configured ride store, runs one availability load and logs
//! what a catalog page would show: the mode, the ride count and the map
//! viewport.

use group_rides::{
    config::Config,
    db::FirestoreRideStore,
    logging::init_logging,
    services::{filter, DifficultyFilter, MapState},
    AppState,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = Config::from_env()?;
    tracing::info!(project = %config.gcp_project_id, "Starting Group Rides probe");

    let store = FirestoreRideStore::new(&config).await?;
    let state = AppState::new(config, Arc::new(store))?;

    let view = state.availability.load().await?;
    let collection = view.snapshot().await;
    let visible = filter(&collection, "", DifficultyFilter::All);
    let map = MapState::from_rides(&visible, None, collection.read_only(), &state.config);

    tracing::info!(
        mode = view.mode().await.as_str(),
        rides = collection.len(),
        read_only = collection.read_only(),
        viewport = ?map.viewport,
        "Catalog loaded"
    );

    Ok(())
}
