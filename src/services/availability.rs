// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Live/fallback availability controller.
//!
//! Each load tries the live store first. If the store reports that its
//! database does not exist for this deployment, the view is filled with the
//! bundled sample rides and marked read-only. Any other store error is
//! returned as-is and the view keeps its previous contents and mode.

use crate::db::RideStore;
use crate::error::StoreError;
use crate::models::{Ride, RideCollection};
use crate::services::roster::RideView;
use serde::Serialize;
use std::sync::Arc;

/// Sample rides shown while the store is not provisioned.
const SAMPLE_RIDES_JSON: &str = include_str!("../../data/sample_rides.json");

/// Where the rides in a view came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AvailabilityMode {
    /// No load has completed yet
    #[default]
    Loading,
    /// Rides from the live store; mutations enabled
    Live,
    /// Bundled sample rides; read-only
    Fallback,
}

impl AvailabilityMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AvailabilityMode::Loading => "loading",
            AvailabilityMode::Live => "live",
            AvailabilityMode::Fallback => "fallback",
        }
    }
}

/// Parse the bundled sample dataset.
pub fn sample_rides() -> Result<Vec<Ride>, serde_json::Error> {
    serde_json::from_str(SAMPLE_RIDES_JSON)
}

/// Decides between the live store and the sample dataset.
#[derive(Clone)]
pub struct AvailabilityController {
    store: Arc<dyn RideStore>,
    fallback_rides: Vec<Ride>,
}

impl AvailabilityController {
    /// Create a controller using the bundled sample rides as fallback.
    pub fn new(store: Arc<dyn RideStore>) -> Result<Self, serde_json::Error> {
        Ok(Self::with_fallback(store, sample_rides()?))
    }

    pub fn with_fallback(store: Arc<dyn RideStore>, fallback_rides: Vec<Ride>) -> Self {
        Self {
            store,
            fallback_rides,
        }
    }

    /// Run a load cycle into a fresh view.
    pub async fn load(&self) -> Result<RideView, StoreError> {
        let view = RideView::new();
        self.reload(&view).await?;
        Ok(view)
    }

    /// Run a fresh load cycle into an existing view.
    ///
    /// Always re-attempts the live store, even if the view is currently in
    /// fallback mode. On success the view's epoch advances, so roster writes
    /// started against the previous contents are not applied to it.
    pub async fn reload(&self, view: &RideView) -> Result<AvailabilityMode, StoreError> {
        match self.store.list_rides().await {
            Ok(rides) => {
                let inconsistent = rides.iter().filter(|r| !r.roster_is_consistent()).count();
                if inconsistent > 0 {
                    tracing::warn!(inconsistent, "Store returned rides with inconsistent rosters");
                }

                tracing::info!(
                    mode = AvailabilityMode::Live.as_str(),
                    count = rides.len(),
                    "Rides loaded"
                );
                view.finish_load(RideCollection::live(rides), AvailabilityMode::Live)
                    .await;
                Ok(AvailabilityMode::Live)
            }
            Err(err) if err.is_provisioning_unavailable() => {
                tracing::warn!(
                    error = %err,
                    mode = AvailabilityMode::Fallback.as_str(),
                    count = self.fallback_rides.len(),
                    "Ride store not provisioned, showing sample rides"
                );
                view.finish_load(
                    RideCollection::fallback(self.fallback_rides.clone()),
                    AvailabilityMode::Fallback,
                )
                .await;
                Ok(AvailabilityMode::Fallback)
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to load rides");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_rides_parse_and_are_consistent() {
        let rides = sample_rides().expect("Bundled sample rides should parse");
        assert!(!rides.is_empty());
        for ride in &rides {
            assert!(ride.roster_is_consistent(), "Inconsistent sample ride {}", ride.id);
        }
    }

    #[test]
    fn test_sample_rides_are_newest_first() {
        let rides = sample_rides().unwrap();
        assert!(rides
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at));
    }
}
