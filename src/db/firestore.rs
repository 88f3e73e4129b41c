// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore-backed ride store.
//!
//! Rides live in a single collection keyed by ride ID. Roster writes run in a
//! transaction that re-reads the ride through the transaction and rejects the
//! write if its roster no longer matches the one the change was computed
//! from. A competing commit on the same ride aborts the transaction, which is
//! also reported as a conflict.

use crate::config::Config;
use crate::db::{RideStore, RosterWrite};
use crate::error::StoreError;
use crate::models::Ride;
use async_trait::async_trait;

/// Firestore ride store client.
#[derive(Clone)]
pub struct FirestoreRideStore {
    client: Option<firestore::FirestoreDb>,
    collection: String,
}

fn store_error(context: &str, err: impl std::fmt::Display) -> StoreError {
    StoreError::from_backend_message(format!("{}: {}", context, err))
}

/// Commit failures caused by a concurrent writer are conflicts, not outages.
fn commit_error(ride_id: &str, err: impl std::fmt::Display) -> StoreError {
    let message = err.to_string();
    let lower = message.to_lowercase();
    if lower.contains("aborted") || lower.contains("contention") {
        tracing::warn!(ride_id, error = %message, "Roster transaction aborted by a concurrent write");
        StoreError::Conflict(ride_id.to_string())
    } else {
        store_error("Roster transaction commit failed", message)
    }
}

impl FirestoreRideStore {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(config: &Config) -> Result<Self, StoreError> {
        let project_id = config.gcp_project_id.as_str();

        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(config).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| store_error("Failed to connect to Firestore", e))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
            collection: config.rides_collection.clone(),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(config: &Config) -> Result<Self, StoreError> {
        let project_id = config.gcp_project_id.as_str();
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| store_error("Failed to connect to Firestore Emulator", e))?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
            collection: config.rides_collection.clone(),
        })
    }

    /// Create an offline client for testing.
    ///
    /// All operations fail with [`StoreError::Unavailable`].
    pub fn new_mock() -> Self {
        Self {
            client: None,
            collection: crate::db::collections::RIDES.to_string(),
        }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, StoreError> {
        self.client.as_ref().ok_or_else(|| {
            StoreError::Unavailable("Database not connected (offline mode)".to_string())
        })
    }

    /// Get a single ride by ID.
    pub async fn get_ride(&self, ride_id: &str) -> Result<Option<Ride>, StoreError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(self.collection.as_str())
            .obj()
            .one(ride_id)
            .await
            .map_err(|e| store_error("Failed to read ride", e))
    }
}

#[async_trait]
impl RideStore for FirestoreRideStore {
    async fn list_rides(&self) -> Result<Vec<Ride>, StoreError> {
        let rides: Vec<Ride> = self
            .get_client()?
            .fluent()
            .select()
            .from(self.collection.as_str())
            .order_by([("created_at", firestore::FirestoreQueryDirection::Descending)])
            .obj()
            .query()
            .await
            .map_err(|e| store_error("Failed to list rides", e))?;

        tracing::debug!(count = rides.len(), "Listed rides from Firestore");
        Ok(rides)
    }

    async fn create_ride(&self, ride: &Ride) -> Result<(), StoreError> {
        let _: () = self
            .get_client()?
            .fluent()
            .insert()
            .into(self.collection.as_str())
            .document_id(&ride.id)
            .object(ride)
            .execute()
            .await
            .map_err(|e| store_error("Failed to create ride", e))?;
        Ok(())
    }

    async fn update_roster(&self, ride_id: &str, write: &RosterWrite) -> Result<Ride, StoreError> {
        let client = self.get_client()?;

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| store_error("Failed to begin transaction", e))?;

        // Read through the transaction so the document is registered for
        // conflict detection; a competing commit then aborts this one.
        let tx_client = client.clone_with_consistency_selector(
            firestore::FirestoreConsistencySelector::Transaction(
                transaction.transaction_id().clone(),
            ),
        );
        let stored: Result<Option<Ride>, _> = tx_client
            .fluent()
            .select()
            .by_id_in(self.collection.as_str())
            .obj()
            .one(ride_id)
            .await;

        let mut ride = match stored {
            Ok(Some(ride)) => ride,
            Ok(None) => {
                let _ = transaction.rollback().await;
                return Err(StoreError::NotFound(ride_id.to_string()));
            }
            Err(e) => {
                let _ = transaction.rollback().await;
                return Err(store_error("Failed to read ride in transaction", e));
            }
        };

        if ride.participants != write.expected_participants {
            tracing::warn!(ride_id, "Stored roster changed, rejecting roster write");
            let _ = transaction.rollback().await;
            return Err(StoreError::Conflict(ride_id.to_string()));
        }

        write.apply_to(&mut ride);

        client
            .fluent()
            .update()
            .fields(firestore::paths!(Ride::{participants, current_participants, updated_at}))
            .in_col(self.collection.as_str())
            .document_id(ride_id)
            .object(&ride)
            .add_to_transaction(&mut transaction)
            .map_err(|e| store_error("Failed to add roster write to transaction", e))?;

        transaction
            .commit()
            .await
            .map_err(|e| commit_error(ride_id, e))?;

        tracing::info!(
            ride_id,
            participants = ride.current_participants,
            "Roster written to Firestore"
        );

        Ok(ride)
    }
}
