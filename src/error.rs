// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error types for ride validation, roster changes and store access.

use crate::config::ConfigError;

/// Rejected ride-creation input. Surfaced only to the caller that submitted it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Unknown difficulty: {0} (expected Easy, Moderate or Hard)")]
    InvalidDifficulty(String),

    #[error("Distance must be at least 1 km")]
    InvalidDistance,

    #[error("Max participants must be between {min} and {max}, got {got}")]
    InvalidCapacity { min: u32, max: u32, got: u32 },

    #[error("Invalid date: {0} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Invalid time: {0} (expected HH:MM)")]
    InvalidTime(String),

    #[error("Coordinates out of range: {latitude}, {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("Invalid ride input: {0}")]
    Invalid(String),
}

/// Failures reported by a [`crate::db::RideStore`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// The storage backend for this deployment has not been created yet.
    #[error("Ride store is not provisioned: {0}")]
    NotProvisioned(String),

    #[error("Ride store unavailable: {0}")]
    Unavailable(String),

    #[error("Ride store timed out")]
    Timeout,

    /// The stored roster no longer matches the one the write was based on.
    #[error("Roster for ride {0} changed since it was read")]
    Conflict(String),

    #[error("Ride not found in store: {0}")]
    NotFound(String),

    #[error("Ride store error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Classify a raw backend error message.
    ///
    /// Only a missing database counts as `NotProvisioned`, matched on the
    /// wording Firestore uses for it ("The database ... does not exist") or
    /// the client-side "Database for project ... not found". Document paths
    /// also contain `/databases/`, so a bare "not found" is not enough.
    pub fn from_backend_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();
        let missing_database = mentions_in_order(&lower, "the database", "does not exist")
            || mentions_in_order(&lower, "database for project", "not found");

        if missing_database {
            StoreError::NotProvisioned(message)
        } else if lower.contains("deadline exceeded") || lower.contains("timed out") {
            StoreError::Timeout
        } else if lower.contains("unavailable") {
            StoreError::Unavailable(message)
        } else {
            StoreError::Backend(message)
        }
    }

    /// Whether this failure should degrade the catalog to the sample dataset.
    pub fn is_provisioning_unavailable(&self) -> bool {
        matches!(self, StoreError::NotProvisioned(_))
    }
}

fn mentions_in_order(haystack: &str, first: &str, then: &str) -> bool {
    haystack
        .find(first)
        .is_some_and(|at| haystack[at + first.len()..].contains(then))
}

/// Rejected join/leave/create requests.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RosterError {
    #[error("Ride {0} is full")]
    RosterFull(String),

    #[error("Already joined ride {0}")]
    AlreadyJoined(String),

    #[error("Not a participant of ride {0}")]
    NotAParticipant(String),

    #[error("The creator cannot leave ride {0}")]
    CreatorCannotLeave(String),

    #[error("Catalog is in read-only demo mode")]
    ReadOnlyMode,

    #[error("Ride not found: {0}")]
    RideNotFound(String),

    #[error("Ride {0} was changed by someone else")]
    RevisionConflict(String),

    #[error("Failed to save ride: {0}")]
    PersistenceFailure(StoreError),
}

impl RosterError {
    /// Explanation suitable for showing to the person who triggered the action.
    pub fn user_message(&self) -> &'static str {
        match self {
            RosterError::RosterFull(_) => "This ride is full.",
            RosterError::AlreadyJoined(_) => "You have already joined this ride.",
            RosterError::NotAParticipant(_) => "You are not part of this ride.",
            RosterError::CreatorCannotLeave(_) => "You organize this ride and cannot leave it.",
            RosterError::ReadOnlyMode => {
                "Showing sample rides while the database is being set up. Changes are disabled."
            }
            RosterError::RideNotFound(_) => "This ride no longer exists.",
            RosterError::RevisionConflict(_) => {
                "This ride was just updated by someone else. Refresh and try again."
            }
            RosterError::PersistenceFailure(_) => "Could not save your change. Please try again.",
        }
    }

    /// Rejections meaning the roster is already in the requested state.
    pub fn is_already_in_desired_state(&self) -> bool {
        matches!(
            self,
            RosterError::AlreadyJoined(_) | RosterError::NotAParticipant(_)
        )
    }
}

impl From<StoreError> for RosterError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(ride_id) => RosterError::RevisionConflict(ride_id),
            other => RosterError::PersistenceFailure(other),
        }
    }
}

/// Crate-level error.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Sign in required")]
    SignInRequired,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, AppError>;
