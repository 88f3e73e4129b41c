// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ride model, creation validation and roster transforms.

use crate::error::{RosterError, ValidationError};
use crate::models::User;
use crate::time_utils::{parse_clock_time, parse_ride_date};
use chrono::{NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Smallest allowed ride capacity (creator plus one).
pub const MIN_PARTICIPANTS: u32 = 2;
/// Largest allowed ride capacity.
pub const MAX_PARTICIPANTS: u32 = 50;

/// Ride difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Difficulty {
    Easy,
    Moderate,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Moderate, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Moderate => "Moderate",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidDifficulty(s.to_string()))
    }
}

/// A planned group ride, as stored in Firestore.
///
/// `current_participants` is derived from `participants` and only ever
/// changes together with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Ride {
    /// Ride ID (also used as document ID)
    pub id: String,
    pub title: String,
    pub description: String,
    /// Human-readable meeting point
    pub start_location: String,
    pub start_latitude: f64,
    pub start_longitude: f64,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub date: NaiveDate,
    /// Local clock time, no timezone
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub time: NaiveTime,
    pub difficulty: Difficulty,
    pub distance_km: u32,
    pub max_participants: u32,
    pub current_participants: u32,
    /// Identity of the organizer
    pub created_by: String,
    pub creator_name: String,
    pub creator_email: String,
    /// Participant identities, in join order
    pub participants: Vec<String>,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
    /// Last roster change (RFC 3339)
    pub updated_at: String,
}

/// Roster operation applied to a ride.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterChange {
    Join,
    Leave,
}

impl RosterChange {
    pub fn as_str(&self) -> &'static str {
        match self {
            RosterChange::Join => "join",
            RosterChange::Leave => "leave",
        }
    }
}

/// Raw ride-creation form input.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RideInput {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1))]
    pub start_location: String,
    pub start_latitude: Option<f64>,
    pub start_longitude: Option<f64>,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    /// "Easy", "Moderate" or "Hard"
    pub difficulty: String,
    #[validate(range(min = 1))]
    pub distance_km: u32,
    #[validate(range(min = 2, max = 50))]
    pub max_participants: u32,
}

/// Field order used to report the first failing field deterministically.
const CHECKED_FIELDS: [&str; 5] = [
    "title",
    "description",
    "start_location",
    "distance_km",
    "max_participants",
];

impl Ride {
    /// Validate creation input and build a new ride owned by `creator`.
    ///
    /// Missing or zero coordinates are replaced by `default_point`
    /// (latitude, longitude).
    pub fn validate_creation(
        input: &RideInput,
        creator: &User,
        default_point: (f64, f64),
    ) -> Result<Ride, ValidationError> {
        if let Err(errors) = input.validate() {
            let fields = errors.field_errors();
            let failed = CHECKED_FIELDS
                .into_iter()
                .find(|name| fields.contains_key(*name))
                .unwrap_or("input");
            return Err(match failed {
                "title" => ValidationError::MissingField("title"),
                "description" => ValidationError::MissingField("description"),
                "start_location" => ValidationError::MissingField("start_location"),
                "distance_km" => ValidationError::InvalidDistance,
                "max_participants" => ValidationError::InvalidCapacity {
                    min: MIN_PARTICIPANTS,
                    max: MAX_PARTICIPANTS,
                    got: input.max_participants,
                },
                _ => ValidationError::Invalid(errors.to_string()),
            });
        }

        let title = required(&input.title, "title")?;
        let description = required(&input.description, "description")?;
        let start_location = required(&input.start_location, "start_location")?;
        let difficulty: Difficulty = input.difficulty.trim().parse()?;

        let date = parse_ride_date(&input.date)
            .ok_or_else(|| ValidationError::InvalidDate(input.date.clone()))?;
        let time = parse_clock_time(&input.time)
            .ok_or_else(|| ValidationError::InvalidTime(input.time.clone()))?;

        let (start_latitude, start_longitude) = resolve_point(
            input.start_latitude,
            input.start_longitude,
            default_point,
        )?;

        let now = crate::time_utils::now_rfc3339();

        Ok(Ride {
            id: generate_ride_id(),
            title,
            description,
            start_location,
            start_latitude,
            start_longitude,
            date,
            time,
            difficulty,
            distance_km: input.distance_km,
            max_participants: input.max_participants,
            current_participants: 1,
            created_by: creator.id.clone(),
            creator_name: creator.creator_label().to_string(),
            creator_email: creator.email.clone(),
            participants: vec![creator.id.clone()],
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Apply a join or leave for `identity`, returning the changed ride.
    ///
    /// `self` is left untouched; on rejection nothing changes.
    pub fn apply_participant_change(
        &self,
        identity: &str,
        change: RosterChange,
        now: &str,
    ) -> Result<Ride, RosterError> {
        let mut participants = self.participants.clone();

        match change {
            RosterChange::Join => {
                if self.has_participant(identity) {
                    return Err(RosterError::AlreadyJoined(self.id.clone()));
                }
                if self.is_full() {
                    return Err(RosterError::RosterFull(self.id.clone()));
                }
                participants.push(identity.to_string());
            }
            RosterChange::Leave => {
                if self.created_by == identity {
                    return Err(RosterError::CreatorCannotLeave(self.id.clone()));
                }
                if !self.has_participant(identity) {
                    return Err(RosterError::NotAParticipant(self.id.clone()));
                }
                participants.retain(|p| p != identity);
            }
        }

        Ok(Ride {
            current_participants: participants.len() as u32,
            participants,
            updated_at: now.to_string(),
            ..self.clone()
        })
    }

    pub fn has_participant(&self, identity: &str) -> bool {
        self.participants.iter().any(|p| p == identity)
    }

    /// Capacity check based on the participant list, not the stored count.
    pub fn is_full(&self) -> bool {
        self.participants.len() as u32 >= self.max_participants
    }

    pub fn is_creator(&self, identity: &str) -> bool {
        self.created_by == identity
    }

    /// Check the roster invariants (count, creator membership, capacity,
    /// uniqueness).
    pub fn roster_is_consistent(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        let unique = self.participants.iter().all(|p| seen.insert(p.as_str()));

        unique
            && self.current_participants as usize == self.participants.len()
            && self.has_participant(&self.created_by)
            && self.participants.len() as u32 <= self.max_participants
    }
}

fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

/// Absent or zero coordinates fall back to the default point.
fn resolve_point(
    latitude: Option<f64>,
    longitude: Option<f64>,
    default_point: (f64, f64),
) -> Result<(f64, f64), ValidationError> {
    let latitude = latitude.filter(|v| *v != 0.0).unwrap_or(default_point.0);
    let longitude = longitude.filter(|v| *v != 0.0).unwrap_or(default_point.1);

    let in_range = latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude);
    if !in_range {
        return Err(ValidationError::InvalidCoordinates {
            latitude,
            longitude,
        });
    }
    Ok((latitude, longitude))
}

/// Generate a ride ID: `ride_<unix millis>_<9 random hex chars>`.
fn generate_ride_id() -> String {
    let random = uuid::Uuid::new_v4().simple().to_string();
    format!("ride_{}_{}", Utc::now().timestamp_millis(), &random[..9])
}
