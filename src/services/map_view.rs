// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Map state derived from the visible ride subset.

use crate::config::Config;
use crate::models::{Difficulty, Ride, User};
use crate::services::catalog::RideAffordance;
use geo::{BoundingRect, MultiPoint, Point, Rect};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};

/// How the map positions itself.
#[derive(Debug, Clone, PartialEq)]
pub enum MapViewport {
    /// Fit all markers, with padding in pixels
    FitBounds { bounds: Rect<f64>, padding_px: u32 },
    /// Nothing to show: default center and zoom
    Centered { center: Point<f64>, zoom: u8 },
}

/// One ride on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub ride_id: String,
    pub title: String,
    /// x = longitude, y = latitude
    pub position: Point<f64>,
    pub difficulty: Difficulty,
    pub color: &'static str,
    pub affordance: RideAffordance,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapState {
    pub viewport: MapViewport,
    pub markers: Vec<MapMarker>,
}

/// Marker color for a difficulty level.
pub fn marker_color(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "#10B981",
        Difficulty::Moderate => "#F59E0B",
        Difficulty::Hard => "#EF4444",
    }
}

fn ride_point(ride: &Ride) -> Point<f64> {
    Point::new(ride.start_longitude, ride.start_latitude)
}

impl MapState {
    /// Build map state for `visible` rides as seen by `user`.
    pub fn from_rides(
        visible: &[&Ride],
        user: Option<&User>,
        read_only: bool,
        config: &Config,
    ) -> Self {
        let markers: Vec<MapMarker> = visible
            .iter()
            .map(|ride| MapMarker {
                ride_id: ride.id.clone(),
                title: ride.title.clone(),
                position: ride_point(ride),
                difficulty: ride.difficulty,
                color: marker_color(ride.difficulty),
                affordance: RideAffordance::for_ride(ride, user, read_only),
            })
            .collect();

        let bounds = MultiPoint::new(markers.iter().map(|m| m.position).collect()).bounding_rect();

        let viewport = match bounds {
            Some(bounds) => MapViewport::FitBounds {
                bounds,
                padding_px: config.map_fit_padding_px,
            },
            None => MapViewport::Centered {
                center: Point::new(config.default_longitude, config.default_latitude),
                zoom: config.map_default_zoom,
            },
        };

        Self { viewport, markers }
    }

    /// Markers as a GeoJSON FeatureCollection of points.
    pub fn to_geojson(&self) -> FeatureCollection {
        let features = self
            .markers
            .iter()
            .map(|marker| {
                let mut properties = JsonObject::new();
                properties.insert("ride_id".to_string(), marker.ride_id.clone().into());
                properties.insert("title".to_string(), marker.title.clone().into());
                properties.insert(
                    "difficulty".to_string(),
                    marker.difficulty.as_str().into(),
                );
                properties.insert("color".to_string(), marker.color.into());

                Feature {
                    bbox: None,
                    geometry: Some(Geometry::new(Value::Point(vec![
                        marker.position.x(),
                        marker.position.y(),
                    ]))),
                    id: Some(geojson::feature::Id::String(marker.ride_id.clone())),
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}
