//! Engine configuration loaded from environment variables.

use std::env;

/// Fallback point used for rides created without coordinates and as the
/// empty-map center (San Francisco).
pub const DEFAULT_LATITUDE: f64 = 37.7749;
pub const DEFAULT_LONGITUDE: f64 = -122.4194;

/// Engine configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// GCP project ID hosting the Firestore ride store
    pub gcp_project_id: String,
    /// Firestore collection holding ride documents
    pub rides_collection: String,
    /// Latitude substituted when a new ride has none
    pub default_latitude: f64,
    /// Longitude substituted when a new ride has none
    pub default_longitude: f64,
    /// Zoom level for an empty map
    pub map_default_zoom: u8,
    /// Padding (pixels) around fitted map bounds
    pub map_fit_padding_px: u32,
}

impl Config {
    /// Default config for tests and local embedding.
    pub fn test_default() -> Self {
        Self {
            gcp_project_id: "test-project".to_string(),
            rides_collection: crate::db::collections::RIDES.to_string(),
            default_latitude: DEFAULT_LATITUDE,
            default_longitude: DEFAULT_LONGITUDE,
            map_default_zoom: 12,
            map_fit_padding_px: 20,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Only `GCP_PROJECT_ID` is required; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let defaults = Self::test_default();

        Ok(Self {
            gcp_project_id: env::var("GCP_PROJECT_ID")
                .map_err(|_| ConfigError::Missing("GCP_PROJECT_ID"))?,
            rides_collection: env::var("RIDES_COLLECTION").unwrap_or(defaults.rides_collection),
            default_latitude: parse_var("DEFAULT_LATITUDE", defaults.default_latitude)?,
            default_longitude: parse_var("DEFAULT_LONGITUDE", defaults.default_longitude)?,
            map_default_zoom: parse_var("MAP_DEFAULT_ZOOM", defaults.map_default_zoom)?,
            map_fit_padding_px: parse_var("MAP_FIT_PADDING_PX", defaults.map_fit_padding_px)?,
        })
    }

    /// The configured fallback point as (latitude, longitude).
    pub fn default_point(&self) -> (f64, f64) {
        (self.default_latitude, self.default_longitude)
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}
