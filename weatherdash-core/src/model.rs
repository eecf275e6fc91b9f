use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{error::FetchError, units::Units};

/// Longest accepted place name, in characters.
pub const MAX_PLACE_LEN: usize = 100;

/// Location to look up: a free-text place name or a coordinate pair.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Place(String),
    Coordinates { lat: f64, lon: f64 },
}

impl Query {
    pub fn place(name: impl Into<String>) -> Self {
        Query::Place(name.into())
    }

    pub fn coordinates(lat: f64, lon: f64) -> Self {
        Query::Coordinates { lat, lon }
    }

    /// Cache key for place queries; coordinate lookups are not cached.
    pub fn cache_key(&self) -> Option<String> {
        match self {
            Query::Place(name) => Some(cache_key(name)),
            Query::Coordinates { .. } => None,
        }
    }

    /// Check the query before any network access, returning the reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Query::Place(name) => validate_place(name),
            Query::Coordinates { lat, lon } => validate_coordinates(*lat, *lon),
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Place(name) => f.write_str(name.trim()),
            Query::Coordinates { lat, lon } => write!(f, "{lat:.4},{lon:.4}"),
        }
    }
}

/// Normalize a place name into its cache key.
pub fn cache_key(place: &str) -> String {
    place.trim().to_lowercase()
}

fn is_allowed_place_char(c: char) -> bool {
    c.is_ascii_alphabetic()
        || c.is_whitespace()
        || matches!(c, '-' | '\'' | ',' | '.')
        || ('\u{00C0}'..='\u{017F}').contains(&c)
}

fn validate_place(name: &str) -> Result<(), String> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err("place name is empty".to_string());
    }

    if trimmed.chars().count() > MAX_PLACE_LEN {
        return Err(format!("place name is longer than {MAX_PLACE_LEN} characters"));
    }

    if let Some(bad) = trimmed.chars().find(|c| !is_allowed_place_char(*c)) {
        return Err(format!("place name contains disallowed character {bad:?}"));
    }

    Ok(())
}

fn validate_coordinates(lat: f64, lon: f64) -> Result<(), String> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(format!("latitude {lat} is outside [-90, 90]"));
    }
    if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
        return Err(format!("longitude {lon} is outside [-180, 180]"));
    }
    Ok(())
}

/// Primary weather condition reported for a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub id: u16,
    pub description: String,
    /// Provider icon id, e.g. "10d".
    pub icon: String,
}

/// Normalized, validated weather snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub location_name: String,
    pub country: Option<String>,
    pub condition: Condition,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: f64,
    pub wind_speed: f64,
    pub visibility_m: Option<u32>,
    pub cloudiness_pct: u8,
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
    /// Unit system the measurements are expressed in.
    pub units: Units,
}

impl WeatherRecord {
    /// "London, GB", or just the name when the country is unknown.
    pub fn display_name(&self) -> String {
        match &self.country {
            Some(country) if !country.is_empty() => format!("{}, {country}", self.location_name),
            _ => self.location_name.clone(),
        }
    }
}

/// Result of a single pipeline call.
pub type FetchOutcome = Result<WeatherRecord, FetchError>;
