//! Weather conditions at the feeder location.
//!
//! Produced by a [`WeatherSource`](crate::app::ports::WeatherSource) and
//! consumed by [`evaluate_weather`](crate::rules::evaluate_weather).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Provider's condition text, e.g. "Light rain".
    pub condition: String,
    /// Relative humidity, 0–100.
    pub humidity: f64,
    pub is_raining: bool,
    pub is_snowing: bool,
    pub is_hailing: bool,
    pub temperature_c: Option<f64>,
    pub precipitation_mm: Option<f64>,
    pub location_name: String,
    pub observed_at: DateTime<Utc>,
}

impl WeatherSnapshot {
    /// A dry snapshot with the given condition and humidity.
    pub fn new(condition: impl Into<String>, humidity: f64, observed_at: DateTime<Utc>) -> Self {
        Self {
            condition: condition.into(),
            humidity,
            is_raining: false,
            is_snowing: false,
            is_hailing: false,
            temperature_c: None,
            precipitation_mm: None,
            location_name: String::from("Current Location"),
            observed_at,
        }
    }

    /// Rain, snow or hail is falling.
    pub fn has_precipitation(&self) -> bool {
        self.is_raining || self.is_snowing || self.is_hailing
    }
}

/// Classify snow from a provider's free-text condition.
pub fn condition_mentions_snow(condition: &str) -> bool {
    let c = condition.to_ascii_lowercase();
    c.contains("snow") || c.contains("sleet") || c.contains("blizzard")
}

/// Classify hail from a provider's free-text condition.
pub fn condition_mentions_hail(condition: &str) -> bool {
    let c = condition.to_ascii_lowercase();
    c.contains("hail") || c.contains("ice pellets")
}
