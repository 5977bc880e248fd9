//! Runtime configuration
//!
//! Where the monitor fetches from, how often, and where preferences live.
//! Loaded from an optional JSON file at startup; any field left out takes
//! its default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Monitor process configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    // --- Telemetry ---
    /// Realtime database REST URL of the feeder's telemetry object.
    /// Empty means "not configured".
    pub telemetry_url: String,
    /// Seconds between telemetry polls (5–3600)
    pub poll_interval_secs: u64,

    // --- Weather ---
    /// Base URL of the weather provider
    pub weather_endpoint: String,
    /// Provider API key; empty disables weather polling
    pub weather_api_key: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Seconds between weather fetches; rounded up to whole poll ticks
    pub weather_interval_secs: u64,

    // --- Network ---
    /// Per-request timeout for every HTTP call (1–120 s)
    pub request_timeout_secs: u64,

    // --- Storage ---
    /// JSON file holding the alert preferences
    pub preferences_path: PathBuf,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            telemetry_url: String::new(),
            poll_interval_secs: 60, // 1/min

            weather_endpoint: String::from("https://api.weatherapi.com/v1"),
            weather_api_key: String::new(),
            latitude: 37.7749,
            longitude: -122.4194,
            weather_interval_secs: 1800, // 30 min

            request_timeout_secs: 10,

            preferences_path: PathBuf::from("ornimetrics-preferences.json"),
        }
    }
}

impl MonitorConfig {
    /// Read a JSON config file.  Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            warn!("MonitorConfig: read {} failed: {}", path.display(), e);
            Error::Config("config file unreadable")
        })?;
        let config: Self = serde_json::from_slice(&bytes).map_err(|e| {
            warn!("MonitorConfig: parse {} failed: {}", path.display(), e);
            Error::Config("config file is not valid JSON")
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Range-check every field.
    pub fn validate(&self) -> Result<()> {
        if !(5..=3600).contains(&self.poll_interval_secs) {
            return Err(Error::Config("poll_interval_secs must be 5–3600"));
        }
        if !(1..=120).contains(&self.request_timeout_secs) {
            return Err(Error::Config("request_timeout_secs must be 1–120"));
        }
        if self.request_timeout_secs >= self.poll_interval_secs {
            return Err(Error::Config("request_timeout_secs must be shorter than the poll interval"));
        }
        if self.weather_interval_secs < self.poll_interval_secs {
            return Err(Error::Config("weather_interval_secs must be at least poll_interval_secs"));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(Error::Config("latitude must be -90–90"));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(Error::Config("longitude must be -180–180"));
        }
        if !self.telemetry_url.is_empty() && !self.telemetry_url.starts_with("http") {
            return Err(Error::Config("telemetry_url must be an http(s) URL"));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Weather is fetched once every this many telemetry ticks.
    pub fn weather_every_ticks(&self) -> u32 {
        let ticks = self.weather_interval_secs.div_ceil(self.poll_interval_secs.max(1));
        u32::try_from(ticks.max(1)).unwrap_or(u32::MAX)
    }

    pub fn weather_enabled(&self) -> bool {
        !self.weather_api_key.is_empty()
    }
}
