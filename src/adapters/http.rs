//! HTTP source adapters (host only).
//!
//! | Adapter                   | Implements        | Endpoint                                  |
//! |---------------------------|-------------------|-------------------------------------------|
//! | [`FirebaseTelemetrySource`] | TelemetrySource | Realtime Database REST `GET <url>.json`   |
//! | [`WeatherApiSource`]      | WeatherSource     | WeatherAPI `GET /current.json?key=&q=`    |
//!
//! Both use a blocking `reqwest` client with a per-request timeout, so a
//! hung request turns into an ordinary skipped poll cycle.

use std::time::Duration;

use chrono::Utc;
use log::debug;
use reqwest::blocking::{Client, Response};
use serde::Deserialize;

use crate::app::ports::{SourceError, TelemetrySource, WeatherSource};
use crate::telemetry::TelemetryReading;
use crate::weather::{WeatherSnapshot, condition_mentions_hail, condition_mentions_snow};

/// Precipitation (mm) above which it counts as raining.
const RAIN_THRESHOLD_MM: f64 = 0.1;

fn build_client(timeout: Duration) -> Result<Client, SourceError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("ornimetrics-monitor/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| SourceError::Transport(e.to_string()))
}

fn check_status(response: Response) -> Result<Response, SourceError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(SourceError::Http(status.as_u16()))
    }
}

// ───────────────────────────────────────────────────────────────
// Telemetry
// ───────────────────────────────────────────────────────────────

/// Reads the feeder's telemetry object from a Realtime Database URL.
pub struct FirebaseTelemetrySource {
    client: Client,
    url: String,
}

impl FirebaseTelemetrySource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let url = url.into();
        if url.is_empty() {
            return Err(SourceError::NotConfigured);
        }
        Ok(Self {
            client: build_client(timeout)?,
            url,
        })
    }
}

impl TelemetrySource for FirebaseTelemetrySource {
    fn fetch(&mut self) -> Result<TelemetryReading, SourceError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| SourceError::Transport(e.to_string()))?;
        let body = check_status(response)?
            .bytes()
            .map_err(|e| SourceError::Transport(e.to_string()))?;
        debug!("FirebaseTelemetrySource: {} bytes", body.len());
        TelemetryReading::from_slice(&body, Utc::now())
    }
}

// ───────────────────────────────────────────────────────────────
// Weather
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    location: Location,
    current: Current,
}

#[derive(Debug, Deserialize)]
struct Location {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Current {
    temp_c: Option<f64>,
    humidity: f64,
    precip_mm: Option<f64>,
    condition: Condition,
}

#[derive(Debug, Deserialize)]
struct Condition {
    text: String,
}

impl CurrentResponse {
    fn into_snapshot(self, observed_at: chrono::DateTime<Utc>) -> WeatherSnapshot {
        let text = self.current.condition.text;
        let precip = self.current.precip_mm;
        WeatherSnapshot {
            is_raining: precip.is_some_and(|mm| mm > RAIN_THRESHOLD_MM),
            is_snowing: condition_mentions_snow(&text),
            is_hailing: condition_mentions_hail(&text),
            humidity: self.current.humidity,
            temperature_c: self.current.temp_c,
            precipitation_mm: precip,
            location_name: self.location.name,
            condition: text,
            observed_at,
        }
    }
}

/// Current conditions for a fixed coordinate from WeatherAPI.
pub struct WeatherApiSource {
    client: Client,
    endpoint: String,
    api_key: String,
    query: String,
}

impl WeatherApiSource {
    /// `endpoint` is the API base (e.g. `https://api.weatherapi.com/v1`).
    /// An empty key yields [`SourceError::NotConfigured`].
    pub fn new(
        endpoint: &str,
        api_key: impl Into<String>,
        latitude: f64,
        longitude: f64,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(SourceError::NotConfigured);
        }
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: endpoint.trim_end_matches('/').to_owned(),
            api_key,
            query: format!("{latitude},{longitude}"),
        })
    }
}

impl WeatherSource for WeatherApiSource {
    fn fetch(&mut self) -> Result<WeatherSnapshot, SourceError> {
        let response = self
            .client
            .get(format!("{}/current.json", self.endpoint))
            .query(&[("key", self.api_key.as_str()), ("q", self.query.as_str()), ("aqi", "no")])
            .send()
            .map_err(|e| SourceError::Transport(e.to_string()))?;
        let parsed: CurrentResponse = check_status(response)?
            .json()
            .map_err(|_| SourceError::Malformed("unexpected weather response shape"))?;
        Ok(parsed.into_snapshot(Utc::now()))
    }
}
