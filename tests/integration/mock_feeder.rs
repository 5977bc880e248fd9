//! Mock feeder adapters for integration tests.
//!
//! Every mock is `Send` and shares its state through an `Arc`, so a test
//! can hand one clone to the poller thread and inspect the other.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use ornimetrics::app::events::Notification;
use ornimetrics::app::ports::{AlertSink, SourceError, TelemetrySource, WeatherSource};
use ornimetrics::telemetry::TelemetryReading;
use ornimetrics::weather::WeatherSnapshot;

// ── MockFeeder ────────────────────────────────────────────────

/// Telemetry source returning whatever the test last set.
#[derive(Clone)]
pub struct MockFeeder {
    current: Arc<Mutex<Result<TelemetryReading, SourceError>>>,
    fetches: Arc<Mutex<u64>>,
}

#[allow(dead_code)]
impl MockFeeder {
    pub fn offline() -> Self {
        Self {
            current: Arc::new(Mutex::new(Err(SourceError::NoData))),
            fetches: Arc::new(Mutex::new(0)),
        }
    }

    pub fn reporting(reading: TelemetryReading) -> Self {
        let feeder = Self::offline();
        feeder.set(reading);
        feeder
    }

    pub fn set(&self, reading: TelemetryReading) {
        *self.current.lock().unwrap() = Ok(reading);
    }

    pub fn fetches(&self) -> u64 {
        *self.fetches.lock().unwrap()
    }
}

impl TelemetrySource for MockFeeder {
    fn fetch(&mut self) -> Result<TelemetryReading, SourceError> {
        *self.fetches.lock().unwrap() += 1;
        // Stamp with wall time so cooldowns behave as in production.
        self.current
            .lock()
            .unwrap()
            .clone()
            .map(|r| TelemetryReading { observed_at: Utc::now(), ..r })
    }
}

// ── MockWeather ───────────────────────────────────────────────

#[derive(Clone)]
pub struct MockWeather {
    snapshot: WeatherSnapshot,
    fetches: Arc<Mutex<u64>>,
}

impl MockWeather {
    pub fn new(snapshot: WeatherSnapshot) -> Self {
        Self {
            snapshot,
            fetches: Arc::new(Mutex::new(0)),
        }
    }

    pub fn fetches(&self) -> u64 {
        *self.fetches.lock().unwrap()
    }
}

impl WeatherSource for MockWeather {
    fn fetch(&mut self) -> Result<WeatherSnapshot, SourceError> {
        *self.fetches.lock().unwrap() += 1;
        Ok(WeatherSnapshot {
            observed_at: Utc::now(),
            ..self.snapshot.clone()
        })
    }
}

// ── CollectingSink ────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct CollectingSink {
    pub delivered: Arc<Mutex<Vec<Notification>>>,
}

#[allow(dead_code)]
impl CollectingSink {
    pub fn titles(&self) -> Vec<&'static str> {
        self.delivered.lock().unwrap().iter().map(|n| n.title).collect()
    }
}

impl AlertSink for CollectingSink {
    fn deliver(&mut self, notification: &Notification) {
        self.delivered.lock().unwrap().push(notification.clone());
    }
}
