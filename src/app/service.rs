//! Monitor service: the hexagonal core.
//!
//! [`MonitorService`] owns the rule state, the bounded event log and the
//! preference store.  It exposes a hardware- and network-agnostic API.
//! All I/O flows through port traits passed in at call sites, making the
//! entire service testable with mock adapters.
//!
//! ```text
//!  TelemetrySource ──▶ ┌──────────────────────────┐ ──▶ AlertSink
//!                      │      MonitorService       │
//!    WeatherSource ──▶ │  Rules · EventLog · Prefs │ ◀─▶ PreferencesPort
//!                      └──────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::alerts::{AlertCategory, AlertEvent};
use crate::event_log::EventLog;
use crate::preferences::{PreferenceStore, Preferences};
use crate::rules::{self, CategoryStatus, RuleState};
use crate::telemetry::TelemetryReading;
use crate::weather::WeatherSnapshot;

use super::commands::MonitorCommand;
use super::events::Notification;
use super::ports::{AlertSink, Clock, PreferencesError, TelemetrySource, WeatherSource};

// ───────────────────────────────────────────────────────────────
// MonitorService
// ───────────────────────────────────────────────────────────────

/// Orchestrates evaluation, logging and delivery of maintenance alerts.
pub struct MonitorService {
    prefs: PreferenceStore,
    rules: RuleState,
    log: EventLog,
    clock: Box<dyn Clock + Send>,
    tick_count: u64,
    failed_fetches: u64,
    last_reading: Option<TelemetryReading>,
    last_weather: Option<WeatherSnapshot>,
}

impl MonitorService {
    pub fn new(prefs: PreferenceStore, clock: Box<dyn Clock + Send>) -> Self {
        Self {
            prefs,
            rules: RuleState::default(),
            log: EventLog::new(),
            clock,
            tick_count: 0,
            failed_fetches: 0,
            last_reading: None,
            last_weather: None,
        }
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one poll cycle: fetch → evaluate → append → dispatch.
    ///
    /// A fetch failure skips the cycle (logged and counted, never
    /// retried).  A preference save that failed earlier is retried at the
    /// end of every tick.  Returns the number of alerts emitted.
    pub fn tick(&mut self, source: &mut dyn TelemetrySource, sink: &mut dyn AlertSink) -> usize {
        self.tick_count += 1;

        let emitted = match source.fetch() {
            Ok(reading) => self.ingest_telemetry(&reading, sink),
            Err(e) => {
                self.failed_fetches += 1;
                warn!("tick {}: telemetry fetch failed, skipping cycle: {}", self.tick_count, e);
                0
            }
        };

        if self.prefs.flush_if_dirty() {
            info!("Preferences flushed after earlier save failure");
        }
        emitted
    }

    /// Evaluate one reading against the live preferences.
    pub fn ingest_telemetry(&mut self, reading: &TelemetryReading, sink: &mut dyn AlertSink) -> usize {
        debug!(
            "telemetry: food={:?} clogged={:?} cleaning_due={:?} score={:?}",
            reading.food_percent, reading.clogged, reading.cleaning_due, reading.heavy_use_score
        );
        let (events, next) = rules::evaluate_telemetry(reading, self.prefs.current(), &self.rules);
        self.rules = next;
        self.last_reading = Some(*reading);
        self.record(events, sink)
    }

    /// Fetch and evaluate the current weather.  Failures are logged and
    /// produce no alerts.
    pub fn poll_weather(&mut self, source: &mut dyn WeatherSource, sink: &mut dyn AlertSink) -> usize {
        match source.fetch() {
            Ok(snapshot) => self.ingest_weather(snapshot, sink),
            Err(e) => {
                warn!("weather fetch failed: {}", e);
                0
            }
        }
    }

    /// Evaluate one weather snapshot against the live preferences.
    pub fn ingest_weather(&mut self, snapshot: WeatherSnapshot, sink: &mut dyn AlertSink) -> usize {
        debug!(
            "weather: {} humidity={} precipitation={}",
            snapshot.condition,
            snapshot.humidity,
            snapshot.has_precipitation()
        );
        let (events, next) = rules::evaluate_weather(&snapshot, self.prefs.current(), &self.rules);
        self.rules = next;
        self.last_weather = Some(snapshot);
        self.record(events, sink)
    }

    // ── Command handling ──────────────────────────────────────

    /// Apply an external command.  Preference errors are returned to
    /// the caller; weather ingestion cannot fail.
    pub fn handle_command(
        &mut self,
        cmd: MonitorCommand,
        sink: &mut dyn AlertSink,
    ) -> Result<(), PreferencesError> {
        match cmd {
            MonitorCommand::UpdatePreferences(next) => self.update_preferences(next),
            MonitorCommand::MarkCleaned => self.mark_cleaned(),
            MonitorCommand::IngestWeather(snapshot) => {
                self.ingest_weather(snapshot, sink);
                Ok(())
            }
        }
    }

    /// Replace the preference set.  Takes effect on the next evaluation.
    pub fn update_preferences(&mut self, next: Preferences) -> Result<(), PreferencesError> {
        self.prefs.update(next)?;
        info!("Preferences updated");
        Ok(())
    }

    /// Stamp the feeder as cleaned now.
    pub fn mark_cleaned(&mut self) -> Result<(), PreferencesError> {
        let now = self.clock.now();
        self.prefs.mark_cleaned(now)
    }

    // ── Queries ───────────────────────────────────────────────

    /// Alert history, newest first.
    pub fn event_log(&self) -> &EventLog {
        &self.log
    }

    /// Owned copy of the alert history, newest first.
    pub fn events(&self) -> Vec<AlertEvent> {
        self.log.to_vec()
    }

    pub fn preferences(&self) -> &Preferences {
        self.prefs.current()
    }

    pub fn rule_state(&self) -> &RuleState {
        &self.rules
    }

    /// Where `category` sits in its trigger cycle right now.
    pub fn status(&self, category: AlertCategory) -> CategoryStatus {
        self.rules.status(category, self.prefs.current(), self.clock.now())
    }

    /// Most recent successfully fetched reading.
    pub fn last_reading(&self) -> Option<&TelemetryReading> {
        self.last_reading.as_ref()
    }

    pub fn last_weather(&self) -> Option<&WeatherSnapshot> {
        self.last_weather.as_ref()
    }

    /// Total poll cycles executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Poll cycles skipped because the fetch failed.
    pub fn failed_fetches(&self) -> u64 {
        self.failed_fetches
    }

    /// Whether a preference change has not reached storage yet.
    pub fn preferences_dirty(&self) -> bool {
        self.prefs.is_dirty()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // ── Internal ──────────────────────────────────────────────

    /// Append to the log and forward to the sink when push is enabled.
    fn record(&mut self, events: Vec<AlertEvent>, sink: &mut dyn AlertSink) -> usize {
        let count = events.len();
        let push = self.prefs.current().push_enabled;
        for event in events {
            info!("ALERT [{}] {}", event.category, event.message);
            if push {
                sink.deliver(&Notification::from(&event));
            }
            self.log.append(event);
        }
        count
    }
}
