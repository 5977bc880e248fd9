//! Integration tests for the telemetry poller thread.
//!
//! Uses short real intervals; every wait is bounded so a regression fails
//! instead of hanging.

use std::time::{Duration, Instant};

use chrono::Utc;
use ornimetrics::adapters::memory::MemoryPreferences;
use ornimetrics::adapters::time::SystemClock;
use ornimetrics::alerts::AlertCategory;
use ornimetrics::app::commands::MonitorCommand;
use ornimetrics::app::service::MonitorService;
use ornimetrics::poller::{PollSources, TelemetryPoller};
use ornimetrics::preferences::{PreferenceStore, Preferences};
use ornimetrics::telemetry::TelemetryReading;
use ornimetrics::weather::WeatherSnapshot;
use ornimetrics::PollerError;

use super::mock_feeder::{CollectingSink, MockFeeder, MockWeather};

const LONG: Duration = Duration::from_secs(3600);

fn service(prefs: Preferences) -> MonitorService {
    let store = PreferenceStore::with_value(prefs, Box::new(MemoryPreferences::new()));
    MonitorService::new(store, Box::new(SystemClock))
}

fn quiet() -> Preferences {
    Preferences {
        low_food_enabled: false,
        clogged_enabled: false,
        cleaning_reminder_enabled: false,
        weather_based_cleaning_enabled: false,
        heavy_use_enabled: false,
        ..Default::default()
    }
}

fn wait_until(poller: &TelemetryPoller, ticks: u64) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while poller.completed_ticks() < ticks {
        assert!(Instant::now() < deadline, "poller stalled at {} ticks", poller.completed_ticks());
        std::thread::sleep(Duration::from_millis(5));
    }
}

// ── Scheduling ────────────────────────────────────────────────

#[test]
fn polls_immediately_on_start() {
    let feeder = MockFeeder::reporting(TelemetryReading {
        clogged: Some(true),
        ..TelemetryReading::empty(Utc::now())
    });
    let sink = CollectingSink::default();
    let prefs = Preferences { clogged_enabled: true, ..quiet() };

    let poller = TelemetryPoller::start(
        LONG,
        service(prefs),
        PollSources::telemetry_only(Box::new(feeder.clone())),
        Box::new(sink.clone()),
    )
    .unwrap();
    wait_until(&poller, 1);

    let svc = poller.stop().unwrap();
    assert_eq!(svc.tick_count(), 1);
    assert_eq!(feeder.fetches(), 1);
    assert_eq!(sink.titles(), ["Clogged feeder"]);
}

#[test]
fn keeps_polling_every_interval() {
    let feeder = MockFeeder::offline();
    let poller = TelemetryPoller::start(
        Duration::from_millis(15),
        service(quiet()),
        PollSources::telemetry_only(Box::new(feeder.clone())),
        Box::new(CollectingSink::default()),
    )
    .unwrap();
    wait_until(&poller, 4);

    let svc = poller.stop().unwrap();
    assert!(svc.tick_count() >= 4);
    assert_eq!(svc.failed_fetches(), svc.tick_count(), "offline feeder fails every cycle");
    assert!(svc.event_log().is_empty());
}

#[test]
fn stop_does_not_wait_for_next_interval() {
    let poller = TelemetryPoller::start(
        LONG,
        service(quiet()),
        PollSources::telemetry_only(Box::new(MockFeeder::offline())),
        Box::new(CollectingSink::default()),
    )
    .unwrap();
    wait_until(&poller, 1);

    let started = Instant::now();
    poller.stop().unwrap();
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[test]
fn zero_interval_is_rejected() {
    let result = TelemetryPoller::start(
        Duration::ZERO,
        service(quiet()),
        PollSources::telemetry_only(Box::new(MockFeeder::offline())),
        Box::new(CollectingSink::default()),
    );
    assert!(matches!(result, Err(PollerError::InvalidInterval)));
}

// ── Weather cadence ───────────────────────────────────────────

#[test]
fn weather_fetched_every_nth_tick() {
    let weather = MockWeather::new(WeatherSnapshot::new("Sunny", 30.0, Utc::now()));
    let sources = PollSources {
        telemetry: Box::new(MockFeeder::offline()),
        weather: Some(Box::new(weather.clone())),
        weather_every_ticks: 3,
    };
    let poller = TelemetryPoller::start(
        Duration::from_millis(10),
        service(quiet()),
        sources,
        Box::new(CollectingSink::default()),
    )
    .unwrap();
    wait_until(&poller, 7);

    let svc = poller.stop().unwrap();
    let ticks = svc.tick_count();
    assert_eq!(weather.fetches(), ticks.div_ceil(3));
}

// ── Commands ──────────────────────────────────────────────────

#[test]
fn mark_cleaned_reaches_the_store() {
    let poller = TelemetryPoller::start(
        LONG,
        service(quiet()),
        PollSources::telemetry_only(Box::new(MockFeeder::offline())),
        Box::new(CollectingSink::default()),
    )
    .unwrap();
    poller.send(MonitorCommand::MarkCleaned).unwrap();

    let svc = poller.stop().unwrap();
    assert!(svc.preferences().last_cleaned.is_some());
}

#[test]
fn preference_update_changes_next_evaluation() {
    let feeder = MockFeeder::reporting(TelemetryReading {
        food_percent: Some(10.0),
        ..TelemetryReading::empty(Utc::now())
    });
    let sink = CollectingSink::default();
    let poller = TelemetryPoller::start(
        Duration::from_millis(10),
        service(quiet()),
        PollSources::telemetry_only(Box::new(feeder)),
        Box::new(sink.clone()),
    )
    .unwrap();
    wait_until(&poller, 1);
    assert!(sink.titles().is_empty());

    poller
        .send(MonitorCommand::UpdatePreferences(Preferences { low_food_enabled: true, ..quiet() }))
        .unwrap();
    let after = poller.completed_ticks() + 2;
    wait_until(&poller, after);

    let svc = poller.stop().unwrap();
    assert!(svc.preferences().low_food_enabled);
    assert_eq!(sink.titles(), ["Low food"], "edge-triggered: exactly one alert");
}

#[test]
fn out_of_band_weather_is_evaluated() {
    let sink = CollectingSink::default();
    let poller = TelemetryPoller::start(
        LONG,
        service(Preferences { weather_based_cleaning_enabled: true, ..quiet() }),
        PollSources::telemetry_only(Box::new(MockFeeder::offline())),
        Box::new(sink.clone()),
    )
    .unwrap();

    let mut hail = WeatherSnapshot::new("Moderate or heavy showers of ice pellets", 70.0, Utc::now());
    hail.is_hailing = true;
    poller.send(MonitorCommand::IngestWeather(hail)).unwrap();

    let svc = poller.stop().unwrap();
    let latest = svc.event_log().latest().unwrap();
    assert_eq!(latest.category, AlertCategory::WeatherBased);
    assert_eq!(sink.titles(), ["Weather cleaning"]);
}
