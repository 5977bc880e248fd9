//! Fuzz target: telemetry payload decoding + rule evaluation
//!
//! Feeds arbitrary bytes to `TelemetryReading::from_slice` and, when a
//! reading decodes, runs it through `evaluate_telemetry` twice.  Verifies:
//! - No panics on any input
//! - Decoded food levels are finite and within 0–100
//! - Decoded heavy-use scores are finite and non-negative
//! - A second identical reading never raises a second low-food alert
//!
//! cargo fuzz run fuzz_telemetry_payload

#![no_main]

use chrono::{TimeZone, Utc};
use libfuzzer_sys::fuzz_target;
use ornimetrics::alerts::AlertCategory;
use ornimetrics::preferences::Preferences;
use ornimetrics::rules::{RuleState, evaluate_telemetry};
use ornimetrics::telemetry::TelemetryReading;

fuzz_target!(|data: &[u8]| {
    let at = Utc.timestamp_opt(1_735_689_600, 0).unwrap();
    let Ok(reading) = TelemetryReading::from_slice(data, at) else {
        return;
    };

    if let Some(p) = reading.food_percent {
        assert!(p.is_finite() && (0.0..=100.0).contains(&p), "food {p} escaped decoding");
    }
    if let Some(s) = reading.heavy_use_score {
        assert!(s.is_finite() && s >= 0.0, "score {s} escaped decoding");
    }

    let prefs = Preferences::default();
    let (_, state) = evaluate_telemetry(&reading, &prefs, &RuleState::default());
    let (again, _) = evaluate_telemetry(&reading, &prefs, &state);
    assert!(
        !again.iter().any(|e| e.category == AlertCategory::LowFood),
        "low-food alert repeated without recovery"
    );
});
