//! Maintenance rule evaluator.
//!
//! Turns one telemetry reading (or one weather snapshot) plus the current
//! [`Preferences`] into zero or more [`AlertEvent`]s.  The functions here
//! are pure: they never fail, never log, and never persist.  The only
//! memory between calls is the [`RuleState`] value threaded through by
//! the caller.
//!
//! ## Per-category behaviour
//!
//! | Category      | Trigger                                   | Gate            |
//! |---------------|-------------------------------------------|-----------------|
//! | Low food      | `food <= threshold`                       | edge (latch)    |
//! | Clogged       | `clogged == true`                         | none (level)    |
//! | Cleaning due  | `days_since_cleaned >= interval`          | none (level)    |
//! | Heavy use     | `score >= threshold(sensitivity)`         | cooldown        |
//! | Weather       | rain/snow/hail, else humidity ≥ threshold | cooldown        |
//!
//! Each category runs the state machine `Idle → Triggered → Idle`.  For
//! low food the return to `Idle` happens when the level rises back above
//! the threshold; for cooldown categories it happens purely on elapsed
//! time.
//!
//! A category whose input field is missing from the reading is skipped
//! for that cycle and its state is left as it was.

use chrono::{DateTime, Duration, Utc};

use crate::alerts::{AlertCategory, AlertEvent};
use crate::preferences::Preferences;
use crate::telemetry::TelemetryReading;
use crate::weather::WeatherSnapshot;

/// Memory carried between evaluator calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleState {
    /// A low-food alert has fired and the level has not recovered since.
    pub low_food_latched: bool,
    pub last_heavy_use_fired: Option<DateTime<Utc>>,
    pub last_weather_fired: Option<DateTime<Utc>>,
}

/// Where a category sits in its `Idle → Triggered → Idle` cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryStatus {
    /// Ready to fire on the next qualifying evaluation.
    Idle,
    /// Fired and held: waiting for the condition to reverse or the
    /// cooldown to elapse.
    Triggered,
}

impl RuleState {
    /// Current status of `category` as of `now`.
    ///
    /// Clogged and cleaning-due are level-triggered and carry no state,
    /// so they always report [`CategoryStatus::Idle`].  A disabled low-food
    /// rule is idle even before the next evaluation clears its latch.
    pub fn status(&self, category: AlertCategory, prefs: &Preferences, now: DateTime<Utc>) -> CategoryStatus {
        let held = match category {
            AlertCategory::LowFood => prefs.low_food_enabled && self.low_food_latched,
            AlertCategory::HeavyUse => {
                !cooldown_elapsed(self.last_heavy_use_fired, prefs.heavy_use_cooldown_hours, now)
            }
            AlertCategory::WeatherBased => {
                !cooldown_elapsed(self.last_weather_fired, prefs.weather_cooldown_hours, now)
            }
            AlertCategory::Clogged | AlertCategory::CleaningDue => false,
        };
        if held {
            CategoryStatus::Triggered
        } else {
            CategoryStatus::Idle
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Telemetry rules
// ═══════════════════════════════════════════════════════════════

/// Evaluate one telemetry reading.  `reading.observed_at` is "now".
///
/// Events come back in category order: low food, clogged, cleaning due,
/// heavy use.
pub fn evaluate_telemetry(
    reading: &TelemetryReading,
    prefs: &Preferences,
    state: &RuleState,
) -> (Vec<AlertEvent>, RuleState) {
    let now = reading.observed_at;
    let mut next = *state;
    let mut events = Vec::new();

    // ── Low food (edge-triggered) ─────────────────────────────
    if !prefs.low_food_enabled {
        next.low_food_latched = false;
    } else if let Some(food) = reading.food_percent {
        if food <= prefs.low_food_threshold_percent {
            if !next.low_food_latched {
                events.push(
                    AlertEvent::new(
                        AlertCategory::LowFood,
                        format!("Food level at {}%. Time to refill.", food.trunc() as i64),
                        now,
                    )
                    .with_meta("food_percent", food)
                    .with_meta("threshold_percent", prefs.low_food_threshold_percent),
                );
                next.low_food_latched = true;
            }
        } else {
            next.low_food_latched = false;
        }
    }

    // ── Clogged (level-triggered: fires on every reading) ─────
    if prefs.clogged_enabled && reading.clogged == Some(true) {
        events.push(AlertEvent::new(
            AlertCategory::Clogged,
            "Possible feeder clog detected. Inspect the chute.",
            now,
        ));
    }

    // ── Cleaning due ──────────────────────────────────────────
    if prefs.cleaning_reminder_enabled {
        let interval = i64::from(prefs.cleaning_interval_days);
        let days_since = days_since_cleaned(prefs.last_cleaned, interval, now);
        if days_since >= interval {
            let mut event = AlertEvent::new(
                AlertCategory::CleaningDue,
                format!("Cleaning due. It's been {days_since} day(s) since last cleaning."),
                now,
            )
            .with_meta("days_since", days_since)
            .with_meta("interval_days", interval);
            if let Some(flag) = reading.cleaning_due {
                event = event.with_meta("device_flag", flag);
            }
            events.push(event);
        }
    }

    // ── Heavy use (cooldown-gated) ────────────────────────────
    if prefs.heavy_use_enabled {
        if let Some(score) = reading.heavy_use_score {
            let threshold = prefs.heavy_use_sensitivity.heavy_use_threshold();
            if score >= threshold
                && cooldown_elapsed(next.last_heavy_use_fired, prefs.heavy_use_cooldown_hours, now)
            {
                events.push(
                    AlertEvent::new(
                        AlertCategory::HeavyUse,
                        format!(
                            "Heavy feeder traffic (score {}). Check perches and seed.",
                            score.trunc() as i64
                        ),
                        now,
                    )
                    .with_meta("score", score)
                    .with_meta("threshold", threshold),
                );
                next.last_heavy_use_fired = Some(now);
            }
        }
    }

    (events, next)
}

// ═══════════════════════════════════════════════════════════════
//  Weather rules
// ═══════════════════════════════════════════════════════════════

/// Evaluate one weather snapshot.  `snapshot.observed_at` is "now".
///
/// At most one event per call; precipitation takes priority over
/// humidity.  Both share one cooldown window.
pub fn evaluate_weather(
    snapshot: &WeatherSnapshot,
    prefs: &Preferences,
    state: &RuleState,
) -> (Vec<AlertEvent>, RuleState) {
    let now = snapshot.observed_at;
    let mut next = *state;

    if !prefs.weather_based_cleaning_enabled {
        return (Vec::new(), next);
    }

    let candidate = if snapshot.has_precipitation() {
        Some(
            AlertEvent::new(
                AlertCategory::WeatherBased,
                format!(
                    "Weather event detected ({}). Consider cleaning the feeder.",
                    snapshot.condition
                ),
                now,
            )
            .with_meta("reason", "precipitation")
            .with_meta("condition", &snapshot.condition),
        )
    } else if snapshot.humidity.is_finite() && snapshot.humidity >= prefs.humidity_threshold {
        Some(
            AlertEvent::new(
                AlertCategory::WeatherBased,
                format!(
                    "Humidity is {}%. Cleaning recommended.",
                    snapshot.humidity.trunc() as i64
                ),
                now,
            )
            .with_meta("reason", "humidity")
            .with_meta("humidity", snapshot.humidity),
        )
    } else {
        None
    };

    match candidate {
        Some(event)
            if cooldown_elapsed(next.last_weather_fired, prefs.weather_cooldown_hours, now) =>
        {
            next.last_weather_fired = Some(now);
            (vec![event], next)
        }
        _ => (Vec::new(), next),
    }
}

// ── Helpers ───────────────────────────────────────────────────

/// Whole days since the last cleaning.  Never cleaned counts as
/// `interval + 1` so the first evaluation fires.  A cleaning stamped in
/// the future counts as zero days.
pub fn days_since_cleaned(last_cleaned: Option<DateTime<Utc>>, interval_days: i64, now: DateTime<Utc>) -> i64 {
    match last_cleaned {
        None => interval_days + 1,
        Some(last) => (now - last).num_days().max(0),
    }
}

/// Convert fractional hours to a duration (millisecond resolution).
pub fn cooldown_duration(hours: f64) -> Duration {
    Duration::milliseconds((hours.max(0.0) * 3_600_000.0) as i64)
}

/// `true` if nothing has fired yet or at least `hours` have passed since
/// `last_fired`.
fn cooldown_elapsed(last_fired: Option<DateTime<Utc>>, hours: f64, now: DateTime<Utc>) -> bool {
    last_fired.is_none_or(|last| now - last >= cooldown_duration(hours))
}
