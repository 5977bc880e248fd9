//! User notification preferences and the store that owns them.
//!
//! [`Preferences`] is a plain value: the rule evaluator receives a
//! snapshot per call and never mutates it.  [`PreferenceStore`] holds the
//! current value, exposes a single whole-value [`update`](PreferenceStore::update),
//! and persists through an injected [`PreferencesPort`].

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::app::ports::{PreferencesError, PreferencesPort};

/// Upper bound for any cooldown window (30 days).
pub const MAX_COOLDOWN_HOURS: f64 = 720.0;

// ---------------------------------------------------------------------------
// Sensitivities
// ---------------------------------------------------------------------------

/// How eagerly heavy feeder traffic is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageSensitivity {
    Low,
    #[default]
    Normal,
    High,
}

impl UsageSensitivity {
    /// Minimum heavy-use score that triggers an alert.
    pub const fn heavy_use_threshold(self) -> f64 {
        match self {
            Self::Low => 80.0,
            Self::Normal => 65.0,
            Self::High => 50.0,
        }
    }
}

/// Weather alert sensitivity, kept for the settings surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherSensitivity {
    #[default]
    Normal,
    High,
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

/// Per-category toggles, thresholds and cooldowns.
///
/// Every field has a default, so blobs written by older builds (with
/// fewer fields) still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    // --- Low food ---
    pub low_food_enabled: bool,
    /// Alert when the hopper is at or below this level (0-100%)
    pub low_food_threshold_percent: f64,

    // --- Clog ---
    pub clogged_enabled: bool,

    // --- Cleaning ---
    pub cleaning_reminder_enabled: bool,
    /// Days between cleanings
    pub cleaning_interval_days: u32,
    /// Last time the user marked the feeder cleaned
    pub last_cleaned: Option<DateTime<Utc>>,

    // --- Weather ---
    pub weather_based_cleaning_enabled: bool,
    pub weather_sensitivity: WeatherSensitivity,
    /// Relative humidity (0-100%) at which cleaning is recommended
    pub humidity_threshold: f64,
    pub weather_cooldown_hours: f64,

    // --- Heavy use ---
    pub heavy_use_enabled: bool,
    pub heavy_use_sensitivity: UsageSensitivity,
    pub heavy_use_cooldown_hours: f64,

    // --- Delivery ---
    /// Forward alerts to the notification sink (the log keeps them regardless)
    pub push_enabled: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            // Low food
            low_food_enabled: true,
            low_food_threshold_percent: 20.0,

            // Clog
            clogged_enabled: true,

            // Cleaning
            cleaning_reminder_enabled: true,
            cleaning_interval_days: 7,
            last_cleaned: None,

            // Weather
            weather_based_cleaning_enabled: true,
            weather_sensitivity: WeatherSensitivity::Normal,
            humidity_threshold: 78.0,
            weather_cooldown_hours: 12.0,

            // Heavy use
            heavy_use_enabled: true,
            heavy_use_sensitivity: UsageSensitivity::Normal,
            heavy_use_cooldown_hours: 12.0,

            push_enabled: true,
        }
    }
}

impl Preferences {
    /// Range-check every numeric field.  Invalid values are rejected, not
    /// clamped.
    pub fn validate(&self) -> Result<(), PreferencesError> {
        if !(0.0..=100.0).contains(&self.low_food_threshold_percent) {
            return Err(PreferencesError::ValidationFailed(
                "low_food_threshold_percent must be 0–100",
            ));
        }
        if !(1..=365).contains(&self.cleaning_interval_days) {
            return Err(PreferencesError::ValidationFailed(
                "cleaning_interval_days must be 1–365",
            ));
        }
        if !(0.0..=100.0).contains(&self.humidity_threshold) {
            return Err(PreferencesError::ValidationFailed(
                "humidity_threshold must be 0–100",
            ));
        }
        if !(0.0..=MAX_COOLDOWN_HOURS).contains(&self.weather_cooldown_hours) {
            return Err(PreferencesError::ValidationFailed(
                "weather_cooldown_hours must be 0–720",
            ));
        }
        if !(0.0..=MAX_COOLDOWN_HOURS).contains(&self.heavy_use_cooldown_hours) {
            return Err(PreferencesError::ValidationFailed(
                "heavy_use_cooldown_hours must be 0–720",
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PreferenceStore
// ---------------------------------------------------------------------------

/// Owner of the live [`Preferences`] value.
pub struct PreferenceStore {
    current: Preferences,
    backend: Box<dyn PreferencesPort + Send>,
    dirty: bool,
}

impl PreferenceStore {
    /// Load from `backend`.  A missing or corrupted blob falls back to
    /// defaults; any other error is returned.
    pub fn open(backend: Box<dyn PreferencesPort + Send>) -> Result<Self, PreferencesError> {
        let current = match backend.load() {
            Ok(prefs) => prefs,
            Err(PreferencesError::NotFound) => {
                info!("PreferenceStore: nothing stored, using defaults");
                Preferences::default()
            }
            Err(PreferencesError::Corrupted) => {
                warn!("PreferenceStore: stored preferences corrupted, using defaults");
                Preferences::default()
            }
            Err(e) => return Err(e),
        };
        Ok(Self {
            current,
            backend,
            dirty: false,
        })
    }

    /// Wrap an already-loaded value without reading the backend.
    pub fn with_value(current: Preferences, backend: Box<dyn PreferencesPort + Send>) -> Self {
        Self {
            current,
            backend,
            dirty: false,
        }
    }

    pub fn current(&self) -> &Preferences {
        &self.current
    }

    /// Owned copy for handing to a settings screen.
    pub fn snapshot(&self) -> Preferences {
        self.current.clone()
    }

    /// Replace the whole preference set and persist it.
    ///
    /// Invalid input is rejected and leaves the current value untouched.
    /// A failed save keeps the new value (no rollback), marks the store
    /// dirty for [`flush_if_dirty`](Self::flush_if_dirty), and returns
    /// the error.
    pub fn update(&mut self, next: Preferences) -> Result<(), PreferencesError> {
        next.validate()?;
        self.current = next;
        self.persist()
    }

    /// Record a cleaning at `at` and persist.
    pub fn mark_cleaned(&mut self, at: DateTime<Utc>) -> Result<(), PreferencesError> {
        self.current.last_cleaned = Some(at);
        info!("PreferenceStore: feeder marked cleaned at {}", at);
        self.persist()
    }

    /// Retry a previously failed save.  Returns `true` if a save succeeded.
    pub fn flush_if_dirty(&mut self) -> bool {
        self.dirty && self.persist().is_ok()
    }

    /// Whether the in-memory value has not reached storage.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn persist(&mut self) -> Result<(), PreferencesError> {
        match self.backend.save(&self.current) {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(e) => {
                warn!("PreferenceStore: save failed: {}", e);
                self.dirty = true;
                Err(e)
            }
        }
    }
}
