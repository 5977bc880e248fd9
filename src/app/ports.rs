//! Port traits: the hexagonal boundary between the monitor core and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ MonitorService (domain)
//! ```
//!
//! Driven adapters (telemetry and weather fetchers, alert sinks,
//! preference persistence, clocks) implement these traits.  The
//! [`MonitorService`](super::service::MonitorService) consumes them as
//! trait objects, so the rule core never touches the network or disk.
//!
//! All port errors are typed; callers must handle every variant.

use chrono::{DateTime, Utc};

use crate::preferences::Preferences;
use crate::telemetry::TelemetryReading;
use crate::weather::WeatherSnapshot;

use super::events::Notification;

// ───────────────────────────────────────────────────────────────
// Telemetry port (driven adapter: feeder → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the poller calls this once per tick.
pub trait TelemetrySource {
    /// Fetch the latest feeder reading.
    ///
    /// An `Err` means "no update this cycle"; the poller logs it and
    /// waits for the next tick.
    fn fetch(&mut self) -> Result<TelemetryReading, SourceError>;
}

// ───────────────────────────────────────────────────────────────
// Weather port (driven adapter: weather API → domain)
// ───────────────────────────────────────────────────────────────

/// Supplies current conditions at the feeder location.
pub trait WeatherSource {
    fn fetch(&mut self) -> Result<WeatherSnapshot, SourceError>;
}

// ───────────────────────────────────────────────────────────────
// Alert sink port (driven adapter: domain → notifications)
// ───────────────────────────────────────────────────────────────

/// The domain forwards user-facing notifications through this port.
/// Adapters decide where they go (log, push gateway, widget timeline).
pub trait AlertSink {
    fn deliver(&mut self, notification: &Notification);
}

// ───────────────────────────────────────────────────────────────
// Preferences port (driven adapter: domain ↔ persistent storage)
// ───────────────────────────────────────────────────────────────

/// Loads and persists the user's notification preferences.
///
/// Implementations MUST validate before persisting and reject invalid
/// values with [`PreferencesError::ValidationFailed`] rather than clamp
/// them.  Writes MUST be atomic: a crash mid-save leaves the previous
/// value readable.
pub trait PreferencesPort {
    /// Load preferences.  Returns [`PreferencesError::NotFound`] when
    /// nothing has been stored yet (first launch).
    fn load(&self) -> Result<Preferences, PreferencesError>;

    /// Validate and persist preferences.
    fn save(&self, prefs: &Preferences) -> Result<(), PreferencesError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Wall-clock time source.  Injected so cleaning and cooldown logic can
/// be tested against fixed instants.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`TelemetrySource`] and [`WeatherSource`] fetches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The request could not be sent or timed out.
    Transport(String),
    /// The endpoint answered with a non-success status.
    Http(u16),
    /// The endpoint answered with no data (e.g. JSON `null`).
    NoData,
    /// The payload was not the expected JSON shape.
    Malformed(&'static str),
    /// The source is not configured (missing URL or API key).
    NotConfigured,
}

/// Errors from [`PreferencesPort`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferencesError {
    /// Nothing stored yet (first launch).
    NotFound,
    /// Stored blob failed to deserialize.
    Corrupted,
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for SourceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "transport error: {}", msg),
            Self::Http(status) => write!(f, "HTTP status {}", status),
            Self::NoData => write!(f, "no data"),
            Self::Malformed(what) => write!(f, "malformed payload: {}", what),
            Self::NotConfigured => write!(f, "source not configured"),
        }
    }
}

impl core::fmt::Display for PreferencesError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "preferences not found"),
            Self::Corrupted => write!(f, "preferences corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for SourceError {}

impl std::error::Error for PreferencesError {}
