//! Unified error types for the feeder monitor.
//!
//! Port-level errors ([`SourceError`], [`PreferencesError`]) live next to
//! the port traits in [`crate::app::ports`]; this module adds the poller's
//! own failures and a single crate-wide [`Error`] that every subsystem
//! converts into, so the binary can funnel everything through `anyhow`.

use core::fmt;

use crate::app::ports::{PreferencesError, SourceError};

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A telemetry or weather fetch failed.
    Source(SourceError),
    /// Preferences could not be loaded, validated or persisted.
    Preferences(PreferencesError),
    /// The telemetry poller could not be started or addressed.
    Poller(PollerError),
    /// Monitor configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source(e) => write!(f, "source: {e}"),
            Self::Preferences(e) => write!(f, "preferences: {e}"),
            Self::Poller(e) => write!(f, "poller: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<SourceError> for Error {
    fn from(e: SourceError) -> Self {
        Self::Source(e)
    }
}

impl From<PreferencesError> for Error {
    fn from(e: PreferencesError) -> Self {
        Self::Preferences(e)
    }
}

// ---------------------------------------------------------------------------
// Poller errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerError {
    /// A zero polling interval was requested.
    InvalidInterval,
    /// The OS refused to spawn the poller thread.
    SpawnFailed,
    /// The command queue is full; the command was dropped.
    CommandQueueFull,
    /// The poller has already been stopped.
    NotRunning,
    /// The poller thread panicked before it could hand back its state.
    Panicked,
}

impl fmt::Display for PollerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInterval => write!(f, "poll interval must be non-zero"),
            Self::SpawnFailed => write!(f, "failed to spawn poller thread"),
            Self::CommandQueueFull => write!(f, "command queue full"),
            Self::NotRunning => write!(f, "poller not running"),
            Self::Panicked => write!(f, "poller thread panicked"),
        }
    }
}

impl std::error::Error for PollerError {}

impl From<PollerError> for Error {
    fn from(e: PollerError) -> Self {
        Self::Poller(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
