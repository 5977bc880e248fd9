//! Ornimetrics feeder monitor library.
//!
//! Polls a bird feeder's telemetry feed, evaluates maintenance alert
//! rules (low food, clog, cleaning due, weather, heavy use) against the
//! user's preferences, and keeps a bounded history of the alerts raised.
//! Network adapters are behind the `host` feature; everything else runs
//! against the port traits in [`app::ports`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod alerts;
pub mod app;
pub mod config;
pub mod event_log;
pub mod poller;
pub mod preferences;
pub mod rules;
pub mod telemetry;
pub mod weather;

mod error;

pub use error::{Error, PollerError, Result};
