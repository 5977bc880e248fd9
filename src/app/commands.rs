//! Inbound commands to the monitor service.
//!
//! These are actions requested from outside the poller thread (the CLI,
//! a settings screen, a test) that the
//! [`MonitorService`](super::service::MonitorService) applies between
//! ticks.

use crate::preferences::Preferences;
use crate::weather::WeatherSnapshot;

/// Commands that adapters can send into the application core.
#[derive(Debug, Clone)]
pub enum MonitorCommand {
    /// Replace the alert preferences (validated before acceptance).
    UpdatePreferences(Preferences),

    /// The feeder was cleaned just now.
    MarkCleaned,

    /// Evaluate a weather snapshot obtained out-of-band.
    IngestWeather(WeatherSnapshot),
}
