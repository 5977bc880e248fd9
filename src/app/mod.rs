//! Application core: alert orchestration with no direct I/O.
//!
//! [`service::MonitorService`] owns the rule state, the event log and the
//! preference store.  Everything outside the process (the feeder's
//! telemetry feed, the weather provider, the push channel, durable
//! storage, wall-clock time) is reached through the **port traits** in
//! [`ports`], so the whole core runs under test with mock adapters.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
