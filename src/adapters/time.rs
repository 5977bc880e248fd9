//! System clock adapter.
//!
//! Implements [`Clock`] with the host's wall clock.  Tests substitute a
//! fixed or stepping clock through the same port.

use chrono::{DateTime, Utc};

use crate::app::ports::Clock;

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
