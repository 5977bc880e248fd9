//! Log-based alert sink adapter.
//!
//! Implements [`AlertSink`] by writing each notification to the `log`
//! facade.  A push-gateway adapter would implement the same trait.

use log::info;

use crate::app::events::Notification;
use crate::app::ports::AlertSink;

/// Adapter that logs every [`Notification`].
#[derive(Debug, Default)]
pub struct LogAlertSink {
    delivered: u64,
}

impl LogAlertSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications delivered so far.
    pub fn delivered(&self) -> u64 {
        self.delivered
    }
}

impl AlertSink for LogAlertSink {
    fn deliver(&mut self, n: &Notification) {
        self.delivered += 1;
        info!(
            "NOTIFY | {} | {} | sound={} | id={}",
            n.title,
            n.body,
            if n.sound { "on" } else { "off" },
            n.alert_id,
        );
    }
}
