//! Outbound notifications.
//!
//! The [`MonitorService`](super::service::MonitorService) hands these to
//! the [`AlertSink`](super::ports::AlertSink) port when push delivery is
//! enabled.  Adapters on the other side decide what to do with them:
//! log a line, call a push gateway, post to a webhook.

use uuid::Uuid;

use crate::alerts::{AlertCategory, AlertEvent};

/// A user-facing rendering of one [`AlertEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Id of the alert this notification was built from.
    pub alert_id: Uuid,
    pub category: AlertCategory,
    /// Headline, e.g. "Low food".
    pub title: &'static str,
    pub body: String,
    /// Play a sound on delivery.  Set for alerts that need a trip to the
    /// feeder (refill or unclog).
    pub sound: bool,
}

impl From<&AlertEvent> for Notification {
    fn from(event: &AlertEvent) -> Self {
        Self {
            alert_id: event.id,
            category: event.category,
            title: event.category.title(),
            body: event.message.clone(),
            sound: matches!(event.category, AlertCategory::LowFood | AlertCategory::Clogged),
        }
    }
}
