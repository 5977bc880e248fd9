//! Alert categories and the immutable [`AlertEvent`] record.
//!
//! An event is created by the rule evaluator, appended to the
//! [`EventLog`](crate::event_log::EventLog), and optionally forwarded to
//! an [`AlertSink`](crate::app::ports::AlertSink).  It is never mutated
//! after creation.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The five maintenance alert categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlertCategory {
    LowFood,
    Clogged,
    CleaningDue,
    WeatherBased,
    HeavyUse,
}

impl AlertCategory {
    pub const ALL: [Self; 5] = [
        Self::LowFood,
        Self::Clogged,
        Self::CleaningDue,
        Self::WeatherBased,
        Self::HeavyUse,
    ];

    /// Short user-facing title, used as the notification headline.
    pub const fn title(self) -> &'static str {
        match self {
            Self::LowFood => "Low food",
            Self::Clogged => "Clogged feeder",
            Self::CleaningDue => "Cleaning due",
            Self::WeatherBased => "Weather cleaning",
            Self::HeavyUse => "Heavy use",
        }
    }

    /// Stable identifier (matches the serialized form).
    pub const fn key(self) -> &'static str {
        match self {
            Self::LowFood => "lowFood",
            Self::Clogged => "clogged",
            Self::CleaningDue => "cleaningDue",
            Self::WeatherBased => "weatherBased",
            Self::HeavyUse => "heavyUse",
        }
    }
}

impl fmt::Display for AlertCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A single emitted alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub id: Uuid,
    pub category: AlertCategory,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl AlertEvent {
    pub fn new(category: AlertCategory, message: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            category,
            message: message.into(),
            timestamp,
            metadata: BTreeMap::new(),
        }
    }

    /// Builder-style metadata attachment.
    #[must_use]
    pub fn with_meta(mut self, key: &str, value: impl ToString) -> Self {
        self.metadata.insert(key.to_owned(), value.to_string());
        self
    }

    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}
