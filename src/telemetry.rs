//! Feeder telemetry readings.
//!
//! A [`TelemetryReading`] is one point-in-time snapshot of the feeder's
//! sensors.  It is never mutated after creation and is superseded, not
//! merged, by the next reading.
//!
//! Wire format (realtime database object):
//!
//! ```json
//! { "food_level_percent": 42.5, "clogged": false,
//!   "cleaning_due": false, "heavy_use_score": 31.0 }
//! ```
//!
//! Each field is decoded independently.  A field that is missing, of the
//! wrong type, non-finite or out of range decodes to `None`, which the
//! rule evaluator treats as "cannot evaluate this category this cycle".

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::app::ports::SourceError;

pub const FIELD_FOOD_LEVEL: &str = "food_level_percent";
pub const FIELD_CLOGGED: &str = "clogged";
pub const FIELD_CLEANING_DUE: &str = "cleaning_due";
pub const FIELD_HEAVY_USE: &str = "heavy_use_score";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryReading {
    /// Hopper fill level, 0–100.
    pub food_percent: Option<f64>,
    /// Chute blockage reported by the feeder.
    pub clogged: Option<bool>,
    /// Feeder's own cleaning-due flag.
    pub cleaning_due: Option<bool>,
    /// Visit-rate score; higher means busier.
    pub heavy_use_score: Option<f64>,
    /// When the reading was taken (or fetched).
    pub observed_at: DateTime<Utc>,
}

impl TelemetryReading {
    /// A reading with every field absent.
    pub fn empty(observed_at: DateTime<Utc>) -> Self {
        Self {
            food_percent: None,
            clogged: None,
            cleaning_due: None,
            heavy_use_score: None,
            observed_at,
        }
    }

    /// Decode a wire object.  Only a non-object payload is an error;
    /// bad individual fields become `None`.
    pub fn from_json(value: &Value, observed_at: DateTime<Utc>) -> Result<Self, SourceError> {
        let obj = match value {
            Value::Object(map) => map,
            Value::Null => return Err(SourceError::NoData),
            _ => return Err(SourceError::Malformed("telemetry is not a JSON object")),
        };

        Ok(Self {
            food_percent: obj
                .get(FIELD_FOOD_LEVEL)
                .and_then(Value::as_f64)
                .filter(|p| p.is_finite() && (0.0..=100.0).contains(p)),
            clogged: obj.get(FIELD_CLOGGED).and_then(Value::as_bool),
            cleaning_due: obj.get(FIELD_CLEANING_DUE).and_then(Value::as_bool),
            heavy_use_score: obj
                .get(FIELD_HEAVY_USE)
                .and_then(Value::as_f64)
                .filter(|s| s.is_finite() && *s >= 0.0),
            observed_at,
        })
    }

    /// Decode raw response bytes.
    pub fn from_slice(bytes: &[u8], observed_at: DateTime<Utc>) -> Result<Self, SourceError> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|_| SourceError::Malformed("telemetry is not valid JSON"))?;
        Self::from_json(&value, observed_at)
    }
}
