//! Data models shared by the engine and its callers.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};

// ---

/// One immutable telemetry sample as held by the reading store.
///
/// Only `temperature` and `timestamp` are analysed; the auxiliary fields are
/// carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    // ---
    pub record_id: i64,
    pub sensor_id: String,
    pub temperature: f64,
    pub timestamp: DateTime<Utc>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub battery_level: Option<i32>,
}

impl SensorReading {
    // ---
    /// Build a reading with only the analysed fields set.
    pub fn new(
        record_id: i64,
        sensor_id: impl Into<String>,
        temperature: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        // ---
        Self {
            record_id,
            sensor_id: sensor_id.into(),
            temperature,
            timestamp,
            humidity: None,
            pressure: None,
            battery_level: None,
        }
    }
}

/// Time window a profile is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeWindow {
    // ---
    AllTime,
    LastDays(u32),
}

impl TimeWindow {
    // ---
    /// Convert an optional day count into a window.
    ///
    /// `None` means all-time. Negative counts are rejected.
    pub fn from_days(days: Option<i64>) -> Result<Self> {
        // ---
        match days {
            None => Ok(Self::AllTime),
            Some(d) if d < 0 => Err(AnalyticsError::InvalidParameter {
                name: "window_days".into(),
                reason: format!("must be non-negative, got {d}"),
            }),
            Some(d) => u32::try_from(d)
                .map(Self::LastDays)
                .map_err(|_| AnalyticsError::InvalidParameter {
                    name: "window_days".into(),
                    reason: format!("{d} is out of range"),
                }),
        }
    }

    /// Oldest timestamp admitted by this window, relative to `now`.
    ///
    /// The boundary is closed: a reading at exactly the cutoff is inside.
    /// Returns `None` when every reading qualifies.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        // ---
        match self {
            Self::AllTime => None,
            Self::LastDays(days) => now.checked_sub_signed(Duration::days(i64::from(*days))),
        }
    }

    /// Whether a timestamp falls inside the window.
    pub fn contains(&self, timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        // ---
        self.cutoff(now).map_or(true, |cutoff| timestamp >= cutoff)
    }
}
