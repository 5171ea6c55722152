//! Reading Store boundary consumed by the engine.
//!
//! The engine never writes to the store and never reaches it through ambient
//! state: an implementation is handed to [`AnalyticsEngine::new`](crate::AnalyticsEngine::new).

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::models::SensorReading;

// ---

/// Source of sensor readings.
pub trait ReadingStore: Send + Sync {
    // ---
    /// Fetch readings, optionally restricted to one sensor and to readings at
    /// or after `since`. Omitting `sensor_id` returns every sensor's readings.
    fn fetch_readings(
        &self,
        sensor_id: Option<&str>,
        since: Option<DateTime<Utc>>,
    ) -> impl Future<Output = Result<Vec<SensorReading>, StoreError>> + Send;
}

/// In-process store backed by a vector, used by tests and embedders that
/// already hold their readings in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    readings: Vec<SensorReading>,
}

impl MemoryStore {
    // ---
    pub fn new(readings: Vec<SensorReading>) -> Self {
        Self { readings }
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    fn query(&self, sensor_id: Option<&str>, since: Option<DateTime<Utc>>) -> Vec<SensorReading> {
        // ---
        self.readings
            .iter()
            .filter(|r| sensor_id.map_or(true, |id| r.sensor_id == id))
            .filter(|r| since.map_or(true, |s| r.timestamp >= s))
            .cloned()
            .collect()
    }
}

impl FromIterator<SensorReading> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = SensorReading>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl ReadingStore for MemoryStore {
    // ---
    async fn fetch_readings(
        &self,
        sensor_id: Option<&str>,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<SensorReading>, StoreError> {
        // ---
        Ok(self.query(sensor_id, since))
    }
}
