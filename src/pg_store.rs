//! PostgreSQL implementation of the engine's [`ReadingStore`] boundary.
//!
//! Queries are built with `sqlx::QueryBuilder` so the optional sensor and
//! time filters only appear when requested.

use chrono::{DateTime, Utc};
use sensorflow_analytics::{ReadingStore, SensorReading, StoreError};
use sqlx::{PgPool, Postgres, QueryBuilder};

// ---

/// Row shape of `sensor_readings`.
#[derive(Debug, sqlx::FromRow)]
struct ReadingRow {
    // ---
    record_id: i64,
    sensor_id: String,
    temperature: f64,
    timestamp: DateTime<Utc>,
    humidity: Option<f64>,
    pressure: Option<f64>,
    battery_level: Option<i32>,
}

impl From<ReadingRow> for SensorReading {
    fn from(row: ReadingRow) -> Self {
        // ---
        SensorReading {
            record_id: row.record_id,
            sensor_id: row.sensor_id,
            temperature: row.temperature,
            timestamp: row.timestamp,
            humidity: row.humidity,
            pressure: row.pressure,
            battery_level: row.battery_level,
        }
    }
}

/// Read-only store over a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgReadingStore {
    pool: PgPool,
}

impl PgReadingStore {
    // ---
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Build the readings query for the optional filters.
fn readings_query<'a>(
    sensor_id: Option<&'a str>,
    since: Option<DateTime<Utc>>,
) -> QueryBuilder<'a, Postgres> {
    // ---
    let mut qb = QueryBuilder::new(
        "SELECT record_id, sensor_id, temperature, timestamp, humidity, pressure, battery_level \
         FROM sensor_readings WHERE TRUE",
    );
    if let Some(id) = sensor_id {
        qb.push(" AND sensor_id = ").push_bind(id);
    }
    if let Some(since) = since {
        qb.push(" AND timestamp >= ").push_bind(since);
    }
    qb.push(" ORDER BY sensor_id, timestamp, record_id");
    qb
}

impl ReadingStore for PgReadingStore {
    // ---
    async fn fetch_readings(
        &self,
        sensor_id: Option<&str>,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<SensorReading>, StoreError> {
        // ---
        let mut qb = readings_query(sensor_id, since);
        let rows: Vec<ReadingRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch readings: {}", e);
                StoreError::backend(e)
            })?;

        tracing::debug!(
            "Fetched {} readings (sensor_id={:?}, since={:?})",
            rows.len(),
            sensor_id,
            since
        );
        Ok(rows.into_iter().map(SensorReading::from).collect())
    }
}
