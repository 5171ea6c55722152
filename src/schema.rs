//! Database schema management for `sensorflow-analytics`.
//!
//! Ensures the readings table and its indexes exist before serving requests.
//! Applied once on startup from `main.rs` (EMBP: single gateway call). The
//! service only reads from this table; ingestion happens elsewhere.

use anyhow::Result;
use sqlx::PgPool;

// ---

/// Create the `sensor_readings` table and indexes (idempotent).
///
/// Safe to call on every startup; no-op if objects already exist.
///
/// Errors are propagated if any SQL execution fails.
pub async fn create_schema(pool: &PgPool) -> Result<()> {
    // ---
    let mut tx = pool.begin().await?;

    // One row per telemetry sample, immutable after ingestion
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sensor_readings (
            record_id     BIGINT           PRIMARY KEY,
            sensor_id     TEXT             NOT NULL,
            temperature   DOUBLE PRECISION NOT NULL,
            timestamp     TIMESTAMPTZ      NOT NULL,
            humidity      DOUBLE PRECISION,
            pressure      DOUBLE PRECISION,
            battery_level INTEGER
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    // Per-sensor, time-window and combined lookups
    for ddl in [
        "CREATE INDEX IF NOT EXISTS idx_sensor_readings_sensor_id ON sensor_readings (sensor_id);",
        "CREATE INDEX IF NOT EXISTS idx_sensor_readings_timestamp ON sensor_readings (timestamp);",
        "CREATE INDEX IF NOT EXISTS idx_sensor_readings_sensor_ts ON sensor_readings (sensor_id, timestamp);",
    ] {
        sqlx::query(ddl).execute(&mut *tx).await?;
    }

    tx.commit().await?;
    Ok(())
}
