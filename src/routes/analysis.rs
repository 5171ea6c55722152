//! `GET /sensors/{sensor_id}/analysis` – profile and anomaly tally for one sensor.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use sensorflow_analytics::{ReadingStore, SensorAnalysis, TimeWindow};
use serde::Deserialize;
use tracing::info;

use super::{ApiError, AppState};
use crate::Config;

// ---

pub fn router<S>() -> Router<AppState<S>>
where
    S: ReadingStore + Clone + 'static,
{
    // ---
    Router::new().route("/sensors/{sensor_id}/analysis", get(handler::<S>))
}

/// Query parameters for the analysis window.
#[derive(Debug, Default, Deserialize)]
pub struct WindowQuery {
    /// Days back from `now`; the configured default when omitted.
    pub window_days: Option<i64>,
    /// Ignore `window_days` and use the whole history.
    pub all_time: Option<bool>,
    /// Reference time for the window; the wall clock when omitted.
    pub now: Option<DateTime<Utc>>,
}

impl WindowQuery {
    // ---
    /// Resolve the requested window against the configured default.
    pub fn window(&self, config: &Config) -> Result<TimeWindow, ApiError> {
        // ---
        if self.all_time.unwrap_or(false) {
            return Ok(TimeWindow::AllTime);
        }
        match self.window_days {
            Some(days) => Ok(TimeWindow::from_days(Some(days))?),
            None => Ok(config.analysis_window()),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }
}

async fn handler<S>(
    Path(sensor_id): Path<String>,
    Query(params): Query<WindowQuery>,
    State((engine, config)): State<AppState<S>>,
) -> Result<Json<SensorAnalysis>, ApiError>
where
    S: ReadingStore + Clone + 'static,
{
    // ---
    info!("GET /sensors/{}/analysis - {:?}", sensor_id, params);

    let window = params.window(&config)?;
    let analysis = engine
        .analyze_sensor(&sensor_id, window, params.now())
        .await?;

    Ok(Json(analysis))
}
