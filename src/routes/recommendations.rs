//! `GET /sensors/{sensor_id}/recommendations` – similar sensors with
//! maintenance labels, best match first.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use sensorflow_analytics::{MatchParams, ReadingStore, Recommendation};
use serde::Deserialize;
use tracing::info;

use super::{ApiError, AppState};

// ---

pub fn router<S>() -> Router<AppState<S>>
where
    S: ReadingStore + Clone + 'static,
{
    // ---
    Router::new().route("/sensors/{sensor_id}/recommendations", get(handler::<S>))
}

/// Overrides for the configured similarity parameters.
#[derive(Debug, Default, Deserialize)]
pub struct MatchQuery {
    min_sample_size: Option<usize>,
    proximity_band: Option<f64>,
    limit: Option<usize>,
}

impl MatchQuery {
    // ---
    fn apply(&self, defaults: MatchParams) -> MatchParams {
        // ---
        MatchParams {
            min_sample_size: self.min_sample_size.unwrap_or(defaults.min_sample_size),
            proximity_band: self.proximity_band.unwrap_or(defaults.proximity_band),
            limit: self.limit.unwrap_or(defaults.limit),
        }
    }
}

async fn handler<S>(
    Path(sensor_id): Path<String>,
    Query(query): Query<MatchQuery>,
    State((engine, config)): State<AppState<S>>,
) -> Result<Json<Vec<Recommendation>>, ApiError>
where
    S: ReadingStore + Clone + 'static,
{
    // ---
    info!("GET /sensors/{}/recommendations - {:?}", sensor_id, query);

    let params = query.apply(config.match_params);
    let recommendations = engine.recommend_for_sensor(&sensor_id, params).await?;

    info!("Returning {} recommendations", recommendations.len());
    Ok(Json(recommendations))
}
