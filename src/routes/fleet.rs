//! `GET /fleet` – every sensor's profile, hottest maximum first.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use sensorflow_analytics::{ReadingStore, SensorProfile};
use tracing::info;

use super::analysis::WindowQuery;
use super::{ApiError, AppState};

// ---

pub fn router<S>() -> Router<AppState<S>>
where
    S: ReadingStore + Clone + 'static,
{
    // ---
    Router::new().route("/fleet", get(handler::<S>))
}

async fn handler<S>(
    Query(params): Query<WindowQuery>,
    State((engine, config)): State<AppState<S>>,
) -> Result<Json<Vec<SensorProfile>>, ApiError>
where
    S: ReadingStore + Clone + 'static,
{
    // ---
    info!("GET /fleet - {:?}", params);

    let window = params.window(&config)?;
    let profiles = engine.fleet_overview(window, params.now()).await?;

    info!("Returning {} sensor profiles", profiles.len());
    Ok(Json(profiles))
}
