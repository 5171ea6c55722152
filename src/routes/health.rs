// src/routes/health.rs
//! Liveness endpoint for the analytics service.
//!
//! Used by container orchestrators and CI pipelines to check that the process
//! is up and answering HTTP. Follows the Explicit Module Boundary Pattern
//! (EMBP): the handler stays private and only a subrouter is exported to the
//! gateway (`mod.rs`).

use axum::{routing::get, Json, Router};
use serde::Serialize;

/// JSON response body for the `/health` endpoint.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

/// Handle `GET /health`.
///
/// Never touches the reading store, so it stays green while the database is
/// unavailable.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Subrouter with the `/health` route, generic over the gateway's state.
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health))
}
