//! Route gateway (EMBP).
//!
//! Each sibling module exports a subrouter; this gateway merges them and
//! attaches the shared state so `main.rs` never sees individual endpoints.
//! Handlers are generic over the reading store so the same routes serve the
//! PostgreSQL store in production and in-memory stores elsewhere.

use axum::Router;
use sensorflow_analytics::{AnalyticsEngine, ReadingStore};

use crate::Config;

mod analysis;
mod error;
mod fleet;
mod health;
mod recommendations;

pub use error::ApiError;

/// Shared state handed to every handler.
pub type AppState<S> = (AnalyticsEngine<S>, Config);

// ---

pub fn router<S>(engine: AnalyticsEngine<S>, config: Config) -> Router
where
    S: ReadingStore + Clone + 'static,
{
    // ---
    Router::new()
        .merge(analysis::router())
        .merge(recommendations::router())
        .merge(fleet::router())
        .merge(health::router())
        .with_state((engine, config))
}
