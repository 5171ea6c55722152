//! Core analytics engine for the `sensorflow-analytics` service.
//!
//! Turns a stream of raw temperature readings into per-sensor statistical
//! profiles, classifies individual readings as normal or anomalous, and finds
//! sensors with similar behaviour to produce maintenance recommendations.
//!
//! The engine is storage-agnostic. Readings arrive through the
//! [`ReadingStore`] boundary; the PostgreSQL implementation and the HTTP
//! surface live in the service binary, not here.
//!
//! Module layout follows the Explicit Module Boundary Pattern (EMBP): each
//! module exports a small surface and this file is the single gateway.

pub mod analytics;
pub mod error;
pub mod models;
pub mod store;

pub use analytics::{
    classify, classify_all, find_similar, profile, recommend, AnalyticsEngine, AnomalyCounts,
    AnomalyTier, MatchParams, Recommendation, RecommendationLabel, SensorAnalysis, SensorProfile,
    SensorSeries, SimilarityCandidate, TemperatureStats,
};
pub use error::{AnalyticsError, Result, StoreError};
pub use models::{SensorReading, TimeWindow};
pub use store::{MemoryStore, ReadingStore};
