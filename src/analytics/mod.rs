//! Analytics gateway (EMBP).
//!
//! Data flow: readings → [`profile`] → {[`classify`], [`find_similar`]} →
//! [`recommend`] → [`AnalyticsEngine`].

mod classifier;
mod engine;
mod matcher;
mod profiler;
mod recommend;

pub use classifier::{classify, classify_all, AnomalyCounts, AnomalyTier};
pub use engine::{AnalyticsEngine, SensorAnalysis};
pub use matcher::{find_similar, MatchParams, SensorSeries, SimilarityCandidate};
pub use profiler::{profile, SensorProfile, TemperatureStats};
pub use recommend::{recommend, Recommendation, RecommendationLabel};
