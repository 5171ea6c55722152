//! Recommendation Generator: map a matched candidate onto a maintenance label.

use std::fmt;

use serde::Serialize;

use super::matcher::SimilarityCandidate;

// ---

/// More high-temperature events than this means frequent overheating.
pub const OVERHEATING_EVENT_LIMIT: usize = 10;

/// More low-temperature events than this means frequent undercooling.
pub const UNDERCOOLING_EVENT_LIMIT: usize = 10;

/// Stability scores above this are unstable operation.
pub const UNSTABLE_SCORE_LIMIT: f64 = 2.0;

/// Mean differences above this (°C) are a moderate deviation from the norm.
pub const DEVIATION_LIMIT: f64 = 3.0;

/// Fixed set of maintenance labels, declared from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationLabel {
    FrequentOverheating,
    FrequentUndercooling,
    UnstableOperation,
    ModerateDeviation,
    StableOperation,
}

impl RecommendationLabel {
    // ---
    pub const ALL: [Self; 5] = [
        Self::FrequentOverheating,
        Self::FrequentUndercooling,
        Self::UnstableOperation,
        Self::ModerateDeviation,
        Self::StableOperation,
    ];

    /// Human-readable label text.
    pub fn as_str(&self) -> &'static str {
        // ---
        match self {
            Self::FrequentOverheating => "frequent overheating",
            Self::FrequentUndercooling => "frequent undercooling",
            Self::UnstableOperation => "unstable operation",
            Self::ModerateDeviation => "moderate deviation from norm",
            Self::StableOperation => "stable operation",
        }
    }

    /// Presentation rank: 5 is stable, 1 is overheating. Never used to filter.
    pub fn quality_score(&self) -> u8 {
        // ---
        match self {
            Self::StableOperation => 5,
            Self::ModerateDeviation => 4,
            Self::UnstableOperation => 3,
            Self::FrequentUndercooling => 2,
            Self::FrequentOverheating => 1,
        }
    }
}

impl fmt::Display for RecommendationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ranked recommendation returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    // ---
    pub similar_sensor_id: String,
    pub correlation: Option<f64>,
    pub temperature_difference: f64,
    pub high_events: usize,
    pub low_events: usize,
    pub label: RecommendationLabel,
    /// 1-based position in the output.
    pub rank: usize,
}

impl Recommendation {
    // ---
    pub fn from_candidate(candidate: &SimilarityCandidate, rank: usize) -> Self {
        // ---
        Self {
            similar_sensor_id: candidate.sensor_id.clone(),
            correlation: candidate.correlation,
            temperature_difference: candidate.temperature_difference,
            high_events: candidate.high_temperature_events,
            low_events: candidate.low_temperature_events,
            label: recommend(candidate),
            rank,
        }
    }
}

/// Decision list, first match wins.
pub fn recommend(candidate: &SimilarityCandidate) -> RecommendationLabel {
    // ---
    if candidate.high_temperature_events > OVERHEATING_EVENT_LIMIT {
        RecommendationLabel::FrequentOverheating
    } else if candidate.low_temperature_events > UNDERCOOLING_EVENT_LIMIT {
        RecommendationLabel::FrequentUndercooling
    } else if candidate.stability_score > UNSTABLE_SCORE_LIMIT {
        RecommendationLabel::UnstableOperation
    } else if candidate.temperature_difference > DEVIATION_LIMIT {
        RecommendationLabel::ModerateDeviation
    } else {
        RecommendationLabel::StableOperation
    }
}
