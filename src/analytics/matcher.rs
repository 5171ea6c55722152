//! Similarity Matcher: rank other sensors against a target sensor's profile.
//!
//! Candidates are pre-filtered by sample size and by a proximity band around
//! the target's mean, then ranked by closeness of means and by stability.
//! Per-candidate work runs on the rayon pool; ranking only starts once every
//! candidate has been computed.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;

use super::profiler::{profile_series, window_temperatures, SensorProfile};
use crate::error::{AnalyticsError, Result};
use crate::models::{SensorReading, TimeWindow};

// ---

/// Readings strictly above this temperature count as high-temperature events.
pub const HIGH_TEMPERATURE_THRESHOLD: f64 = 35.0;

/// Readings strictly below this temperature count as low-temperature events.
pub const LOW_TEMPERATURE_THRESHOLD: f64 = -5.0;

/// Fewest target readings for which a standard deviation means anything.
pub const MIN_TARGET_SAMPLES: usize = 2;

/// Minimum candidate sample size for per-window matching.
pub const WINDOWED_MIN_SAMPLE_SIZE: usize = 10;

/// Minimum candidate sample size for whole-history matching.
pub const BASIC_MIN_SAMPLE_SIZE: usize = 50;

pub const DEFAULT_PROXIMITY_BAND: f64 = 5.0;
pub const DEFAULT_LIMIT: usize = 5;

/// Knobs for [`find_similar`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchParams {
    // ---
    pub min_sample_size: usize,
    /// Maximum absolute difference of means, in °C.
    pub proximity_band: f64,
    pub limit: usize,
}

impl MatchParams {
    // ---
    /// Preset for per-window analysis (minimum sample size 10).
    pub fn windowed() -> Self {
        Self {
            min_sample_size: WINDOWED_MIN_SAMPLE_SIZE,
            proximity_band: DEFAULT_PROXIMITY_BAND,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Preset for whole-history "basic" matching (minimum sample size 50).
    pub fn basic() -> Self {
        Self {
            min_sample_size: BASIC_MIN_SAMPLE_SIZE,
            ..Self::windowed()
        }
    }

    pub fn validate(&self) -> Result<()> {
        // ---
        if self.min_sample_size < 1 {
            return Err(invalid("min_sample_size", "must be at least 1"));
        }
        if self.limit < 1 {
            return Err(invalid("limit", "must be at least 1"));
        }
        if !self.proximity_band.is_finite() || self.proximity_band < 0.0 {
            return Err(invalid(
                "proximity_band",
                &format!("must be a non-negative number, got {}", self.proximity_band),
            ));
        }
        Ok(())
    }
}

impl Default for MatchParams {
    fn default() -> Self {
        Self::windowed()
    }
}

fn invalid(name: &str, reason: &str) -> AnalyticsError {
    AnalyticsError::InvalidParameter {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

/// A sensor's profile together with the temperature series it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorSeries {
    // ---
    pub profile: SensorProfile,
    pub temperatures: Vec<f64>,
}

impl SensorSeries {
    // ---
    /// Profile `readings` (already restricted to `sensor_id`) over `window`
    /// and keep the series that contributed to the profile.
    pub fn from_readings(
        sensor_id: &str,
        readings: &[SensorReading],
        window: TimeWindow,
        now: DateTime<Utc>,
    ) -> Self {
        // ---
        let temperatures = window_temperatures(readings, window.cutoff(now));
        Self {
            profile: profile_series(sensor_id, window, &temperatures),
            temperatures,
        }
    }

    /// Same as [`SensorSeries::from_readings`] over the whole history.
    pub fn all_time(sensor_id: &str, readings: &[SensorReading]) -> Self {
        // ---
        let temperatures = window_temperatures(readings, None);
        Self {
            profile: profile_series(sensor_id, TimeWindow::AllTime, &temperatures),
            temperatures,
        }
    }

    pub fn sensor_id(&self) -> &str {
        &self.profile.sensor_id
    }
}

/// A non-target sensor that passed the pre-filters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityCandidate {
    // ---
    pub sensor_id: String,
    pub profile: SensorProfile,
    pub temperature_difference: f64,
    /// `None` when either compared series has zero variance.
    pub correlation: Option<f64>,
    pub high_temperature_events: usize,
    pub low_temperature_events: usize,
    /// Temperature range divided by sample count; lower is steadier.
    pub stability_score: f64,
}

/// Find sensors similar to `target_sensor_id` within `universe`.
///
/// `universe` holds every sensor's series, the target's included. An empty
/// result is a success; only a missing or too-thin target is an error.
pub fn find_similar(
    target_sensor_id: &str,
    universe: &[SensorSeries],
    params: &MatchParams,
) -> Result<Vec<SimilarityCandidate>> {
    // ---
    params.validate()?;

    let target = universe
        .iter()
        .find(|s| s.sensor_id() == target_sensor_id)
        .map(|s| &s.profile);

    let got = target.map_or(0, |p| p.reading_count);
    let target_mean = match target.and_then(|p| p.mean_temperature()) {
        Some(mean) if got >= MIN_TARGET_SAMPLES => mean,
        _ => {
            return Err(AnalyticsError::InsufficientData {
                sensor_id: target_sensor_id.to_string(),
                required: MIN_TARGET_SAMPLES,
                got,
            })
        }
    };

    let mut candidates: Vec<SimilarityCandidate> = universe
        .par_iter()
        .filter(|s| s.sensor_id() != target_sensor_id)
        .filter(|s| s.profile.reading_count >= params.min_sample_size)
        .filter_map(|s| evaluate(s, target_mean, params.proximity_band))
        .collect();

    let qualified = candidates.len();
    candidates.sort_by(rank_order);
    candidates.truncate(params.limit);

    tracing::debug!(
        target_sensor = target_sensor_id,
        universe = universe.len(),
        qualified,
        returned = candidates.len(),
        "similarity search complete"
    );
    Ok(candidates)
}

/// Compute a candidate's comparison fields, or `None` if it lies outside the band.
fn evaluate(series: &SensorSeries, target_mean: f64, band: f64) -> Option<SimilarityCandidate> {
    // ---
    let stats = series.profile.stats?;
    let temperature_difference = (stats.mean - target_mean).abs();
    if temperature_difference > band {
        return None;
    }

    let temps = &series.temperatures;
    let distances: Vec<f64> = temps.iter().map(|t| (t - target_mean).abs()).collect();

    Some(SimilarityCandidate {
        sensor_id: series.profile.sensor_id.clone(),
        profile: series.profile.clone(),
        temperature_difference,
        correlation: pearson(temps, &distances),
        high_temperature_events: temps
            .iter()
            .filter(|&&t| t > HIGH_TEMPERATURE_THRESHOLD)
            .count(),
        low_temperature_events: temps
            .iter()
            .filter(|&&t| t < LOW_TEMPERATURE_THRESHOLD)
            .count(),
        stability_score: (stats.max - stats.min) / series.profile.reading_count as f64,
    })
}

/// Closer means first, then steadier sensors, then defined correlations;
/// `sensor_id` makes the order total.
fn rank_order(a: &SimilarityCandidate, b: &SimilarityCandidate) -> Ordering {
    // ---
    a.temperature_difference
        .total_cmp(&b.temperature_difference)
        .then_with(|| a.stability_score.total_cmp(&b.stability_score))
        .then_with(|| b.correlation.is_some().cmp(&a.correlation.is_some()))
        .then_with(|| a.sensor_id.cmp(&b.sensor_id))
}

/// Pearson correlation coefficient, `None` for degenerate input.
pub(crate) fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    // ---
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let (cov, var_x, var_y) = xs.iter().zip(ys).fold((0.0f64, 0.0f64, 0.0f64), |(c, vx, vy), (x, y)| {
        let dx = x - mean_x;
        let dy = y - mean_y;
        (c + dx * dy, vx + dx * dx, vy + dy * dy)
    });

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}
