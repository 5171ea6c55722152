//! Analytics Facade: composes the profiler, classifier, matcher and
//! recommendation generator on top of a [`ReadingStore`].
//!
//! The engine holds no state between calls besides its store handle. The
//! current time is always an explicit argument so results are reproducible.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::classifier::{classify_all, AnomalyCounts};
use super::matcher::{find_similar, MatchParams, SensorSeries};
use super::profiler::{profile, SensorProfile};
use super::recommend::Recommendation;
use crate::error::{AnalyticsError, Result};
use crate::models::{SensorReading, TimeWindow};
use crate::store::ReadingStore;

// ---

/// Result of [`AnalyticsEngine::analyze_sensor`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorAnalysis {
    // ---
    pub profile: SensorProfile,
    pub anomaly_counts: AnomalyCounts,
}

/// Public entry point of the engine.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine<S> {
    store: S,
}

impl<S: ReadingStore> AnalyticsEngine<S> {
    // ---
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Profile one sensor over `window` and tally its readings by anomaly tier.
    ///
    /// Fails with `SensorNotFound` when the window holds no readings for the
    /// sensor.
    #[tracing::instrument(skip(self))]
    pub async fn analyze_sensor(
        &self,
        sensor_id: &str,
        window: TimeWindow,
        now: DateTime<Utc>,
    ) -> Result<SensorAnalysis> {
        // ---
        let readings: Vec<SensorReading> = self
            .store
            .fetch_readings(Some(sensor_id), window.cutoff(now))
            .await?
            .into_iter()
            .filter(|r| window.contains(r.timestamp, now))
            .collect();

        debug!("fetched {} readings", readings.len());

        let profile = profile(sensor_id, &readings, window, now);
        if !profile.has_data() {
            warn!("no readings in window");
            return Err(AnalyticsError::SensorNotFound {
                sensor_id: sensor_id.to_string(),
            });
        }

        let anomaly_counts = classify_all(&readings, &profile)?;
        info!(
            "analyzed {} readings: {} critical, {} warning",
            profile.reading_count, anomaly_counts.critical, anomaly_counts.warning
        );

        Ok(SensorAnalysis {
            profile,
            anomaly_counts,
        })
    }

    /// Rank sensors with similar whole-history behaviour and attach a
    /// maintenance label to each, numbered from 1 in output order.
    ///
    /// An empty list means nothing qualified; `SensorNotFound` means the store
    /// holds no readings for the target at all.
    #[tracing::instrument(skip(self))]
    pub async fn recommend_for_sensor(
        &self,
        sensor_id: &str,
        params: MatchParams,
    ) -> Result<Vec<Recommendation>> {
        // ---
        params.validate()?;

        let readings = self.store.fetch_readings(None, None).await?;
        let grouped = group_by_sensor(readings);

        if !grouped.iter().any(|(id, _)| id == sensor_id) {
            warn!("target has no readings");
            return Err(AnalyticsError::SensorNotFound {
                sensor_id: sensor_id.to_string(),
            });
        }

        let universe: Vec<SensorSeries> = grouped
            .par_iter()
            .map(|(id, rs)| SensorSeries::all_time(id, rs))
            .collect();

        let recommendations: Vec<Recommendation> = find_similar(sensor_id, &universe, &params)?
            .iter()
            .enumerate()
            .map(|(i, candidate)| Recommendation::from_candidate(candidate, i + 1))
            .collect();

        info!(
            "{} recommendations from {} sensors",
            recommendations.len(),
            universe.len()
        );
        Ok(recommendations)
    }

    /// Profile every sensor with readings in `window`, hottest maximum first.
    #[tracing::instrument(skip(self))]
    pub async fn fleet_overview(
        &self,
        window: TimeWindow,
        now: DateTime<Utc>,
    ) -> Result<Vec<SensorProfile>> {
        // ---
        let readings = self.store.fetch_readings(None, window.cutoff(now)).await?;
        let grouped = group_by_sensor(readings);

        let mut profiles: Vec<SensorProfile> = grouped
            .par_iter()
            .map(|(id, rs)| profile(id, rs, window, now))
            .filter(SensorProfile::has_data)
            .collect();

        profiles.sort_by(|a, b| {
            let a_max = a.max_temperature().unwrap_or(f64::NEG_INFINITY);
            let b_max = b.max_temperature().unwrap_or(f64::NEG_INFINITY);
            b_max
                .total_cmp(&a_max)
                .then_with(|| a.sensor_id.cmp(&b.sensor_id))
        });

        info!("profiled {} sensors", profiles.len());
        Ok(profiles)
    }
}

/// Split a mixed reading stream into per-sensor series, ordered by sensor id.
fn group_by_sensor(readings: Vec<SensorReading>) -> Vec<(String, Vec<SensorReading>)> {
    // ---
    let mut grouped: BTreeMap<String, Vec<SensorReading>> = BTreeMap::new();
    for reading in readings {
        grouped
            .entry(reading.sensor_id.clone())
            .or_default()
            .push(reading);
    }
    grouped.into_iter().collect()
}
