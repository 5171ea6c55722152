//! Anomaly Classifier: severity tier of one reading against its sensor's profile.

use serde::Serialize;

use super::profiler::{SensorProfile, TemperatureStats};
use crate::error::{AnalyticsError, Result};
use crate::models::SensorReading;

// ---

/// Deviations strictly above this many standard deviations are warnings.
pub const WARNING_SIGMA: f64 = 2.0;

/// Deviations strictly above this many standard deviations are critical.
pub const CRITICAL_SIGMA: f64 = 3.0;

/// Severity of a reading, ordered `Normal < Warning < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnomalyTier {
    Normal,
    Warning,
    Critical,
}

/// Per-tier reading counts for a window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnomalyCounts {
    // ---
    pub critical: usize,
    pub warning: usize,
    pub normal: usize,
}

impl AnomalyCounts {
    // ---
    pub fn total(&self) -> usize {
        self.critical + self.warning + self.normal
    }

    fn record(&mut self, tier: AnomalyTier) {
        // ---
        match tier {
            AnomalyTier::Critical => self.critical += 1,
            AnomalyTier::Warning => self.warning += 1,
            AnomalyTier::Normal => self.normal += 1,
        }
    }
}

/// Classify a temperature against a profile using the 2σ/3σ rule.
///
/// Fails with `InsufficientData` when the profile carries no statistics.
pub fn classify(temperature: f64, profile: &SensorProfile) -> Result<AnomalyTier> {
    // ---
    let stats = require_stats(profile)?;
    Ok(tier_for(temperature, &stats))
}

/// Classify every finite reading and tally the tiers.
///
/// Each reading is classified independently; the result equals calling
/// [`classify`] per reading.
pub fn classify_all(readings: &[SensorReading], profile: &SensorProfile) -> Result<AnomalyCounts> {
    // ---
    let stats = require_stats(profile)?;

    let counts = readings
        .iter()
        .map(|r| r.temperature)
        .filter(|t| t.is_finite())
        .fold(AnomalyCounts::default(), |mut acc, t| {
            acc.record(tier_for(t, &stats));
            acc
        });

    tracing::debug!(
        sensor_id = %profile.sensor_id,
        critical = counts.critical,
        warning = counts.warning,
        normal = counts.normal,
        "classified readings"
    );
    Ok(counts)
}

fn require_stats(profile: &SensorProfile) -> Result<TemperatureStats> {
    // ---
    profile.stats.ok_or_else(|| AnalyticsError::InsufficientData {
        sensor_id: profile.sensor_id.clone(),
        required: 1,
        got: profile.reading_count,
    })
}

fn tier_for(temperature: f64, stats: &TemperatureStats) -> AnomalyTier {
    // ---
    let deviation = (temperature - stats.mean).abs();

    // Zero variance: anything off the mean is critical
    if stats.stddev == 0.0 {
        return if deviation == 0.0 {
            AnomalyTier::Normal
        } else {
            AnomalyTier::Critical
        };
    }

    if deviation > CRITICAL_SIGMA * stats.stddev {
        AnomalyTier::Critical
    } else if deviation > WARNING_SIGMA * stats.stddev {
        AnomalyTier::Warning
    } else {
        AnomalyTier::Normal
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::analytics::profile;
    use crate::models::TimeWindow;
    use chrono::{TimeZone, Utc};

    fn readings(temps: &[f64]) -> Vec<SensorReading> {
        // ---
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap();
        temps
            .iter()
            .enumerate()
            .map(|(i, &t)| SensorReading::new(i as i64, "S1", t, ts))
            .collect()
    }

    fn profile_of(temps: &[f64]) -> SensorProfile {
        // ---
        let now = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        profile("S1", &readings(temps), TimeWindow::AllTime, now)
    }

    fn fixed_profile(mean: f64, stddev: f64) -> SensorProfile {
        // ---
        SensorProfile {
            sensor_id: "S1".into(),
            reading_count: 100,
            window: TimeWindow::AllTime,
            stats: Some(TemperatureStats {
                mean,
                stddev,
                min: mean - 10.0 * stddev,
                max: mean + 10.0 * stddev,
            }),
        }
    }

    #[test]
    fn test_zero_variance_rule() {
        // ---
        let p = profile_of(&[20.0; 5]);
        assert_eq!(classify(20.0, &p).unwrap(), AnomalyTier::Normal);
        assert_eq!(classify(21.0, &p).unwrap(), AnomalyTier::Critical);
        assert_eq!(classify(19.999, &p).unwrap(), AnomalyTier::Critical);
    }

    #[test]
    fn test_scenario_a_outlier() {
        // ---
        // mean 27.6, sigma = sqrt(263.44) ~ 16.23; 60 deviates by 32.4 (~2.0 sigma)
        let p = profile_of(&[18.0, 19.0, 20.0, 21.0, 60.0]);
        let sigma = p.stddev_temperature().unwrap();
        assert!(32.4 < 2.0 * sigma);
        assert_eq!(classify(60.0, &p).unwrap(), AnomalyTier::Normal);
        assert_eq!(classify(27.6 + 2.5 * sigma, &p).unwrap(), AnomalyTier::Warning);
        assert_eq!(classify(27.6 - 3.5 * sigma, &p).unwrap(), AnomalyTier::Critical);
    }

    #[test]
    fn test_threshold_boundaries() {
        // ---
        let p = fixed_profile(10.0, 2.0);
        assert_eq!(classify(14.0, &p).unwrap(), AnomalyTier::Normal); // exactly 2 sigma
        assert_eq!(classify(14.5, &p).unwrap(), AnomalyTier::Warning);
        assert_eq!(classify(16.0, &p).unwrap(), AnomalyTier::Warning); // exactly 3 sigma
        assert_eq!(classify(16.5, &p).unwrap(), AnomalyTier::Critical);
        assert_eq!(classify(3.5, &p).unwrap(), AnomalyTier::Critical);
    }

    #[test]
    fn test_monotonic_in_deviation() {
        // ---
        let p = fixed_profile(-2.0, 1.5);
        let mut previous = AnomalyTier::Normal;
        for step in 0..80u32 {
            let deviation = f64::from(step) * 0.125;
            let tier = classify(-2.0 + deviation, &p).unwrap();
            assert!(tier >= previous, "tier dropped at deviation {deviation}");
            assert_eq!(classify(-2.0 - deviation, &p).unwrap(), tier);
            previous = tier;
        }
        assert_eq!(previous, AnomalyTier::Critical);
    }

    #[test]
    fn test_empty_profile_is_insufficient() {
        // ---
        let p = profile_of(&[]);
        assert!(matches!(
            classify(1.0, &p),
            Err(AnalyticsError::InsufficientData { got: 0, .. })
        ));
        assert!(classify_all(&readings(&[1.0]), &p).is_err());
    }

    #[test]
    fn test_batch_matches_individual() {
        // ---
        let temps = [10.0, 11.0, 9.5, 10.2, 30.0, -8.0, 10.1, 9.9, 14.0, f64::NAN];
        let rs = readings(&temps);
        let p = profile_of(&temps);

        let mut expected = AnomalyCounts::default();
        for t in temps.iter().filter(|t| t.is_finite()) {
            expected.record(classify(*t, &p).unwrap());
        }

        let counts = classify_all(&rs, &p).unwrap();
        assert_eq!(counts, expected);
        assert_eq!(counts.total(), p.reading_count);
    }

    #[test]
    fn test_tier_ordering() {
        // ---
        assert!(AnomalyTier::Normal < AnomalyTier::Warning);
        assert!(AnomalyTier::Warning < AnomalyTier::Critical);
    }
}
