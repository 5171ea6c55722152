//! Statistics Profiler: aggregate temperature statistics for one sensor.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{SensorReading, TimeWindow};

// ---

/// Aggregate temperature statistics. Only exists when at least one reading
/// contributed, so "no data" is never confused with zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperatureStats {
    // ---
    pub mean: f64,
    /// Population standard deviation (divides by N).
    pub stddev: f64,
    pub min: f64,
    pub max: f64,
}

/// Derived, ephemeral profile of one sensor over a window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorProfile {
    // ---
    pub sensor_id: String,
    pub reading_count: usize,
    pub window: TimeWindow,
    pub stats: Option<TemperatureStats>,
}

impl SensorProfile {
    // ---
    pub fn mean_temperature(&self) -> Option<f64> {
        self.stats.map(|s| s.mean)
    }

    pub fn stddev_temperature(&self) -> Option<f64> {
        self.stats.map(|s| s.stddev)
    }

    pub fn min_temperature(&self) -> Option<f64> {
        self.stats.map(|s| s.min)
    }

    pub fn max_temperature(&self) -> Option<f64> {
        self.stats.map(|s| s.max)
    }

    /// Whether the profile carries statistics.
    pub fn has_data(&self) -> bool {
        self.reading_count > 0
    }
}

/// Profile one sensor's readings over `window`, relative to `now`.
///
/// `readings` must already be restricted to `sensor_id`. Readings older than
/// the window's cutoff are dropped, as are non-finite temperatures.
pub fn profile(
    sensor_id: &str,
    readings: &[SensorReading],
    window: TimeWindow,
    now: DateTime<Utc>,
) -> SensorProfile {
    // ---
    let temperatures = window_temperatures(readings, window.cutoff(now));
    profile_series(sensor_id, window, &temperatures)
}

/// Finite temperatures at or after `cutoff`, in input order.
pub(crate) fn window_temperatures(
    readings: &[SensorReading],
    cutoff: Option<DateTime<Utc>>,
) -> Vec<f64> {
    // ---
    readings
        .iter()
        .filter(|r| cutoff.map_or(true, |c| r.timestamp >= c))
        .map(|r| r.temperature)
        .filter(|t| t.is_finite())
        .collect()
}

/// Profile an already windowed temperature series.
pub(crate) fn profile_series(
    sensor_id: &str,
    window: TimeWindow,
    temperatures: &[f64],
) -> SensorProfile {
    // ---
    SensorProfile {
        sensor_id: sensor_id.to_string(),
        reading_count: temperatures.len(),
        window,
        stats: summarize(temperatures),
    }
}

/// Bulk aggregation over a materialized temperature series.
pub(crate) fn summarize(temperatures: &[f64]) -> Option<TemperatureStats> {
    // ---
    if temperatures.is_empty() {
        return None;
    }

    let n = temperatures.len() as f64;
    let min = temperatures.iter().copied().fold(f64::INFINITY, f64::min);
    let max = temperatures.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    // Rounding can push the mean of identical values a hair outside [min, max]
    let mean = (temperatures.iter().sum::<f64>() / n).clamp(min, max);
    let variance = temperatures.iter().map(|t| (t - mean).powi(2)).sum::<f64>() / n;

    Some(TemperatureStats {
        mean,
        stddev: variance.sqrt(),
        min,
        max,
    })
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap()
    }

    fn readings(temps: &[f64]) -> Vec<SensorReading> {
        // ---
        temps
            .iter()
            .enumerate()
            .map(|(i, &t)| SensorReading::new(i as i64, "S1", t, now() - Duration::hours(i as i64)))
            .collect()
    }

    /// Single-pass fold over (count, sum, sum of squares, min, max), the
    /// map-reduce formulation of the same statistics.
    fn fold_stats(temps: &[f64]) -> Option<TemperatureStats> {
        // ---
        let (count, sum, sum_sq, min, max) = temps.iter().fold(
            (0usize, 0.0f64, 0.0f64, f64::INFINITY, f64::NEG_INFINITY),
            |(c, s, sq, lo, hi), &t| (c + 1, s + t, sq + t * t, lo.min(t), hi.max(t)),
        );
        if count == 0 {
            return None;
        }
        let n = count as f64;
        let mean = sum / n;
        let variance = (sum_sq / n - mean * mean).max(0.0);
        Some(TemperatureStats {
            mean,
            stddev: variance.sqrt(),
            min,
            max,
        })
    }

    #[test]
    fn test_scenario_a_statistics() {
        // ---
        let p = profile("S1", &readings(&[18.0, 19.0, 20.0, 21.0, 60.0]), TimeWindow::AllTime, now());
        let stats = p.stats.unwrap();

        assert_eq!(p.reading_count, 5);
        assert_relative_eq!(stats.mean, 27.6, epsilon = 1e-12);
        // Population variance: (92.16 + 73.96 + 57.76 + 43.56 + 1049.76) / 5
        assert_relative_eq!(stats.stddev, 263.44f64.sqrt(), epsilon = 1e-9);
        assert_eq!(stats.min, 18.0);
        assert_eq!(stats.max, 60.0);
    }

    #[test]
    fn test_empty_profile_has_no_stats() {
        // ---
        let p = profile("S1", &[], TimeWindow::AllTime, now());
        assert_eq!(p.reading_count, 0);
        assert!(p.stats.is_none());
        assert!(!p.has_data());
        assert_eq!(p.mean_temperature(), None);
    }

    #[test]
    fn test_window_filters_old_readings() {
        // ---
        let mut rs = readings(&[10.0, 20.0]);
        rs.push(SensorReading::new(99, "S1", 100.0, now() - Duration::days(31)));
        rs.push(SensorReading::new(100, "S1", 30.0, now() - Duration::days(30)));

        let p = profile("S1", &rs, TimeWindow::LastDays(30), now());
        assert_eq!(p.reading_count, 3);
        assert_eq!(p.max_temperature(), Some(30.0));
        assert_eq!(p.window, TimeWindow::LastDays(30));

        let all = profile("S1", &rs, TimeWindow::AllTime, now());
        assert_eq!(all.reading_count, 4);
    }

    #[test]
    fn test_non_finite_readings_ignored() {
        // ---
        let p = profile("S1", &readings(&[f64::NAN, 5.0, f64::INFINITY, 7.0]), TimeWindow::AllTime, now());
        assert_eq!(p.reading_count, 2);
        assert_eq!(p.mean_temperature(), Some(6.0));
    }

    #[test]
    fn test_single_reading_has_zero_stddev() {
        // ---
        let p = profile("S1", &readings(&[-3.5]), TimeWindow::AllTime, now());
        let stats = p.stats.unwrap();
        assert_eq!(stats.stddev, 0.0);
        assert_eq!(stats.min, stats.max);
        assert_eq!(stats.mean, -3.5);
    }

    #[test]
    fn test_mean_within_bounds() {
        // ---
        let series: [&[f64]; 5] = [
            &[0.1, 0.1, 0.1],
            &[-20.0, 60.0],
            &[1e9, 1e9 + 1.0, 1e9 - 1.0],
            &[33.3; 7],
            &[-0.7, 12.25, 4.0, 59.9, -19.99],
        ];
        for temps in series {
            let s = profile("S1", &readings(temps), TimeWindow::AllTime, now()).stats.unwrap();
            assert!(s.min <= s.mean && s.mean <= s.max, "{temps:?} -> {s:?}");
            assert!(s.stddev >= 0.0);
        }
    }

    #[test]
    fn test_bulk_matches_fold() {
        // ---
        let temps = [18.5, -4.0, 22.1, 35.7, 19.9, 20.0, -12.3, 41.0, 0.0, 27.25];
        let bulk = summarize(&temps).unwrap();
        let folded = fold_stats(&temps).unwrap();

        assert_relative_eq!(bulk.mean, folded.mean, epsilon = 1e-9);
        assert_relative_eq!(bulk.stddev, folded.stddev, epsilon = 1e-9);
        assert_eq!(bulk.min, folded.min);
        assert_eq!(bulk.max, folded.max);
        assert!(fold_stats(&[]).is_none() && summarize(&[]).is_none());
    }
}
