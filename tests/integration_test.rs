//! Live checks against a running service backed by a populated database.
//!
//! Run with `BASE_URL=http://host:port cargo test -- --ignored`. The sensor
//! under test defaults to `device_001` and can be changed with `SENSOR_ID`.

use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Stats {
    mean: f64,
    stddev: f64,
    min: f64,
    max: f64,
}

#[derive(Debug, Deserialize)]
struct Profile {
    sensor_id: String,
    reading_count: usize,
    stats: Option<Stats>,
}

#[derive(Debug, Deserialize)]
struct AnomalyCounts {
    critical: usize,
    warning: usize,
    normal: usize,
}

#[derive(Debug, Deserialize)]
struct Analysis {
    profile: Profile,
    anomaly_counts: AnomalyCounts,
}

#[derive(Debug, Deserialize)]
struct Recommendation {
    similar_sensor_id: String,
    correlation: Option<f64>,
    temperature_difference: f64,
    label: String,
    rank: usize,
}

const LABELS: [&str; 5] = [
    "frequent_overheating",
    "frequent_undercooling",
    "unstable_operation",
    "moderate_deviation",
    "stable_operation",
];

fn base() -> String {
    std::env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:8080".into())
}

fn sensor() -> String {
    std::env::var("SENSOR_ID").unwrap_or_else(|_| "device_001".into())
}

#[tokio::test]
#[ignore = "requires a running service (BASE_URL)"]
async fn health_endpoint_ok() -> Result<()> {
    // ---
    let resp = Client::new().get(format!("{}/health", base())).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = resp.json().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running service (BASE_URL)"]
async fn analysis_endpoint_profile_is_consistent() -> Result<()> {
    // ---
    let url = format!("{}/sensors/{}/analysis?all_time=true", base(), sensor());
    let analysis: Analysis = Client::new().get(&url).send().await?.json().await?;

    assert_eq!(analysis.profile.sensor_id, sensor());
    assert!(analysis.profile.reading_count > 0, "No readings from {}", url);

    let stats = analysis.profile.stats.expect("profile with readings has stats");
    assert!(stats.min <= stats.mean && stats.mean <= stats.max);
    assert!(stats.stddev >= 0.0);

    let counts = &analysis.anomaly_counts;
    assert_eq!(
        counts.critical + counts.warning + counts.normal,
        analysis.profile.reading_count
    );
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running service (BASE_URL)"]
async fn analysis_endpoint_errors() -> Result<()> {
    // ---
    let client = Client::new();

    let url = format!("{}/sensors/no-such-sensor/analysis?all_time=true", base());
    assert_eq!(client.get(&url).send().await?.status(), StatusCode::NOT_FOUND);

    let url = format!("{}/sensors/{}/analysis?window_days=-1", base(), sensor());
    assert_eq!(client.get(&url).send().await?.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running service (BASE_URL)"]
async fn recommendations_endpoint_respects_filters() -> Result<()> {
    // ---
    let url = format!(
        "{}/sensors/{}/recommendations?proximity_band=5&limit=3",
        base(),
        sensor()
    );
    let recs: Vec<Recommendation> = Client::new().get(&url).send().await?.json().await?;

    assert!(recs.len() <= 3, "Limit filter failed");
    for (i, r) in recs.iter().enumerate() {
        assert_eq!(r.rank, i + 1);
        assert_ne!(r.similar_sensor_id, sensor());
        assert!(r.temperature_difference <= 5.0);
        assert!(LABELS.contains(&r.label.as_str()), "unexpected label {}", r.label);
        if let Some(c) = r.correlation {
            assert!((-1.0..=1.0).contains(&c));
        }
    }
    Ok(())
}
