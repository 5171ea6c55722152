//! Configuration loader for the `sensorflow-analytics` service.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller). By consolidating configuration logic here, we
//! avoid scattering `env::var` calls throughout the codebase.
//!
//! Loading goes through a variable lookup function so tests can supply their
//! own variables without touching the process environment.
use std::env;

use anyhow::{anyhow, Result};
use sensorflow_analytics::{MatchParams, TimeWindow};

/// Parse an optional environment variable into `$ty` with a default value.
macro_rules! parse_env {
    ($lookup:expr, $var_name:expr, $ty:ty, $default:expr) => {
        $lookup($var_name)
            .map(|v| v.trim().parse::<$ty>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse a required string environment variable.
macro_rules! require_env {
    ($lookup:expr, $var_name:expr) => {
        $lookup($var_name).ok_or_else(|| anyhow!("{} must be set in .env or environment", $var_name))?
    };
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// PostgreSQL connection string.
    pub db_url: String,

    /// Maximum number of database connections in the pool.
    pub db_pool_max: u32,

    /// Port the HTTP server binds to.
    pub listen_port: u16,

    /// Default window for `/sensors/{id}/analysis` when the caller omits one.
    pub analysis_window_days: u32,

    /// Default similarity parameters for `/sensors/{id}/recommendations`.
    pub match_params: MatchParams,
}

/// Load configuration from the process environment.
///
/// Required:
/// - `DATABASE_URL` – PostgreSQL connection string
///
/// Optional:
/// - `DB_POOL_MAX` – max DB connections (default: 5)
/// - `LISTEN_PORT` – HTTP port (default: 8080)
/// - `ANALYSIS_WINDOW_DAYS` – default analysis window (default: 30)
/// - `MIN_SAMPLE_SIZE` – minimum candidate readings (default: 10)
/// - `PROXIMITY_BAND` – mean temperature tolerance in °C (default: 5.0)
/// - `RECOMMENDATION_LIMIT` – maximum recommendations (default: 5)
///
/// Returns an error if any required variable is missing or invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    load_with(|name| env::var(name).ok())
}

/// Load configuration through an arbitrary variable lookup.
pub fn load_with<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    // ---
    let defaults = MatchParams::windowed();

    let db_url = require_env!(lookup, "DATABASE_URL");
    let db_pool_max = parse_env!(lookup, "DB_POOL_MAX", u32, 5);
    let listen_port = parse_env!(lookup, "LISTEN_PORT", u16, 8080);
    let analysis_window_days = parse_env!(lookup, "ANALYSIS_WINDOW_DAYS", u32, 30);
    let match_params = MatchParams {
        min_sample_size: parse_env!(lookup, "MIN_SAMPLE_SIZE", usize, defaults.min_sample_size),
        proximity_band: parse_env!(lookup, "PROXIMITY_BAND", f64, defaults.proximity_band),
        limit: parse_env!(lookup, "RECOMMENDATION_LIMIT", usize, defaults.limit),
    };

    match_params
        .validate()
        .map_err(|e| anyhow!("Invalid similarity defaults: {}", e))?;

    Ok(Config {
        db_url,
        db_pool_max,
        listen_port,
        analysis_window_days,
        match_params,
    })
}

impl Config {
    /// Default analysis window as a [`TimeWindow`].
    pub fn analysis_window(&self) -> TimeWindow {
        TimeWindow::LastDays(self.analysis_window_days)
    }

    /// Log the loaded configuration for debugging purposes.
    ///
    /// Masks sensitive information like database passwords while showing
    /// all configuration values that were loaded.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  DATABASE_URL         : {}", mask_db_url(&self.db_url));
        tracing::info!("  DB_POOL_MAX          : {}", self.db_pool_max);
        tracing::info!("  LISTEN_PORT          : {}", self.listen_port);
        tracing::info!("  ANALYSIS_WINDOW_DAYS : {}", self.analysis_window_days);
        tracing::info!("  MIN_SAMPLE_SIZE      : {}", self.match_params.min_sample_size);
        tracing::info!("  PROXIMITY_BAND       : {}", self.match_params.proximity_band);
        tracing::info!("  RECOMMENDATION_LIMIT : {}", self.match_params.limit);
    }
}

/// Replace the password in a connection string with `****`.
pub fn mask_db_url(db_url: &str) -> String {
    // ---
    match db_url.rfind('@') {
        Some(at_pos) => match db_url[..at_pos].rfind(':') {
            // A colon right after "scheme:/" belongs to the scheme, not a password
            Some(colon_pos) if !db_url[colon_pos..].starts_with("://") => {
                format!("{}:****{}", &db_url[..colon_pos], &db_url[at_pos..])
            }
            _ => db_url.to_string(),
        },
        None => db_url.to_string(),
    }
}
