//! Error taxonomy for the analytics engine.
//!
//! Every variant is recoverable and reported to the immediate caller. The
//! engine performs no retries; numeric edge cases degrade to defined values
//! instead of surfacing here.

use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// Errors returned by the analytics engine.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// The target sensor has zero readings in the requested scope.
    #[error("Sensor not found: no readings for '{sensor_id}'")]
    SensorNotFound { sensor_id: String },

    /// Too few samples to compute a meaningful profile.
    #[error("Insufficient data for '{sensor_id}': required {required}, got {got}")]
    InsufficientData {
        sensor_id: String,
        required: usize,
        got: usize,
    },

    /// A caller-supplied parameter is out of range.
    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The reading store failed to answer a query.
    #[error("Reading store error: {0}")]
    Store(#[from] StoreError),
}

impl AnalyticsError {
    // ---
    /// Short machine-readable kind, used by callers for status mapping.
    pub fn kind(&self) -> &'static str {
        // ---
        match self {
            Self::SensorNotFound { .. } => "sensor_not_found",
            Self::InsufficientData { .. } => "insufficient_data",
            Self::InvalidParameter { .. } => "invalid_parameter",
            Self::Store(_) => "store_error",
        }
    }
}

/// Failure reported by a [`ReadingStore`](crate::ReadingStore) implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend rejected or failed the query.
    #[error("backend query failed: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    // ---
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_error_display() {
        // ---
        let err = AnalyticsError::InsufficientData {
            sensor_id: "device_001".into(),
            required: 2,
            got: 1,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient data for 'device_001': required 2, got 1"
        );

        let err = AnalyticsError::SensorNotFound {
            sensor_id: "ghost".into(),
        };
        assert_eq!(err.to_string(), "Sensor not found: no readings for 'ghost'");

        let err = AnalyticsError::InvalidParameter {
            name: "limit".into(),
            reason: "must be at least 1".into(),
        };
        assert_eq!(err.to_string(), "Invalid parameter: limit - must be at least 1");
    }

    #[test]
    fn test_store_error_source_chain() {
        // ---
        let io = std::io::Error::new(std::io::ErrorKind::Other, "connection reset");
        let err: AnalyticsError = StoreError::backend(io).into();

        assert_eq!(err.kind(), "store_error");
        assert!(err.to_string().contains("connection reset"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
