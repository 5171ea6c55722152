//! Mapping of engine errors onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sensorflow_analytics::AnalyticsError;
use serde_json::json;
use tracing::{debug, error};

// ---

/// Wrapper so handlers can return engine errors with `?`.
#[derive(Debug)]
pub struct ApiError(pub AnalyticsError);

impl From<AnalyticsError> for ApiError {
    fn from(err: AnalyticsError) -> Self {
        Self(err)
    }
}

impl ApiError {
    // ---
    pub fn status(&self) -> StatusCode {
        // ---
        match &self.0 {
            AnalyticsError::SensorNotFound { .. } => StatusCode::NOT_FOUND,
            AnalyticsError::InsufficientData { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AnalyticsError::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
            AnalyticsError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // ---
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        } else {
            debug!("Request rejected ({}): {}", status, self.0);
        }

        let body = json!({
            "error": self.0.kind(),
            "message": self.0.to_string(),
        });
        (status, Json(body)).into_response()
    }
}
