use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::AnalysisError;
use crate::reading::FeedError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every message is written for direct display to the person who submitted the request.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Could not fetch live CGM data. {0}")]
    UpstreamFetch(String),

    #[error("Could not read live CGM data. {0}")]
    UpstreamData(String),

    #[error("Could not prepare the comparison. {0}")]
    AnalysisInput(String),

    #[error("Failed to analyze data. {0}")]
    InferenceFailure(String),

    #[error("The request took too long to complete. Please try again.")]
    Timeout,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Coarse failure category, so callers can tell a sensor outage from an analysis outage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Validation,
    Sensor,
    Analysis,
    Internal,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::UpstreamFetch(_) | AppError::UpstreamData(_) => ErrorKind::Sensor,
            AppError::AnalysisInput(_) | AppError::InferenceFailure(_) => ErrorKind::Analysis,
            AppError::Timeout | AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::UpstreamFetch(_) | AppError::UpstreamData(_) => StatusCode::BAD_GATEWAY,
            AppError::AnalysisInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InferenceFailure(_) => StatusCode::BAD_GATEWAY,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::UpstreamFetch(_) => "UPSTREAM_FETCH_ERROR",
            AppError::UpstreamData(_) => "UPSTREAM_DATA_ERROR",
            AppError::AnalysisInput(_) => "ANALYSIS_INPUT_ERROR",
            AppError::InferenceFailure(_) => "INFERENCE_FAILURE",
            AppError::Timeout => "REQUEST_TIMEOUT",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// The message shown to the caller. Internal details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
            other => {
                if other.kind() != ErrorKind::Validation {
                    tracing::error!("{}: {other}", other.code());
                }
                other.to_string()
            }
        }
    }
}

impl From<FeedError> for AppError {
    fn from(e: FeedError) -> Self {
        match e {
            FeedError::Fetch(msg) => AppError::UpstreamFetch(msg),
            FeedError::Data(msg) => AppError::UpstreamData(msg),
        }
    }
}

impl From<AnalysisError> for AppError {
    fn from(e: AnalysisError) -> Self {
        match e {
            AnalysisError::Input(msg) => AppError::AnalysisInput(msg),
            AnalysisError::Inference(msg) => AppError::InferenceFailure(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": self.public_message(),
            "code": self.code(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_errors_map_to_sensor_kind() {
        let fetch: AppError = FeedError::Fetch("status 503".to_string()).into();
        let data: AppError = FeedError::Data("bad value".to_string()).into();
        assert!(matches!(fetch, AppError::UpstreamFetch(_)));
        assert!(matches!(data, AppError::UpstreamData(_)));
        assert_eq!(fetch.kind(), ErrorKind::Sensor);
        assert_eq!(data.kind(), ErrorKind::Sensor);
        assert_eq!(fetch.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_analysis_errors_map_to_analysis_kind() {
        let input: AppError = AnalysisError::Input("NaN".to_string()).into();
        let inference: AppError = AnalysisError::Inference("missing field".to_string()).into();
        assert!(matches!(input, AppError::AnalysisInput(_)));
        assert!(matches!(inference, AppError::InferenceFailure(_)));
        assert_eq!(input.kind(), ErrorKind::Analysis);
        assert_eq!(inference.kind(), ErrorKind::Analysis);
    }

    #[test]
    fn test_validation_message_is_verbatim() {
        let err = AppError::Validation("Blood sugar value must be a positive number.".to_string());
        assert_eq!(err.public_message(), "Blood sugar value must be a positive number.");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_message_hides_details() {
        let err = AppError::Internal(anyhow::anyhow!("lock poisoned at history.rs"));
        assert_eq!(err.public_message(), "An internal server error occurred");
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_timeout_keeps_request_timeout_status() {
        let err = AppError::Timeout;
        assert_eq!(err.status_code(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(err.code(), "REQUEST_TIMEOUT");
        assert!(err.public_message().contains("took too long"));
    }
}
