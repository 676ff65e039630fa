//! Application error type mapping to HTTP status codes.
//!
//! Business rejections (duplicate vote, unknown comment) are NOT errors --
//! handlers render those as 200 responses with `"success": false`. Only
//! malformed input and storage failures surface here.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use agora_types::error::EngagementError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Input failed validation (blank identity, empty body, oversized comment).
    Validation(String),
    /// Storage layer failure or timeout.
    Storage(String),
}

impl From<EngagementError> for AppError {
    fn from(e: EngagementError) -> Self {
        match e {
            EngagementError::Validation(msg) => AppError::Validation(msg),
            EngagementError::Storage(msg) => AppError::Storage(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Storage(msg) => {
                tracing::warn!(error = %msg, "request failed in storage");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = json!({ "error": message });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let resp = AppError::Validation("comment cannot be empty".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_storage_maps_to_internal_error() {
        let resp = AppError::Storage("query error: locked".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_engagement_error_conversion_preserves_message() {
        let err = EngagementError::Validation("resource id cannot be empty".to_string());
        match AppError::from(err) {
            AppError::Validation(msg) => assert_eq!(msg, "resource id cannot be empty"),
            other => panic!("expected Validation, got {other:?}"),
        }
    }
}
