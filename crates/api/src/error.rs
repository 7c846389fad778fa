//! API Error Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fact_collector::CollectError;
use thiserror::Error;

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// API error with HTTP status code
#[derive(Debug, Clone, Error)]
#[error("[{status}] {message}")]
pub struct ApiError {
    /// HTTP status code
    pub status: StatusCode,
    /// Error message
    pub message: String,
    /// Machine-readable error code
    pub code: Option<String>,
    /// Per-field details (validation failures)
    pub details: Vec<String>,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: None,
            details: Vec::new(),
        }
    }

    /// Create a new API error with code
    pub fn with_code(
        status: StatusCode,
        message: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            code: Some(code.into()),
            ..Self::new(status, message)
        }
    }

    /// 404 Not Found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::with_code(
            StatusCode::NOT_FOUND,
            format!("Resource not found: {}", resource.into()),
            "NOT_FOUND",
        )
    }

    /// 422 Unprocessable Entity
    pub fn validation(message: impl Into<String>, details: Vec<String>) -> Self {
        Self {
            details,
            ..Self::with_code(StatusCode::UNPROCESSABLE_ENTITY, message, "VALIDATION_ERROR")
        }
    }

    /// 500 Internal Server Error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::with_code(StatusCode::INTERNAL_SERVER_ERROR, message, "INTERNAL_ERROR")
    }

    /// 503 Service Unavailable
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::with_code(StatusCode::SERVICE_UNAVAILABLE, message, "SERVICE_UNAVAILABLE")
    }
}

impl From<CollectError> for ApiError {
    fn from(err: CollectError) -> Self {
        let details = err.errors().iter().map(ToString::to_string).collect();
        Self::validation("Please enter realistic values", details)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({
            "success": false,
            "error": self.message,
            "code": self.code,
            "details": self.details,
        }));

        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fact_collector::ValidationError;

    #[test]
    fn test_collect_error_maps_to_422() {
        let err: ApiError = CollectError::Rejected(vec![ValidationError::OutOfRange {
            field: "temp",
            value: 121.0,
            min: 0.0,
            max: 120.0,
        }])
        .into();

        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code.as_deref(), Some("VALIDATION_ERROR"));
        assert_eq!(err.details, vec!["temp value 121 is out of range [0, 120]"]);
    }

    #[test]
    fn test_display_includes_status() {
        let err = ApiError::not_found("rule R9");
        assert_eq!(err.to_string(), "[404 Not Found] Resource not found: rule R9");
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::unavailable("down").into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
