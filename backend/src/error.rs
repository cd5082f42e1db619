//! Error handling for the Water Monitoring service
//!
//! Every error renders as `{"error": "<message>", "code": "<CODE>"}`.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Analysis errors surface as a generic 500
    #[error("Analysis failed: {0}")]
    Analysis(String),

    // External service errors
    #[error("Weather service error: {0}")]
    WeatherService(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Analysis(_) => (StatusCode::INTERNAL_SERVER_ERROR, "ANALYSIS_FAILED"),
            AppError::WeatherService(_) => (StatusCode::BAD_GATEWAY, "WEATHER_SERVICE_ERROR"),
            AppError::DatabaseError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            AppError::Internal(_) | AppError::InternalError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }

    /// Message shown to the caller; database and anyhow details stay in the logs
    fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg)
            | AppError::InvalidRequest(msg)
            | AppError::Analysis(msg)
            | AppError::Internal(msg) => msg.clone(),
            AppError::NotFound(resource) => format!("{} not found", resource),
            AppError::WeatherService(msg) => format!("Weather service error: {}", msg),
            AppError::DatabaseError(_) => "A database error occurred".to_string(),
            AppError::InternalError(_) => "An internal server error occurred".to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let detail = errs
                    .iter()
                    .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| {
                        errs.first().map(|e| e.code.to_string()).unwrap_or_default()
                    });
                format!("{}: {}", field, detail)
            })
            .collect();
        fields.sort();
        AppError::Validation(fields.join("; "))
    }
}

// Extractor rejections answer with the same JSON body as every other error
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = ErrorResponse {
            error: self.public_message(),
            code: code.to_string(),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::Validation("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("History entry".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Analysis("boom".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::InvalidRequest("bad".into()).status_and_code(),
            (StatusCode::BAD_REQUEST, "INVALID_REQUEST")
        );
    }

    #[test]
    fn test_messages_hide_internal_details() {
        let err = AppError::InternalError(anyhow::anyhow!("secret connection string"));
        assert_eq!(err.public_message(), "An internal server error occurred");
        assert_eq!(
            AppError::NotFound("History entry".into()).public_message(),
            "History entry not found"
        );
    }
}
