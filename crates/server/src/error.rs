use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use recommender::RecommendError;
use serde::{Deserialize, Serialize};

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found")]
    NotFound,
}

/// API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ServerError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Validation(_) => StatusCode::BAD_REQUEST,
            ServerError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ServerError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Internal(_) | ServerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ServerError::Validation(_) => "VALIDATION_ERROR",
            ServerError::ModelUnavailable(_) => "MODEL_UNAVAILABLE",
            ServerError::Timeout => "REQUEST_TIMEOUT",
            ServerError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ServerError::Internal(_) => "INTERNAL_ERROR",
            ServerError::Config(_) => "CONFIG_ERROR",
            ServerError::NotFound => "NOT_FOUND",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "{self}");
        }

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
            },
        });

        (status, body).into_response()
    }
}

impl From<RecommendError> for ServerError {
    fn from(err: RecommendError) -> Self {
        match err {
            RecommendError::ModelUnavailable(reason) => ServerError::ModelUnavailable(reason),
            RecommendError::InvalidCount { .. } => ServerError::Validation(err.to_string()),
            RecommendError::InvalidConfig(msg) => ServerError::Config(msg),
            RecommendError::Index(e) => ServerError::Internal(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ServerError::PayloadTooLarge(rejection.body_text())
        } else {
            ServerError::Validation(rejection.body_text())
        }
    }
}

impl From<serde_json::Error> for ServerError {
    fn from(err: serde_json::Error) -> Self {
        ServerError::Internal(format!("JSON encode error: {err}"))
    }
}
