// Error types for clause-review
// Author: kelexine (https://github.com/kelexine)

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Provider rate limited: {0}")]
    TooManyRequests(String),

    #[error("Provider unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Clause library error: {0}")]
    Library(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Map an upstream HTTP status and body to the matching error kind
    pub fn from_upstream(status: u16, body: String) -> Self {
        match status {
            429 => ServiceError::TooManyRequests(body),
            503 | 504 => ServiceError::ServiceUnavailable(body),
            _ => ServiceError::Provider(format!("HTTP {}: {}", status, body)),
        }
    }
}

// Convert ServiceError to HTTP responses for Axum
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ServiceError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request_error"),
            ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found_error"),
            ServiceError::Config(_) | ServiceError::ConfigParsing(_) | ServiceError::Library(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error")
            }
            ServiceError::TooManyRequests(_) => (StatusCode::TOO_MANY_REQUESTS, "rate_limit_error"),
            ServiceError::ServiceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "overloaded_error")
            }
            ServiceError::Provider(_) | ServiceError::Http(_) => (StatusCode::BAD_GATEWAY, "api_error"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "api_error"),
        };

        let body = json!({
            "type": "error",
            "error": {
                "type": error_type,
                "message": self.to_string(),
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
