//! Unified error types for the sample service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

/// Unified error type for startup and the serve loop.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Process introspection error.
    #[error("process error: {0}")]
    Process(#[from] ProcessError),

    /// IO error (bind failures, accept loop errors).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The HTTP server returned before any shutdown signal arrived.
    #[error("http server stopped without a shutdown signal")]
    ServerStopped,
}

/// Errors reading process metadata from the OS.
#[derive(Error, Debug)]
pub enum ProcessError {
    /// Current pid could not be determined.
    #[error("cannot determine current pid: {0}")]
    Pid(String),

    /// The OS no longer reports the current process.
    #[error("process {0} not found")]
    ProcessNotFound(String),

    /// Hostname lookup failed.
    #[error("hostname lookup failed: {0}")]
    Hostname(String),

    /// Metrics lock was poisoned by a panicking reader.
    #[error("process metrics lock poisoned")]
    Poisoned,
}

/// Handler failure, rendered as a 500 by the dispatcher.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Generic internal failure with a message for the caller.
    #[error("{0}")]
    Internal(String),

    /// Process introspection failed mid-request.
    #[error(transparent)]
    Process(#[from] ProcessError),
}

/// Body of every 500 response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always "Internal Server Error".
    pub error: &'static str,
    /// Failure message.
    pub message: String,
}

/// Label carried by every 500 body.
pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// Build the 500 response for a failure message.
pub fn internal_error_response(message: String) -> Response {
    let body = ErrorResponse {
        error: INTERNAL_SERVER_ERROR,
        message,
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = ?self, "Error: {}", self);
        internal_error_response(self.to_string())
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type for handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn internal_error_renders_generic_label_and_message() {
        let response = ApiError::Internal("database timeout".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Internal Server Error");
        assert_eq!(json["message"], "database timeout");
    }

    #[tokio::test]
    async fn process_error_message_passes_through() {
        let err = ApiError::from(ProcessError::Hostname("no such host".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "hostname lookup failed: no such host");
    }

    #[test]
    fn app_error_wraps_io() {
        let err: AppError =
            std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use").into();
        assert!(err.to_string().contains("address in use"));
    }
}
