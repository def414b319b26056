//! HTTP API handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, http::Uri, response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::Config;
use crate::error::ApiResult;
use crate::process::{now_timestamp, MemoryUsage, ProcessMetrics};

/// Name reported by `/api/info`.
pub const APP_NAME: &str = "fleexstack-sample-app";

/// Greeting returned by `/`.
pub const WELCOME_MESSAGE: &str = "Hello from FleexStack!";

/// Platform features advertised by `/`.
pub const FEATURES: [&str; 4] = [
    "Zero-downtime deployments",
    "Blue/Green switching",
    "Automatic health checks",
    "Container orchestration",
];

/// Application state shared with handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Resolved version, fixed at startup.
    pub version: Arc<str>,
    /// Environment name, fixed at startup.
    pub environment: Arc<str>,
    /// Process metadata source.
    pub process: Arc<dyn ProcessMetrics>,
}

impl AppState {
    /// Create app state from resolved configuration.
    pub fn new(config: &Config, process: Arc<dyn ProcessMetrics>) -> Self {
        Self {
            version: config.version().into(),
            environment: config.environment().into(),
            process,
        }
    }
}

/// Root response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RootResponse {
    /// Greeting.
    pub message: &'static str,
    pub version: String,
    pub environment: String,
    /// Time the response was produced.
    pub deployed_at: String,
    /// Advertised platform features.
    pub features: Vec<&'static str>,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always "healthy".
    pub status: &'static str,
    pub version: String,
    pub environment: String,
    /// Seconds since process start.
    pub uptime: f64,
    pub timestamp: String,
}

/// Runtime information response.
#[derive(Debug, Serialize, ToSchema)]
pub struct InfoResponse {
    pub app: &'static str,
    pub version: String,
    pub environment: String,
    /// Compiler version the service was built with.
    pub rust: String,
    pub platform: String,
    pub arch: String,
    /// Memory in MiB.
    pub memory: MemoryUsage,
}

/// Deployment verification response.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeploymentResponse {
    pub deployment: DeploymentDetails,
}

/// Details of the running deployment.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeploymentDetails {
    pub timestamp: String,
    pub version: String,
    pub environment: String,
    pub hostname: String,
}

/// 404 response.
#[derive(Debug, Serialize, ToSchema)]
pub struct NotFoundResponse {
    /// Always "Not Found".
    pub error: &'static str,
    /// Requested path, without query string.
    pub path: String,
}

/// Root handler - greeting and feature list.
#[utoipa::path(
    get,
    path = "/",
    tag = "info",
    responses((status = 200, description = "Greeting", body = RootResponse))
)]
pub async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: WELCOME_MESSAGE,
        version: state.version.to_string(),
        environment: state.environment.to_string(),
        deployed_at: now_timestamp(),
        features: FEATURES.to_vec(),
    })
}

/// Health check handler - always returns 200.
#[utoipa::path(
    get,
    path = "/health",
    tag = "info",
    responses((status = 200, description = "Service is alive", body = HealthResponse))
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: state.version.to_string(),
        environment: state.environment.to_string(),
        uptime: state.process.uptime().as_secs_f64(),
        timestamp: now_timestamp(),
    })
}

/// Runtime info handler.
#[utoipa::path(
    get,
    path = "/api/info",
    tag = "info",
    responses(
        (status = 200, description = "Runtime information", body = InfoResponse),
        (status = 500, description = "Process introspection failed", body = crate::error::ErrorResponse)
    )
)]
pub async fn api_info(State(state): State<AppState>) -> ApiResult<Json<InfoResponse>> {
    let process = &state.process;
    let memory = process.memory()?;

    Ok(Json(InfoResponse {
        app: APP_NAME,
        version: state.version.to_string(),
        environment: state.environment.to_string(),
        rust: process.runtime_version().to_string(),
        platform: process.platform().to_string(),
        arch: process.arch().to_string(),
        memory,
    }))
}

/// Deployment verification handler.
#[utoipa::path(
    get,
    path = "/api/deployment",
    tag = "info",
    responses(
        (status = 200, description = "Deployment details", body = DeploymentResponse),
        (status = 500, description = "Hostname lookup failed", body = crate::error::ErrorResponse)
    )
)]
pub async fn deployment(State(state): State<AppState>) -> ApiResult<Json<DeploymentResponse>> {
    let hostname = state.process.hostname()?;

    Ok(Json(DeploymentResponse {
        deployment: DeploymentDetails {
            timestamp: now_timestamp(),
            version: state.version.to_string(),
            environment: state.environment.to_string(),
            hostname,
        },
    }))
}

/// Fallback for every unmatched method or path.
pub async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundResponse {
            error: "Not Found",
            path: uri.path().to_string(),
        }),
    )
}
