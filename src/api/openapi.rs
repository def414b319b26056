//! OpenAPI description of the HTTP surface.

use utoipa::OpenApi;

use super::handlers;
use crate::error::Result;

/// OpenAPI document for the four informational endpoints.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "fleexstack-sample",
        description = "Read-only introspection endpoints used to verify deployments"
    ),
    paths(
        handlers::root,
        handlers::health,
        handlers::api_info,
        handlers::deployment
    ),
    components(schemas(
        handlers::RootResponse,
        handlers::HealthResponse,
        handlers::InfoResponse,
        handlers::DeploymentResponse,
        handlers::DeploymentDetails,
        handlers::NotFoundResponse,
        crate::process::MemoryUsage,
        crate::error::ErrorResponse
    )),
    tags((name = "info", description = "Service and deployment information"))
)]
pub struct ApiDoc;

/// Render the document as pretty-printed JSON.
pub fn render() -> Result<String> {
    Ok(ApiDoc::openapi().to_pretty_json()?)
}
