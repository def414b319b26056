//! HTTP API module: informational endpoints, dispatcher and OpenAPI document.

pub mod handlers;
pub mod openapi;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
