//! HTTP API route definitions.

use std::any::Any;

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use super::handlers::{api_info, deployment, health, not_found, root, AppState};
use crate::error::internal_error_response;

/// Create the API router.
///
/// Each path answers GET only; other methods fall through to the 404 handler.
pub fn create_router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/", get(root).fallback(not_found))
        .route("/health", get(health).fallback(not_found))
        .route("/api/info", get(api_info).fallback(not_found))
        .route("/api/deployment", get(deployment).fallback(not_found))
        .with_state(state);

    with_dispatch_layers(routes)
}

/// Wrap a router with the 404 fallback, panic interception and request logging.
pub fn with_dispatch_layers(router: Router) -> Router {
    router
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn(log_request))
        .layer(TraceLayer::new_for_http())
}

async fn log_request(request: Request, next: Next) -> Response {
    info!("{} {}", request.method(), request.uri().path());
    next.run(request).await
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };

    error!("Error: {}", message);
    internal_error_response(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::ApiError;
    use crate::process::FixedMetrics;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let state = AppState::new(&Config::default(), Arc::new(FixedMetrics::default()));
        create_router(state)
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint_returns_healthy() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["uptime"], 12.5);
    }

    #[tokio::test]
    async fn root_uses_camel_case_keys() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert!(json["deployedAt"].is_string());
        assert_eq!(json["features"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn api_info_reports_memory() {
        let response = app()
            .oneshot(Request::builder().uri("/api/info").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["app"], "fleexstack-sample-app");
        assert_eq!(json["platform"], "linux");
        assert_eq!(json["memory"]["used"], 12);
        assert_eq!(json["memory"]["total"], 64);
    }

    #[tokio::test]
    async fn deployment_reports_hostname() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/deployment")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["deployment"]["hostname"], "sample-host");
        assert_eq!(json["deployment"]["environment"], "development");
    }

    #[tokio::test]
    async fn unknown_path_is_echoed_in_404() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/no/such/thing?x=1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = json_body(response).await;
        assert_eq!(json["error"], "Not Found");
        assert_eq!(json["path"], "/no/such/thing");
    }

    #[tokio::test]
    async fn wrong_method_is_404_not_405() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = json_body(response).await;
        assert_eq!(json["path"], "/health");
    }

    #[tokio::test]
    async fn malformed_json_body_is_ignored() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn handler_failure_becomes_500() {
        let state = AppState::new(
            &Config::default(),
            Arc::new(FixedMetrics::failing("no route to host")),
        );

        let response = create_router(state)
            .oneshot(
                Request::builder()
                    .uri("/api/deployment")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_body(response).await;
        assert_eq!(json["error"], "Internal Server Error");
        assert!(json["message"].as_str().unwrap().contains("no route to host"));
    }

    #[tokio::test]
    async fn injected_error_route_becomes_500() {
        let router = with_dispatch_layers(Router::new().route(
            "/boom",
            get(|| async { Err::<(), _>(ApiError::Internal("exploded".into())) }),
        ));

        let response = router
            .oneshot(Request::builder().uri("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_body(response).await;
        assert_eq!(json["error"], "Internal Server Error");
        assert_eq!(json["message"], "exploded");
    }

    #[tokio::test]
    async fn panicking_route_becomes_500() {
        let router = with_dispatch_layers(Router::new().route(
            "/panic",
            get(|| async {
                if true {
                    panic!("handler blew up");
                }
                "unreachable"
            }),
        ));

        let response = router
            .oneshot(Request::builder().uri("/panic").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_body(response).await;
        assert_eq!(json["error"], "Internal Server Error");
        assert_eq!(json["message"], "handler blew up");
    }

    #[tokio::test]
    async fn layered_router_still_404s_unknown_paths() {
        let router = with_dispatch_layers(Router::new());

        let response = router
            .oneshot(Request::builder().uri("/missing").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
