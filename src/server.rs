//! Startup and shutdown sequencing for the HTTP listener.

use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, Utc};
use tokio::net::TcpListener;
use tracing::info;

use crate::api::{create_router, AppState};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::process::{format_timestamp, ProcessMetrics};
use crate::shutdown::ShutdownSignal;

const BANNER_RULE: &str = "==================================================";

/// Bind the listener on all interfaces.
pub async fn bind(port: u16) -> Result<TcpListener> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);
    Ok(listener)
}

/// Log the startup banner.
pub fn log_banner(state: &AppState, port: u16, started: DateTime<Utc>) {
    info!("{}", BANNER_RULE);
    info!("FleexStack Sample Application");
    info!("{}", BANNER_RULE);
    info!("Version: {}", state.version);
    info!("Environment: {}", state.environment);
    info!("Port: {}", port);
    info!("Started: {}", format_timestamp(started));
    info!("{}", BANNER_RULE);
    info!("Health Check: http://localhost:{}/health", port);
    info!("API Info: http://localhost:{}/api/info", port);
    info!("{}", BANNER_RULE);
}

/// Serve `router` until `shutdown` resolves, then report the signal.
///
/// In-flight requests are not drained; the caller is expected to exit.
pub async fn serve<S>(listener: TcpListener, router: Router, shutdown: S) -> Result<ShutdownSignal>
where
    S: Future<Output = ShutdownSignal>,
{
    let server = axum::serve(listener, router).into_future();

    tokio::select! {
        result = server => {
            result?;
            Err(AppError::ServerStopped)
        }
        signal = shutdown => {
            info!("{} received, shutting down gracefully...", signal);
            Ok(signal)
        }
    }
}

/// Bind, announce and serve the application until a shutdown signal.
pub async fn run<S>(
    config: &Config,
    process: Arc<dyn ProcessMetrics>,
    shutdown: S,
) -> Result<ShutdownSignal>
where
    S: Future<Output = ShutdownSignal>,
{
    let state = AppState::new(config, process);
    let listener = bind(config.port).await?;

    log_banner(&state, config.port, Utc::now());

    serve(listener, create_router(state), shutdown).await
}
