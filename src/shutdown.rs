//! Termination signal handling.

use strum::Display;
use tracing::error;

/// Signal that asked the process to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ShutdownSignal {
    /// Ctrl-C / SIGINT.
    #[strum(serialize = "SIGINT")]
    Interrupt,
    /// SIGTERM.
    #[strum(serialize = "SIGTERM")]
    Terminate,
}

/// Resolve when SIGINT or SIGTERM arrives, reporting which one.
///
/// A handler that cannot be installed is logged and never fires.
pub async fn shutdown_signal() -> ShutdownSignal {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        ShutdownSignal::Interrupt
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
        ShutdownSignal::Terminate
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<ShutdownSignal>();

    tokio::select! {
        signal = ctrl_c => signal,
        signal = terminate => signal,
    }
}
