use std::future::Future;
use std::io;

use tokio::signal;

/// Resolves on ctrl-c or SIGTERM.
pub async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    wait_for_signal(signal::ctrl_c(), terminate).await;
}

/// A listener that fails to install never resolves, so the other one still
/// decides when to stop.
async fn wait_for_signal(ctrl_c: impl Future<Output = io::Result<()>>, terminate: impl Future<Output = ()>) {
    let ctrl_c = async {
        match ctrl_c.await {
            Ok(()) => tracing::info!("Received ctrl-c"),
            Err(err) => {
                tracing::error!("Failed to listen for ctrl-c: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
