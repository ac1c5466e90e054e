//! OS signal handling.

/// Wait for Ctrl+C.
///
/// If the handler cannot be installed this never resolves; the process can
/// still be stopped through [`Shutdown`](crate::lifecycle::Shutdown).
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}
