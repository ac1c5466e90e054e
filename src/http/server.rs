//! HTTP server setup.
//!
//! # Responsibilities
//! - Serve an [`AxumHost`] on a bound listener
//! - Stop accepting connections when shutdown is signalled

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::http::axum_host::AxumHost;
use crate::lifecycle::shutdown::ShutdownSignal;

/// HTTP server for a host application.
pub struct HttpServer {
    host: Arc<AxumHost>,
}

impl HttpServer {
    pub fn new(host: Arc<AxumHost>) -> Self {
        Self { host }
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.host.router())
            .with_graceful_shutdown(shutdown.recv())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
