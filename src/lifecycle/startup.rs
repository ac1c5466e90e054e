//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize observability from configuration
//! - Build the host and install the greeting service
//! - Bind the listener and serve until shutdown
//! - Uninstall the service once the server has stopped
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds before install so the reported port is the real one

use std::path::PathBuf;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::HostConfig;
use crate::greeting;
use crate::http::{AxumHost, HttpServer};
use crate::lifecycle::{signals, Shutdown};
use crate::observability;
use crate::service::{ServiceError, WebService, WebServiceProps};

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Service props derived from configuration and the bound port.
pub fn service_props(config: &HostConfig, port: u16) -> WebServiceProps {
    let mut state = greeting::initial_state(&config.service.user_name);
    for (k, v) in &config.service.state {
        state.insert(k.clone(), v.clone());
    }

    WebServiceProps {
        name: config.service.name.clone(),
        port,
        package_name: config.service.package_name.clone(),
        path: config.service.path.clone(),
        state,
        app_data_root: config.service.app_data_root.as_ref().map(PathBuf::from),
    }
}

/// Run the host until Ctrl+C.
pub async fn run(config: HostConfig) -> Result<(), StartupError> {
    observability::logging::init(&config.observability.log_level);
    tracing::info!("web-service-host v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => observability::metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for connections");

    let host = AxumHost::new();
    let mut service = greeting::greeting_service(host.clone(), service_props(&config, local_addr.port()));
    let data_dir = service.initialize_app_data()?;
    tracing::info!(path = %data_dir.display(), "App data directory ready");

    service.install().await?;
    tracing::debug!(snapshot = %service, "Service snapshot");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(host);
    let server_shutdown = shutdown.subscribe();
    let server_task = tokio::spawn(server.run(listener, server_shutdown));

    signals::shutdown_signal().await;
    shutdown.trigger();

    match server_task.await {
        Ok(result) => result?,
        Err(e) => tracing::error!(error = %e, "Server task failed"),
    }

    uninstall(&mut service).await?;
    tracing::info!("Shutdown complete");
    Ok(())
}

async fn uninstall(service: &mut WebService) -> Result<(), ServiceError> {
    if service.is_installed() {
        service.uninstall().await?;
    }
    Ok(())
}
