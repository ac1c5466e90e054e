//! The web service lifecycle state machine.
//!
//! # States
//! ```text
//!              install()                      uninstall()
//! UNINSTALLED ───────────▶ INSTALLED ───────────────▶ UNINSTALLED
//!      │                      │
//!      │ uninstall(): error   │ install(): error
//! ```
//!
//! # Design Decisions
//! - Transitions take `&mut self`; one instance is never installed concurrently
//! - Failures are not rolled back: routers mounted before a failing install
//!   stay mounted and listed, and the service stays uninstalled
//! - Every raised value is kept verbatim in the wrapping error's cause

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{Instrument, Span};
use uuid::Uuid;

use crate::http::host::HostApp;
use crate::http::middleware::{RequestIdMiddleware, RequestLoggerMiddleware, RequestStoreMiddleware, WebMiddleware};
use crate::observability::metrics;
use crate::service::app_data;
use crate::service::error::{Cause, ServiceError};
use crate::service::router::{RouterClass, RouterProps, WebRouter};
use crate::service::snapshot::{NamedSnapshot, ServiceSnapshot, Snapshot};
use crate::service::state::ServiceState;

/// Construction options for a [`WebService`].
#[derive(Debug, Clone, Default)]
pub struct WebServiceProps {
    pub name: String,
    /// Bind port; informational at this layer.
    pub port: u16,
    pub package_name: String,
    /// Path prefix shared by every router of the service.
    pub path: String,
    /// Seed for the service state.
    pub state: Map<String, Value>,
    pub app_data_root: Option<PathBuf>,
}

/// A bundle of routers installed into and uninstalled from a host as a unit.
pub struct WebService {
    name: String,
    instance_id: Uuid,
    installed: bool,
    port: u16,
    package_name: String,
    path: String,
    app_data_root: Option<PathBuf>,
    router_classes: Vec<RouterClass>,
    installed_routers: Vec<WebRouter>,
    middleware: Vec<Arc<dyn WebMiddleware>>,
    host: Arc<dyn HostApp>,
    state: ServiceState,
    span: Span,
}

impl WebService {
    /// Create an uninstalled service with the standard middleware chain:
    /// request store, request id, request logger.
    pub fn new(host: Arc<dyn HostApp>, props: WebServiceProps) -> Self {
        let instance_id = Uuid::new_v4();
        let state = ServiceState::new(props.state);
        let span = tracing::info_span!("web_service", name = %props.name, instance_id = %instance_id);
        let middleware: Vec<Arc<dyn WebMiddleware>> = vec![
            Arc::new(RequestStoreMiddleware::new(state.clone())),
            Arc::new(RequestIdMiddleware),
            Arc::new(RequestLoggerMiddleware),
        ];

        Self {
            name: props.name,
            instance_id,
            installed: false,
            port: props.port,
            package_name: props.package_name,
            path: props.path,
            app_data_root: props.app_data_root,
            router_classes: Vec::new(),
            installed_routers: Vec::new(),
            middleware,
            host,
            state,
            span,
        }
    }

    pub fn with_router(mut self, class: RouterClass) -> Self {
        self.router_classes.push(class);
        self
    }

    /// Append a service-wide middleware, run after the standard chain.
    pub fn with_middleware(mut self, middleware: impl WebMiddleware) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Mount every router into the host.
    pub async fn install(&mut self) -> Result<(), ServiceError> {
        if self.installed {
            return Err(ServiceError::AlreadyInstalled(self.name.clone()));
        }

        let span = self.span.clone();
        match self.install_routers().instrument(span).await {
            Ok(()) => {
                self.installed = true;
                metrics::record_transition(&self.name, "install", "ok");
                metrics::record_installed_routers(&self.name, self.installed_routers.len());
                tracing::info!(
                    parent: &self.span,
                    routers = self.installed_routers.len(),
                    "WebService installed"
                );
                Ok(())
            }
            Err(error) => {
                metrics::record_transition(&self.name, "install", "error");
                tracing::error!(
                    parent: &self.span,
                    error = %error,
                    installed_routers = self.installed_routers.len(),
                    "WebService failed to install"
                );
                Err(ServiceError::InstallFailed {
                    name: self.name.clone(),
                    error,
                })
            }
        }
    }

    /// Unmount every installed router from the host.
    pub async fn uninstall(&mut self) -> Result<(), ServiceError> {
        if !self.installed {
            return Err(ServiceError::NotInstalled(self.name.clone()));
        }

        let span = self.span.clone();
        match self.uninstall_routers().instrument(span).await {
            Ok(()) => {
                self.installed = false;
                metrics::record_transition(&self.name, "uninstall", "ok");
                metrics::record_installed_routers(&self.name, 0);
                tracing::info!(parent: &self.span, "WebService uninstalled");
                Ok(())
            }
            Err(error) => {
                metrics::record_transition(&self.name, "uninstall", "error");
                tracing::error!(
                    parent: &self.span,
                    error = %error,
                    remaining_routers = self.installed_routers.len(),
                    "WebService failed to uninstall"
                );
                Err(ServiceError::UninstallFailed {
                    name: self.name.clone(),
                    error,
                })
            }
        }
    }

    async fn install_routers(&mut self) -> Result<(), Cause> {
        let props = RouterProps {
            service_name: self.name.clone(),
            state: self.state.clone(),
        };
        for class in &self.router_classes {
            let mut router = class.build(&props)?;
            router
                .install(self.host.as_ref(), &self.path, &self.middleware)
                .await?;
            self.installed_routers.push(router);
        }
        Ok(())
    }

    async fn uninstall_routers(&mut self) -> Result<(), Cause> {
        // Routers leave the list only once the host has detached them.
        while let Some(router) = self.installed_routers.first_mut() {
            router.uninstall(self.host.as_ref()).await?;
            self.installed_routers.remove(0);
        }
        Ok(())
    }

    pub fn is_installed(&self) -> bool {
        self.installed
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn installed_routers(&self) -> &[WebRouter] {
        &self.installed_routers
    }

    pub fn middleware(&self) -> &[Arc<dyn WebMiddleware>] {
        &self.middleware
    }

    pub fn state(&self) -> &ServiceState {
        &self.state
    }

    /// This service's data directory.
    pub fn app_data_path(&self) -> std::io::Result<PathBuf> {
        app_data::app_data_path(&self.package_name, self.app_data_root.as_deref())
    }

    /// Like [`WebService::app_data_path`], creating the directory.
    pub fn initialize_app_data(&self) -> std::io::Result<PathBuf> {
        app_data::app_data_path_and_initialize(&self.package_name, self.app_data_root.as_deref())
    }

    pub fn app_data_root(&self) -> Option<&Path> {
        self.app_data_root.as_deref()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            service: ServiceSnapshot {
                name: self.name.clone(),
                instance_id: self.instance_id.to_string(),
                is_installed: self.installed,
                port: self.port,
                package_name: self.package_name.clone(),
                path: self.path.clone(),
                installed_routers: self.installed_routers.iter().map(WebRouter::snapshot).collect(),
                middleware: self.middleware.iter().map(|m| NamedSnapshot::new(m.name())).collect(),
            },
        }
    }
}

impl fmt::Debug for WebService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebService")
            .field("name", &self.name)
            .field("instance_id", &self.instance_id)
            .field("installed", &self.installed)
            .field("installed_routers", &self.installed_routers.len())
            .finish_non_exhaustive()
    }
}

/// Compact JSON snapshot.
impl fmt::Display for WebService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.snapshot()).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
