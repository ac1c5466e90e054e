//! Routers: named groups of controllers under one path prefix.
//!
//! # Responsibilities
//! - Build controllers from their classes in declaration order
//! - Validate every route before anything is registered
//! - Mount the assembled sub-router with a single host call
//!
//! # Design Decisions
//! - Router middleware wraps service middleware's inner side, so service
//!   middleware (store injection, request id, logging) always runs first
//! - Validation failures leave the host untouched

use std::sync::Arc;

use axum::Router;

use crate::http::host::{is_valid_relative_path, mount_path, HostApp, MountId};
use crate::http::middleware::{apply_all, WebMiddleware};
use crate::service::controller::{ControllerClass, ControllerProps, WebController};
use crate::service::converter::{DefaultStateExporter, StateConverter};
use crate::service::error::{Cause, RouterError};
use crate::service::snapshot::{NamedSnapshot, RouterSnapshot};

#[derive(Debug)]
pub struct WebRouter {
    name: String,
    path: String,
    controller_classes: Vec<ControllerClass>,
    installed_controllers: Vec<Arc<WebController>>,
    middleware: Vec<Arc<dyn WebMiddleware>>,
    state_converter: Arc<dyn StateConverter>,
    mount: Option<MountId>,
}

impl WebRouter {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            controller_classes: Vec::new(),
            installed_controllers: Vec::new(),
            middleware: Vec::new(),
            state_converter: Arc::new(DefaultStateExporter),
            mount: None,
        }
    }

    pub fn with_controller(mut self, class: ControllerClass) -> Self {
        self.controller_classes.push(class);
        self
    }

    pub fn with_middleware(mut self, middleware: impl WebMiddleware) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Converter handed to controller classes as their default.
    pub fn with_state_converter(mut self, converter: Arc<dyn StateConverter>) -> Self {
        self.state_converter = converter;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn installed_controllers(&self) -> &[Arc<WebController>] {
        &self.installed_controllers
    }

    pub fn mount(&self) -> Option<MountId> {
        self.mount
    }

    pub fn is_mounted(&self) -> bool {
        self.mount.is_some()
    }

    /// Build, validate and mount every controller under
    /// `/<service_path>/<router path>`, wrapped in router middleware and then
    /// `service_middleware`. Calls [`HostApp::use_router`] exactly once.
    pub async fn install(
        &mut self,
        host: &dyn HostApp,
        service_path: &str,
        service_middleware: &[Arc<dyn WebMiddleware>],
    ) -> Result<(), Cause> {
        if self.mount.is_some() {
            return Err(RouterError::AlreadyMounted(self.name.clone()).into());
        }

        let props = ControllerProps {
            router_name: self.name.clone(),
            state_converter: Arc::clone(&self.state_converter),
        };
        let controllers: Vec<Arc<WebController>> = self
            .controller_classes
            .iter()
            .map(|class| Arc::new(class.build(&props)))
            .collect();
        self.validate(&controllers)?;

        let sub = controllers
            .iter()
            .fold(Router::new(), |mount, controller| controller.install(mount));
        let sub = apply_all(sub, &self.middleware);
        let sub = apply_all(sub, service_middleware);

        let path = mount_path(&[service_path, &self.path]);
        let mount = host.use_router(&path, sub).await?;

        tracing::debug!(
            router = %self.name,
            path = %path,
            mount = %mount,
            controllers = controllers.len(),
            "Router installed"
        );
        self.installed_controllers = controllers;
        self.mount = Some(mount);
        Ok(())
    }

    /// Detach from the host with a single [`HostApp::unuse_router`] call.
    pub async fn uninstall(&mut self, host: &dyn HostApp) -> Result<(), Cause> {
        let mount = self
            .mount
            .ok_or_else(|| RouterError::NotMounted(self.name.clone()))?;
        host.unuse_router(mount).await?;
        self.mount = None;

        tracing::debug!(router = %self.name, mount = %mount, "Router uninstalled");
        Ok(())
    }

    fn validate(&self, controllers: &[Arc<WebController>]) -> Result<(), RouterError> {
        if !is_valid_relative_path(self.path.trim_matches('/')) {
            return Err(RouterError::InvalidPath {
                router: self.name.clone(),
                path: self.path.clone(),
            });
        }
        for (i, controller) in controllers.iter().enumerate() {
            if !is_valid_relative_path(controller.action()) {
                return Err(RouterError::InvalidAction {
                    controller: controller.name().to_string(),
                    action: controller.action().to_string(),
                });
            }
            let clash = controllers[..i].iter().any(|earlier| {
                earlier.action() == controller.action() && earlier.method().overlaps(controller.method())
            });
            if clash {
                return Err(RouterError::DuplicateRoute {
                    router: self.name.clone(),
                    method: controller.method(),
                    action: controller.action().to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn snapshot(&self) -> RouterSnapshot {
        RouterSnapshot {
            name: self.name.clone(),
            web_controller_classes: vec![(); self.controller_classes.len()],
            installed_controllers: self.installed_controllers.iter().map(|c| c.snapshot()).collect(),
            path: self.path.clone(),
            middleware: self.middleware.iter().map(|m| NamedSnapshot::new(m.name())).collect(),
            state_converter: NamedSnapshot::new(self.state_converter.name()),
        }
    }
}

/// Properties a service hands to its router classes.
#[derive(Debug, Clone)]
pub struct RouterProps {
    pub service_name: String,
    pub state: crate::service::state::ServiceState,
}

/// Factory for a router, invoked each time the owning service installs.
///
/// Factories may fail with any [`Cause`], including a raw payload.
#[derive(Clone)]
pub struct RouterClass(Arc<dyn Fn(&RouterProps) -> Result<WebRouter, Cause> + Send + Sync>);

impl RouterClass {
    pub fn new<F>(build: F) -> Self
    where
        F: Fn(&RouterProps) -> Result<WebRouter, Cause> + Send + Sync + 'static,
    {
        Self(Arc::new(build))
    }

    pub fn build(&self, props: &RouterProps) -> Result<WebRouter, Cause> {
        (self.0)(props)
    }
}

impl std::fmt::Debug for RouterClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RouterClass")
    }
}
