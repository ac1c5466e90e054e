//! Controllers: single route bindings.
//!
//! # Responsibilities
//! - Describe one route (name, action, method, middleware, converter)
//! - Register that route on a router sub-mount
//! - Hand the handler its request store and converted state
//!
//! # Design Decisions
//! - A controller is immutable once built; routers build them on install
//! - The handler is the only part supplied by the application

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::Request,
    http::request::Parts,
    response::{IntoResponse, Response},
    routing::{any, on, MethodFilter, MethodRouter},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::request_id::RequestId;

use crate::http::middleware::{apply_all, JsonBody, WebMiddleware};
use crate::service::converter::{DefaultStateExporter, StateConverter};
use crate::service::error::ControllerError;
use crate::service::snapshot::{ControllerSnapshot, NamedSnapshot};
use crate::service::state::RequestStore;

/// HTTP method a controller answers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    /// Any method.
    All,
}

impl HttpMethod {
    fn method_router<H, T>(self, handler: H) -> MethodRouter
    where
        H: axum::handler::Handler<T, ()>,
        T: 'static,
    {
        let filter = match self {
            HttpMethod::Get => MethodFilter::GET,
            HttpMethod::Post => MethodFilter::POST,
            HttpMethod::Put => MethodFilter::PUT,
            HttpMethod::Patch => MethodFilter::PATCH,
            HttpMethod::Delete => MethodFilter::DELETE,
            HttpMethod::Head => MethodFilter::HEAD,
            HttpMethod::Options => MethodFilter::OPTIONS,
            HttpMethod::All => return any(handler),
        };
        on(filter, handler)
    }

    /// Whether two methods would claim the same requests.
    pub fn overlaps(self, other: HttpMethod) -> bool {
        self == other || self == HttpMethod::All || other == HttpMethod::All
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
            HttpMethod::Head => "head",
            HttpMethod::Options => "options",
            HttpMethod::All => "all",
        };
        f.write_str(s)
    }
}

/// Everything a handler sees of one request.
#[derive(Debug)]
pub struct ControllerRequest {
    /// The request-scoped store.
    pub store: RequestStore,
    /// State exported by the controller's converter at dispatch time.
    pub state: Value,
    /// Parsed body, when a JSON middleware ran.
    pub body: Option<Value>,
    pub request_id: Option<String>,
    pub parts: Parts,
}

impl ControllerRequest {
    /// A string field of the JSON body.
    pub fn body_str(&self, key: &str) -> Option<&str> {
        self.body.as_ref().and_then(|b| b.get(key)).and_then(Value::as_str)
    }

    /// A string field of the exported state.
    pub fn state_str(&self, key: &str) -> Option<&str> {
        self.state.get(key).and_then(Value::as_str)
    }
}

/// Application logic behind a controller.
#[async_trait]
pub trait ControllerHandler: Send + Sync + 'static {
    async fn handle(&self, request: ControllerRequest) -> Result<Response, ControllerError>;
}

/// A single route binding.
pub struct WebController {
    name: String,
    action: String,
    method: HttpMethod,
    middleware: Vec<Arc<dyn WebMiddleware>>,
    state_converter: Arc<dyn StateConverter>,
    handler: Arc<dyn ControllerHandler>,
}

impl fmt::Debug for WebController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebController")
            .field("name", &self.name)
            .field("action", &self.action)
            .field("method", &self.method)
            .field("middleware", &self.middleware)
            .field("state_converter", &self.state_converter)
            .finish_non_exhaustive()
    }
}

impl WebController {
    pub fn new(
        name: impl Into<String>,
        action: impl Into<String>,
        method: HttpMethod,
        handler: impl ControllerHandler,
    ) -> Self {
        Self {
            name: name.into(),
            action: action.into(),
            method,
            middleware: Vec::new(),
            state_converter: Arc::new(DefaultStateExporter),
            handler: Arc::new(handler),
        }
    }

    /// Append a middleware; middleware runs in the order it was added.
    pub fn with_middleware(mut self, middleware: impl WebMiddleware) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    pub fn with_state_converter(mut self, converter: Arc<dyn StateConverter>) -> Self {
        self.state_converter = converter;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn middleware(&self) -> &[Arc<dyn WebMiddleware>] {
        &self.middleware
    }

    pub fn state_converter(&self) -> &Arc<dyn StateConverter> {
        &self.state_converter
    }

    /// Route path relative to the router prefix.
    pub fn route_path(&self) -> String {
        format!("/{}", self.action)
    }

    /// Register this controller on `mount`, wrapped in its middleware.
    ///
    /// The action must already be validated; see
    /// [`WebRouter::install`](crate::service::WebRouter::install).
    pub fn install(self: &Arc<Self>, mount: Router) -> Router {
        let controller = Arc::clone(self);
        let handler = move |request: Request| {
            let controller = Arc::clone(&controller);
            async move { controller.dispatch(request).await }
        };
        let route = Router::new().route(&self.route_path(), self.method.method_router(handler));
        mount.merge(apply_all(route, &self.middleware))
    }

    async fn dispatch(&self, request: Request) -> Response {
        let (mut parts, _body) = request.into_parts();

        let Some(store) = parts.extensions.remove::<RequestStore>() else {
            tracing::error!(controller = %self.name, "Request store missing");
            return ControllerError::MissingRequestStore.into_response();
        };
        let body = parts.extensions.remove::<JsonBody>().map(|JsonBody(v)| v);
        let request_id = parts
            .extensions
            .get::<RequestId>()
            .and_then(|id| id.header_value().to_str().ok())
            .map(str::to_string);
        let state = self.state_converter.export(&store);

        let request = ControllerRequest {
            store,
            state,
            body,
            request_id,
            parts,
        };
        match self.handler.handle(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(controller = %self.name, error = %e, "Controller failed");
                e.into_response()
            }
        }
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            name: self.name.clone(),
            action: self.action.clone(),
            method: self.method,
            middleware: self.middleware.iter().map(|m| NamedSnapshot::new(m.name())).collect(),
            state_converter: NamedSnapshot::new(self.state_converter.name()),
        }
    }
}

/// Properties a router hands to its controller classes.
#[derive(Debug, Clone)]
pub struct ControllerProps {
    pub router_name: String,
    pub state_converter: Arc<dyn StateConverter>,
}

/// Factory for a controller, built each time its router installs.
#[derive(Clone)]
pub struct ControllerClass(Arc<dyn Fn(&ControllerProps) -> WebController + Send + Sync>);

impl ControllerClass {
    pub fn new<F>(build: F) -> Self
    where
        F: Fn(&ControllerProps) -> WebController + Send + Sync + 'static,
    {
        Self(Arc::new(build))
    }

    pub fn build(&self, props: &ControllerProps) -> WebController {
        (self.0)(props)
    }
}

impl fmt::Debug for ControllerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ControllerClass")
    }
}
