//! Web service host library.
//!
//! A [`WebService`] bundles routers of controllers that are installed into a
//! host application as one unit, share a request-scoped state store, and can
//! be described by a deterministic JSON snapshot.

pub mod config;
pub mod greeting;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod service;

pub use config::schema::HostConfig;
pub use http::{AxumHost, HostApp, HttpServer};
pub use lifecycle::Shutdown;
pub use service::{Cause, ServiceError, WebService, WebServiceProps};
