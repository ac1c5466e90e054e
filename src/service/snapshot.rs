//! Structural snapshots of services, routers and controllers.
//!
//! Field order in these structs is the serialized order.

use serde::Serialize;

use crate::service::controller::HttpMethod;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedSnapshot {
    pub name: String,
}

impl NamedSnapshot {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerSnapshot {
    pub name: String,
    pub action: String,
    pub method: HttpMethod,
    pub middleware: Vec<NamedSnapshot>,
    pub state_converter: NamedSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterSnapshot {
    pub name: String,
    /// One `null` placeholder per controller class.
    pub web_controller_classes: Vec<()>,
    pub installed_controllers: Vec<ControllerSnapshot>,
    pub path: String,
    pub middleware: Vec<NamedSnapshot>,
    pub state_converter: NamedSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSnapshot {
    pub name: String,
    pub instance_id: String,
    pub is_installed: bool,
    pub port: u16,
    pub package_name: String,
    pub path: String,
    pub installed_routers: Vec<RouterSnapshot>,
    pub middleware: Vec<NamedSnapshot>,
}

/// Top-level envelope: `{"service": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub service: ServiceSnapshot,
}
