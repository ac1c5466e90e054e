//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Root configuration for the host binary.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HostConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// The hosted web service.
    pub service: ServiceConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Web service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Service name, reported in snapshots and errors.
    pub name: String,

    /// Path prefix for every router of the service.
    pub path: String,

    /// Package name, used for the app data directory.
    pub package_name: String,

    /// Root for the app data directory (absolute, or relative to the executable).
    pub app_data_root: Option<String>,

    /// Initial user name for the greeting state.
    pub user_name: String,

    /// Extra state entries, merged over the defaults.
    pub state: Map<String, Value>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: crate::greeting::SERVICE_NAME.to_string(),
            path: crate::greeting::SERVICE_PATH.to_string(),
            package_name: crate::greeting::PACKAGE_NAME.to_string(),
            app_data_root: None,
            user_name: "Jaymoney".to_string(),
            state: Map::new(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
