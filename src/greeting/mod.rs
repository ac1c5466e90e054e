//! Greeting service: a small service exercising shared request state.
//!
//! ```text
//! GET  /webservice/api/hello    → {"message":"Hello <currentUserName>!"}
//! POST /webservice/api/name     → {"message":"Username has been updated from <old> to <new>"}
//! GET  /webservice/api/creator  → {"creatorName":…,"createdAt":…}
//! ```

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{json, Map, Value};

use crate::http::host::HostApp;
use crate::service::{RouterClass, WebService, WebServiceProps};

pub mod controllers;
pub mod router;

pub use router::greeting_router;

pub const SERVICE_NAME: &str = "GreetingWebService";
pub const PACKAGE_NAME: &str = "@web-service-host/greeting";
pub const SERVICE_PATH: &str = "webservice";

/// Default construction options for the greeting service.
pub fn default_props(port: u16, state: Map<String, Value>) -> WebServiceProps {
    WebServiceProps {
        name: SERVICE_NAME.to_string(),
        port,
        package_name: PACKAGE_NAME.to_string(),
        path: SERVICE_PATH.to_string(),
        state,
        app_data_root: None,
    }
}

/// Initial state: the current user and creator are both `user_name`.
pub fn initial_state(user_name: &str) -> Map<String, Value> {
    let created_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64;

    let mut state = Map::new();
    state.insert("memoryDb".into(), json!({}));
    state.insert("currentUserName".into(), json!(user_name));
    state.insert("creatorName".into(), json!(user_name));
    state.insert("createdAt".into(), json!(created_at));
    state
}

/// Build the (uninstalled) greeting service.
pub fn greeting_service(host: Arc<dyn HostApp>, props: WebServiceProps) -> WebService {
    WebService::new(host, props).with_router(RouterClass::new(|_props| Ok(greeting_router())))
}
