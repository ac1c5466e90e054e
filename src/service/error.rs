//! Lifecycle, router and controller errors.

use std::fmt;
use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::service::controller::HttpMethod;

/// The original value raised while mounting or unmounting routers.
///
/// Most failures are typed errors, but router factories and host
/// implementations may also fail with an arbitrary JSON payload (a bare
/// string, an object). Both are carried verbatim.
#[derive(Debug, Clone)]
pub enum Cause {
    Error(Arc<dyn std::error::Error + Send + Sync>),
    Value(Value),
}

impl Cause {
    /// Wrap a typed error.
    pub fn error<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Cause::Error(Arc::new(err))
    }

    /// Wrap a raw payload.
    pub fn value(value: impl Into<Value>) -> Self {
        Cause::Value(value.into())
    }

    /// The raw payload, if this cause is not a typed error.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Cause::Value(v) => Some(v),
            Cause::Error(_) => None,
        }
    }

    /// Downcast a typed cause.
    pub fn downcast_ref<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            Cause::Error(e) => e.downcast_ref::<E>(),
            Cause::Value(_) => None,
        }
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Error(e) => write!(f, "{}", e),
            Cause::Value(Value::String(s)) => f.write_str(s),
            Cause::Value(v) => write!(f, "{}", v),
        }
    }
}

impl std::error::Error for Cause {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Cause::Error(e) => e.source(),
            Cause::Value(_) => None,
        }
    }
}

impl Serialize for Cause {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cause::Error(e) => serializer.serialize_str(&e.to_string()),
            Cause::Value(v) => v.serialize(serializer),
        }
    }
}

impl From<&str> for Cause {
    fn from(value: &str) -> Self {
        Cause::Value(Value::String(value.to_string()))
    }
}

impl From<String> for Cause {
    fn from(value: String) -> Self {
        Cause::Value(Value::String(value))
    }
}

impl From<Value> for Cause {
    fn from(value: Value) -> Self {
        Cause::Value(value)
    }
}

impl From<RouterError> for Cause {
    fn from(err: RouterError) -> Self {
        Cause::error(err)
    }
}

impl From<crate::http::host::HostError> for Cause {
    fn from(err: crate::http::host::HostError) -> Self {
        Cause::error(err)
    }
}

/// Errors surfaced by [`WebService`](crate::service::WebService) transitions.
#[derive(Error, Debug, Clone)]
pub enum ServiceError {
    #[error("Service {0} is already installed")]
    AlreadyInstalled(String),
    #[error("Failed to uninstall non installed service {0}")]
    NotInstalled(String),
    #[error("WebService {name} failed to install")]
    InstallFailed {
        name: String,
        #[source]
        error: Cause,
    },
    #[error("WebService {name} failed to uninstall")]
    UninstallFailed {
        name: String,
        #[source]
        error: Cause,
    },
}

impl ServiceError {
    /// The original cause of an install or uninstall failure.
    pub fn error(&self) -> Option<&Cause> {
        match self {
            ServiceError::InstallFailed { error, .. } | ServiceError::UninstallFailed { error, .. } => {
                Some(error)
            }
            ServiceError::AlreadyInstalled(_) | ServiceError::NotInstalled(_) => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    #[error("router {router} has invalid path '{path}'")]
    InvalidPath { router: String, path: String },
    #[error("controller {controller} has invalid action '{action}'")]
    InvalidAction { controller: String, action: String },
    #[error("router {router} registers {method} '{action}' twice")]
    DuplicateRoute {
        router: String,
        method: HttpMethod,
        action: String,
    },
    #[error("router {0} is already mounted")]
    AlreadyMounted(String),
    #[error("router {0} is not mounted")]
    NotMounted(String),
}

/// Errors returned by controller handlers; rendered as JSON error bodies.
#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("request store missing from request")]
    MissingRequestStore,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal: {0}")]
    Internal(String),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

impl IntoResponse for ControllerError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ControllerError::MissingRequestStore => (StatusCode::INTERNAL_SERVER_ERROR, "missing_request_store"),
            ControllerError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ControllerError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ControllerError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code,
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}
