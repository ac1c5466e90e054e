//! JSON body parsing.
//!
//! Requests whose content type is JSON are buffered and parsed once; the
//! parsed value is placed in request extensions as [`JsonBody`]. Other
//! requests pass through untouched.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::{from_fn_with_state, Next},
    response::{IntoResponse, Response},
    Router,
};
use serde_json::{Map, Value};

use crate::http::middleware::WebMiddleware;
use crate::service::error::ControllerError;

/// Default body limit, in bytes.
pub const DEFAULT_JSON_LIMIT: usize = 100 * 1024;

/// Parsed JSON request body.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonBody(pub Value);

#[derive(Debug, Clone, Copy)]
pub struct JsonBodyMiddleware {
    limit: usize,
}

impl JsonBodyMiddleware {
    pub fn with_limit(limit: usize) -> Self {
        Self { limit }
    }
}

impl Default for JsonBodyMiddleware {
    fn default() -> Self {
        Self::with_limit(DEFAULT_JSON_LIMIT)
    }
}

impl WebMiddleware for JsonBodyMiddleware {
    fn name(&self) -> &'static str {
        "json"
    }

    fn apply(&self, router: Router) -> Router {
        router.layer(from_fn_with_state(self.limit, parse_json_body))
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| {
            let mime = mime.trim();
            mime.eq_ignore_ascii_case("application/json") || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

async fn parse_json_body(State(limit): State<usize>, request: Request, next: Next) -> Response {
    if !is_json(request.headers()) || request.extensions().get::<JsonBody>().is_some() {
        return next.run(request).await;
    }

    let (parts, body) = request.into_parts();
    let bytes = match axum::body::to_bytes(body, limit).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, limit, "Failed to read JSON body");
            return ControllerError::BadRequest(format!("unreadable request body: {}", e)).into_response();
        }
    };

    let value = if bytes.iter().all(u8::is_ascii_whitespace) {
        Value::Object(Map::new())
    } else {
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) => value,
            Err(e) => {
                return ControllerError::BadRequest(format!("invalid JSON body: {}", e)).into_response();
            }
        }
    };

    let mut request = Request::from_parts(parts, Body::from(bytes));
    request.extensions_mut().insert(JsonBody(value));
    next.run(request).await
}
