//! Middleware descriptors applied around mounted routers and controllers.
//!
//! # Data Flow
//! ```text
//! incoming request
//!     → request_store.rs (attach RequestStore)
//!     → request_id.rs (x-request-id set + propagated)
//!     → logger.rs (span + completion log)
//!     → per-controller middleware (e.g. json.rs)
//!     → controller handler
//! ```
//!
//! # Design Decisions
//! - Middleware is a named descriptor so services can report it in snapshots
//! - A list runs in declaration order: the first entry is the outermost layer

use std::sync::Arc;

use axum::Router;

pub mod json;
pub mod logger;
pub mod request_id;
pub mod request_store;

pub use json::{JsonBody, JsonBodyMiddleware};
pub use logger::RequestLoggerMiddleware;
pub use request_id::{RequestIdMiddleware, X_REQUEST_ID};
pub use request_store::RequestStoreMiddleware;

/// A named layer that can wrap a router.
pub trait WebMiddleware: Send + Sync + std::fmt::Debug + 'static {
    /// Name reported in service snapshots.
    fn name(&self) -> &'static str;

    /// Wrap every route currently registered on `router`.
    fn apply(&self, router: Router) -> Router;
}

/// Apply `middleware` so that it runs in declaration order.
pub fn apply_all(router: Router, middleware: &[Arc<dyn WebMiddleware>]) -> Router {
    // Router::layer wraps outermost, so the first entry must be applied last.
    middleware.iter().rev().fold(router, |router, m| m.apply(router))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        extract::Request,
        http::{HeaderValue, StatusCode},
        middleware::{from_fn_with_state, Next},
        response::Response,
        routing::get,
    };
    use tower::ServiceExt;

    #[derive(Debug)]
    struct Tag(&'static str);

    async fn push_tag(
        axum::extract::State(tag): axum::extract::State<&'static str>,
        request: Request,
        next: Next,
    ) -> Response {
        let mut response = next.run(request).await;
        // Inner layers append first, so the header reads innermost-to-outermost.
        let seen = response
            .headers()
            .get("x-order")
            .and_then(|v| v.to_str().ok())
            .map(|s| format!("{},{}", s, tag))
            .unwrap_or_else(|| tag.to_string());
        response
            .headers_mut()
            .insert("x-order", HeaderValue::from_str(&seen).unwrap());
        response
    }

    impl WebMiddleware for Tag {
        fn name(&self) -> &'static str {
            self.0
        }

        fn apply(&self, router: Router) -> Router {
            router.layer(from_fn_with_state(self.0, push_tag))
        }
    }

    #[tokio::test]
    async fn test_declaration_order_is_execution_order() {
        let chain: Vec<Arc<dyn WebMiddleware>> =
            vec![Arc::new(Tag("first")), Arc::new(Tag("second")), Arc::new(Tag("third"))];
        let router = apply_all(Router::new().route("/", get(|| async { "ok" })), &chain);

        let response = router
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        // Responses unwind from the innermost layer outwards.
        assert_eq!(response.headers()["x-order"], "third,second,first");
    }
}
