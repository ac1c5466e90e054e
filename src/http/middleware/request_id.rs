//! Request ID tagging.
//!
//! Uses tower-http's request-id layers: a UUID v4 is generated unless the
//! client already sent `x-request-id`, and the id is echoed on the response.

use axum::Router;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::http::middleware::WebMiddleware;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdMiddleware;

impl WebMiddleware for RequestIdMiddleware {
    fn name(&self) -> &'static str {
        "RequestIdMiddleware"
    }

    fn apply(&self, router: Router) -> Router {
        router.layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, extract::Request, routing::get};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_generates_request_id() {
        let router = RequestIdMiddleware.apply(Router::new().route("/", get(|| async { "ok" })));
        let response = router
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let id = response.headers()[X_REQUEST_ID].to_str().unwrap();
        assert!(uuid::Uuid::parse_str(id).is_ok());
    }

    #[tokio::test]
    async fn test_keeps_client_request_id() {
        let router = RequestIdMiddleware.apply(Router::new().route("/", get(|| async { "ok" })));
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(X_REQUEST_ID, "client-id-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()[X_REQUEST_ID], "client-id-1");
    }
}
