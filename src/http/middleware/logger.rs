//! Request logging.

use std::time::Duration;

use axum::{body::Body, http::Request, response::Response, Router};
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::http::middleware::request_id::X_REQUEST_ID;
use crate::http::middleware::WebMiddleware;
use crate::observability::metrics;

/// Opens a span per request and logs its completion.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestLoggerMiddleware;

impl WebMiddleware for RequestLoggerMiddleware {
    fn name(&self) -> &'static str {
        "RequestLoggerMiddleware"
    }

    fn apply(&self, router: Router) -> Router {
        router.layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get(X_REQUEST_ID)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("unknown");
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id,
                    )
                })
                .on_response(|response: &Response<Body>, latency: Duration, _span: &Span| {
                    let status = response.status().as_u16();
                    tracing::info!(
                        status,
                        latency_ms = latency.as_millis() as u64,
                        "Request completed"
                    );
                    metrics::record_request(status);
                }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_logger_is_transparent() {
        let router = RequestLoggerMiddleware.apply(Router::new().route("/", get(|| async { "ok" })));
        let response = router
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(response.status().is_success());
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"ok");
    }
}
