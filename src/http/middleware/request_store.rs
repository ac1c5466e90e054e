//! Request-store injection.

use axum::{
    extract::{Request, State},
    middleware::{from_fn_with_state, Next},
    response::Response,
    Router,
};

use crate::http::middleware::WebMiddleware;
use crate::service::state::{RequestStore, ServiceState};

/// Attaches a fresh [`RequestStore`] to every request before any controller runs.
#[derive(Debug, Clone)]
pub struct RequestStoreMiddleware {
    state: ServiceState,
}

impl RequestStoreMiddleware {
    pub fn new(state: ServiceState) -> Self {
        Self { state }
    }
}

impl WebMiddleware for RequestStoreMiddleware {
    fn name(&self) -> &'static str {
        "RequestStoreMiddleware"
    }

    fn apply(&self, router: Router) -> Router {
        router.layer(from_fn_with_state(self.state.clone(), inject_request_store))
    }
}

async fn inject_request_store(
    State(state): State<ServiceState>,
    mut request: Request,
    next: Next,
) -> Response {
    // Exactly once per request, even when several layers are stacked.
    if request.extensions().get::<RequestStore>().is_none() {
        request.extensions_mut().insert(RequestStore::new(state));
    }
    next.run(request).await
}
