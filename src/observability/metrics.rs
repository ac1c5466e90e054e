//! Metrics collection and exposition.
//!
//! # Metrics
//! - `web_service_transitions_total` (counter): install/uninstall by service, outcome
//! - `web_service_installed_routers` (gauge): routers currently mounted per service
//! - `http_requests_total` (counter): completed requests by status
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_transition(service: &str, transition: &'static str, outcome: &'static str) {
    metrics::counter!(
        "web_service_transitions_total",
        "service" => service.to_string(),
        "transition" => transition,
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_installed_routers(service: &str, count: usize) {
    metrics::gauge!("web_service_installed_routers", "service" => service.to_string()).set(count as f64);
}

pub fn record_request(status: u16) {
    metrics::counter!("http_requests_total", "status" => status.to_string()).increment(1);
}
