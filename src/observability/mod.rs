//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Service transitions, mounts, requests
//!     → logging.rs (tracing subscriber, structured events)
//!     → metrics.rs (counters and gauges)
//!
//! Consumers:
//!     → stdout (fmt layer, filtered by EnvFilter)
//!     → Prometheus scrape endpoint (optional)
//! ```

pub mod logging;
pub mod metrics;
