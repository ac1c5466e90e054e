//! HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum::serve, graceful shutdown)
//!     → axum_host.rs (dispatch to the live composed router)
//!     → mounted router (service middleware → controller middleware → handler)
//! ```

pub mod axum_host;
pub mod host;
pub mod middleware;
pub mod server;

pub use axum_host::AxumHost;
pub use host::{HostApp, HostError, MountId};
pub use middleware::X_REQUEST_ID;
pub use server::HttpServer;
