//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → Logging/metrics → Host → Install service → Serve
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain → Uninstall service → Exit
//!
//! Signals (signals.rs):
//!     SIGINT (Ctrl+C) → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then the listener, then the service
//! - The service is uninstalled only after the server has stopped

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{Shutdown, ShutdownSignal};
