//! Web service lifecycle subsystem.
//!
//! # Data Flow
//! ```text
//! WebService::install()
//!     → router.rs (RouterClass builds WebRouter)
//!     → controller.rs (ControllerClass builds WebController, route registered)
//!     → http::host (one use_router call per router)
//!
//! Request:
//!     → state.rs (RequestStore attached by middleware)
//!     → converter.rs (state exported for the controller)
//!     → controller handler (reads/mutates the store)
//!
//! WebService::uninstall()
//!     → one unuse_router call per installed router
//!     → installed router list cleared
//! ```

pub mod app_data;
pub mod controller;
pub mod converter;
pub mod error;
pub mod router;
pub mod snapshot;
pub mod state;
pub mod web_service;

pub use controller::{ControllerClass, ControllerHandler, ControllerProps, ControllerRequest, HttpMethod, WebController};
pub use converter::{DefaultStateExporter, StateConverter};
pub use error::{Cause, ControllerError, RouterError, ServiceError};
pub use router::{RouterClass, RouterProps, WebRouter};
pub use snapshot::Snapshot;
pub use state::{RequestStore, ServiceState};
pub use web_service::{WebService, WebServiceProps};
