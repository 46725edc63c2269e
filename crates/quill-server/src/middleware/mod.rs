//! Middleware for `axum::Router` and HTTP request processing.
//!
//! - Session refresh and session-required guards
//! - Error handling (panics, timeouts, service errors)
//! - Observability (tracing, request IDs)
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use axum::Router;
//! use quill_server::middleware::RouterExt;
//!
//! let app: Router = Router::new()
//!     .with_error_handling_layer(Duration::from_secs(30))
//!     .with_observability_layer();
//! ```

mod error_handling;
mod extensions;
mod observability;
mod session;

pub use extensions::RouterExt;
pub use session::{refresh_session_middleware, require_session};
