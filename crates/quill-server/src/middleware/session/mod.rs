//! Session middleware for routes that need a signed-in user.
//!
//! Layer order matters: [`refresh_session_middleware`] runs first and
//! re-issues the cookie, then [`require_session`] rejects anonymous requests.

mod refresh_session;
mod require_session;

pub use refresh_session::refresh_session_middleware;
pub use require_session::require_session;

/// Tracing target for session middleware.
const TRACING_TARGET: &str = "quill_server::middleware::session";
