//! Centralized tracing target constants for structured logging.
//!
//! Using consistent targets enables fine-grained control over log output
//! via tracing subscriber filters, e.g. `RUST_LOG=quill_server::session=debug`.

/// Login, logout and registration handling.
pub const TRACING_TARGET_AUTHENTICATION: &str = "quill_server::authentication";

/// Session token issuance, verification and refresh.
pub const TRACING_TARGET_SESSION: &str = "quill_server::session";

/// Password hashing and verification operations.
pub const TRACING_TARGET_PASSWORD_HASHER: &str = "quill_server::password_hasher";

/// Session key loading and validation.
pub const TRACING_TARGET_SESSION_KEYS: &str = "quill_server::session_keys";

/// Post management handlers.
pub const TRACING_TARGET_POSTS: &str = "quill_server::posts";

/// Error responses produced by handlers and extractors.
pub const TRACING_TARGET_RECOVERY_ERROR: &str = "quill_server::recovery::error";
