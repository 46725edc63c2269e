#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

// Tracing target constants for consistent logging.

/// Tracing target for client-related operations.
///
/// Use this target for logging store initialization and lifecycle events.
pub const TRACING_TARGET_CLIENT: &str = "quill_store::client";

/// Tracing target for repository query operations.
pub const TRACING_TARGET_QUERY: &str = "quill_store::queries";

mod client;
pub mod model;
pub mod query;

use std::borrow::Cow;

pub use crate::client::MemoryStore;

/// Error type for all repository operations.
#[derive(Debug, thiserror::Error)]
#[must_use = "store errors should be handled appropriately"]
pub enum StoreError {
    /// The addressed record does not exist.
    #[error("{resource} not found")]
    NotFound {
        /// Name of the missing resource (e.g. `post`).
        resource: &'static str,
    },

    /// The write would violate a uniqueness or reference constraint.
    #[error("Constraint violation: {0}")]
    Conflict(Cow<'static, str>),

    /// Unexpected error occurred.
    #[error("Unexpected error: {0}")]
    Unexpected(Cow<'static, str>),
}

impl StoreError {
    /// Creates a [`StoreError::NotFound`] for the given resource.
    #[inline]
    pub const fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    /// Returns whether this error reports a missing record.
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Specialized [`Result`] type for repository operations.
pub type StoreResult<T, E = StoreError> = Result<T, E>;
