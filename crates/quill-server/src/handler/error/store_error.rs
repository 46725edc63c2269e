//! Store error to HTTP error conversion.

use quill_store::StoreError;

use crate::handler::{Error, ErrorKind};

/// Tracing target for store error conversions.
const TRACING_TARGET: &str = "quill_server::handler::store";

impl From<StoreError> for Error<'static> {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound { resource } => ErrorKind::NotFound.with_resource(resource),
            StoreError::Conflict(reason) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    reason = %reason,
                    "store constraint violated"
                );
                ErrorKind::Conflict.with_context(reason)
            }
            StoreError::Unexpected(reason) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    reason = %reason,
                    "unexpected store error"
                );
                ErrorKind::InternalServerError.into_error()
            }
        }
    }
}
