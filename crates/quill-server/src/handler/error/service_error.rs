//! Service error to HTTP error conversion.

use crate::handler::{Error, ErrorKind};

/// Tracing target for service error conversions.
const TRACING_TARGET: &str = "quill_server::handler::service";

impl From<crate::Error> for Error<'static> {
    fn from(error: crate::Error) -> Self {
        use crate::ErrorKind as ServiceErrorKind;

        match error.kind() {
            ServiceErrorKind::Auth => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %error,
                    "authentication failed"
                );
                ErrorKind::Unauthorized.into_error()
            }
            ServiceErrorKind::Config | ServiceErrorKind::Internal => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %error,
                    error_kind = %error.kind(),
                    "service operation failed"
                );
                ErrorKind::InternalServerError.into_error()
            }
        }
    }
}
