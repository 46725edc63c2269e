//! Session error to HTTP error conversion.

use crate::handler::{Error, ErrorKind};
use crate::service::SessionError;
use crate::utility::tracing_targets::TRACING_TARGET_SESSION as TRACING_TARGET;

impl From<SessionError> for Error<'static> {
    fn from(error: SessionError) -> Self {
        // Invalid and expired render identically so callers cannot probe
        // token validity.
        if error.is_unauthenticated() {
            tracing::debug!(
                target: TRACING_TARGET,
                error = %error,
                "session rejected"
            );
            return ErrorKind::Unauthorized.with_resource("session");
        }

        match error {
            SessionError::InvalidUser(ref errors) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    errors = ?errors.field_errors(),
                    "session identity is incomplete"
                );
            }
            _ => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %error,
                    "failed to issue session"
                );
            }
        }

        ErrorKind::InternalServerError.into_error()
    }
}
