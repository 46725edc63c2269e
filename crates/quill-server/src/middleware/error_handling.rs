//! Error handling for panics, timeouts and other tower service errors.

use std::any::Any;

use axum::response::{IntoResponse, Response};
use tower::BoxError;
use tower::timeout::error::Elapsed;

use crate::handler::{Error, ErrorKind};
use crate::utility::tracing_targets::TRACING_TARGET_RECOVERY_ERROR as TRACING_TARGET;

type Panic = Box<dyn Any + Send + 'static>;

/// Converts errors from fallible middleware into JSON error responses.
pub async fn handle_error(err: BoxError) -> Response {
    let error = if err.is::<Elapsed>() {
        tracing::error!(
            target: TRACING_TARGET,
            error = %err,
            "request timeout exceeded"
        );

        ErrorKind::InternalServerError
            .with_message("Request timeout")
            .with_context("The request took too long to process and was terminated")
    } else {
        tracing::error!(
            target: TRACING_TARGET,
            error = %err,
            "unknown middleware error"
        );

        Error::new(ErrorKind::InternalServerError)
            .with_message("An unexpected error occurred")
    };

    error.into_response()
}

/// Logs the panic payload and answers with `500`.
pub fn catch_panic(err: Panic) -> Response {
    if let Some(panic) = err.downcast_ref::<String>() {
        tracing::error!(target: TRACING_TARGET, "service panic: {}", panic);
    } else if let Some(panic) = err.downcast_ref::<&str>() {
        tracing::error!(target: TRACING_TARGET, "service panic: {}", panic);
    } else {
        tracing::error!(target: TRACING_TARGET, "service panic: unknown panic type");
    }

    ErrorKind::InternalServerError.into_response()
}
