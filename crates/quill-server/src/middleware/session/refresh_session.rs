use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;

use super::TRACING_TARGET;
use crate::handler::Error;
use crate::service::{CookieStore, SessionManager};

/// Re-issues the inbound session cookie with a fresh default lifetime.
///
/// - No session cookie: the request passes through untouched.
/// - Valid cookie: the refreshed cookie is appended to the response and the
///   new claims are made visible to session extractors downstream.
/// - Invalid or expired cookie: the request is answered with `401` and a
///   removal cookie without reaching the handler.
pub async fn refresh_session_middleware(
    State(session_manager): State<SessionManager>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let mut outgoing = CookieJar::new();
    let incoming = jar.get_cookie(session_manager.cookie_name());

    match session_manager.refresh_session(incoming, &mut outgoing) {
        Ok(Some(claims)) => {
            tracing::debug!(
                target: TRACING_TARGET,
                user_id = %claims.user.id,
                path = %request.uri().path(),
                "session refreshed for request"
            );
            request.extensions_mut().insert(claims);
            (outgoing, next.run(request).await).into_response()
        }
        Ok(None) => next.run(request).await,
        Err(err) => {
            tracing::debug!(
                target: TRACING_TARGET,
                path = %request.uri().path(),
                "rejecting request with unusable session"
            );
            (outgoing, Error::from(err)).into_response()
        }
    }
}
