use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::extract::AuthSession;

/// Rejects requests that carry no valid session.
///
/// The [`AuthSession`] extractor performs the check and rejects with
/// `401 missing_auth_token`.
pub async fn require_session(
    AuthSession(_): AuthSession,
    request: Request,
    next: Next,
) -> Response {
    next.run(request).await
}
