//! Session extractors backed by the session cookie.

use axum::extract::{FromRef, FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use derive_more::Deref;

use crate::handler::{Error, ErrorKind};
use crate::service::{SessionClaims, SessionManager};
use crate::utility::tracing_targets::TRACING_TARGET_AUTHENTICATION;

/// Claims of the current session, if the request carries a valid one.
///
/// Never rejects: a missing, tampered or expired cookie all yield `None`.
#[derive(Debug, Clone, Default, Deref, PartialEq, Eq)]
pub struct CurrentSession(pub Option<SessionClaims>);

impl CurrentSession {
    /// Returns the inner claims.
    #[inline]
    pub fn into_inner(self) -> Option<SessionClaims> {
        self.0
    }

    fn from_parts(parts: &Parts, session_manager: &SessionManager) -> Self {
        // Claims re-issued by the refresh middleware take precedence.
        if let Some(claims) = parts.extensions.get::<SessionClaims>() {
            return Self(Some(claims.clone()));
        }

        let jar = CookieJar::from_headers(&parts.headers);
        Self(session_manager.current_session(&jar))
    }
}

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Sync + Send + 'static,
    SessionManager: FromRef<S>,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session_manager = SessionManager::from_ref(state);
        Ok(Self::from_parts(parts, &session_manager))
    }
}

/// Claims of a session that must be present.
///
/// Rejects with `401 missing_auth_token` when the request has no valid
/// session.
#[derive(Debug, Clone, Deref, PartialEq, Eq)]
pub struct AuthSession(pub SessionClaims);

impl AuthSession {
    /// Returns the inner claims.
    #[inline]
    pub fn into_inner(self) -> SessionClaims {
        self.0
    }
}

impl<S> FromRequestParts<S> for AuthSession
where
    S: Sync + Send + 'static,
    SessionManager: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session_manager = SessionManager::from_ref(state);
        match CurrentSession::from_parts(parts, &session_manager).into_inner() {
            Some(claims) => Ok(Self(claims)),
            None => {
                tracing::debug!(
                    target: TRACING_TARGET_AUTHENTICATION,
                    path = %parts.uri.path(),
                    "request without a valid session"
                );
                Err(ErrorKind::MissingAuthToken.with_resource("session"))
            }
        }
    }
}

impl<S> OptionalFromRequestParts<S> for AuthSession
where
    S: Sync + Send + 'static,
    SessionManager: FromRef<S>,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        let session_manager = SessionManager::from_ref(state);
        let current = CurrentSession::from_parts(parts, &session_manager);
        Ok(current.into_inner().map(Self))
    }
}
