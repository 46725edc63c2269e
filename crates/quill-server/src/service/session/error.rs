//! Session error type.

use jsonwebtoken::errors::Error as JwtError;
use validator::ValidationErrors;

/// Failures of session operations.
///
/// Read paths ([`current_session`]) collapse every variant to `None`. The
/// HTTP layer renders [`InvalidToken`] and [`SessionExpired`] identically.
///
/// [`current_session`]: super::SessionManager::current_session
/// [`InvalidToken`]: SessionError::InvalidToken
/// [`SessionExpired`]: SessionError::SessionExpired
#[derive(Debug, thiserror::Error)]
#[must_use = "session errors should be handled appropriately"]
pub enum SessionError {
    /// The session identity has an empty field.
    #[error("session user is incomplete: {0}")]
    InvalidUser(#[from] ValidationErrors),

    /// The requested lifetime is shorter than one second or out of range.
    #[error("session lifetime must be at least one second")]
    InvalidTtl,

    /// The token is malformed, tampered with or signed with another key.
    #[error("session token is invalid")]
    InvalidToken(#[source] JwtError),

    /// The token is past its expiry plus the clock-skew tolerance.
    #[error("session has expired")]
    SessionExpired,

    /// Signing the token failed.
    #[error("failed to sign session token")]
    Encoding(#[source] JwtError),
}

impl SessionError {
    /// Returns `true` for failures that mean "no usable session".
    #[inline]
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::InvalidToken(_) | Self::SessionExpired)
    }
}
