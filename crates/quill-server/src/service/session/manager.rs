//! Session issuance, verification and refresh.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use jiff::Timestamp;
use jsonwebtoken::{Algorithm, Header, Validation};
use validator::Validate;

use super::cookies::{CookieStore, session_cookie};
use super::{Acknowledgement, Clock, SessionClaims, SessionError, SessionToken, SessionUser};
use crate::service::SessionKeys;
use crate::utility::tracing_targets::TRACING_TARGET_SESSION as TRACING_TARGET;

/// Lifetimes and cookie naming for sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPolicy {
    /// Lifetime of a regular session and of every refreshed session.
    pub default_ttl: Duration,
    /// Lifetime of a "remember me" session.
    pub extended_ttl: Duration,
    /// How long past `expiresAt` a token is still accepted.
    pub clock_skew: Duration,
    /// Name of the session cookie.
    pub cookie_name: Cow<'static, str>,
}

impl SessionPolicy {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(300);
    pub const EXTENDED_TTL: Duration = Duration::from_secs(24 * 60 * 60);
    pub const CLOCK_SKEW: Duration = Duration::from_secs(5);
    pub const COOKIE_NAME: &'static str = "session";

    /// Returns the lifetime for a login with the given remember-me choice.
    #[inline]
    pub const fn ttl(&self, remember: bool) -> Duration {
        if remember {
            self.extended_ttl
        } else {
            self.default_ttl
        }
    }
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            default_ttl: Self::DEFAULT_TTL,
            extended_ttl: Self::EXTENDED_TTL,
            clock_skew: Self::CLOCK_SKEW,
            cookie_name: Cow::Borrowed(Self::COOKIE_NAME),
        }
    }
}

/// Issues, verifies and refreshes session tokens.
///
/// Holds only immutable keys and policy plus the clock, so clones can be
/// shared freely across request handlers.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionManagerInner>,
}

struct SessionManagerInner {
    keys: SessionKeys,
    policy: SessionPolicy,
    clock: Arc<dyn Clock>,
    validation: Validation,
}

impl SessionManager {
    /// Creates a new session manager.
    pub fn new(keys: SessionKeys, policy: SessionPolicy, clock: impl Clock) -> Self {
        // Expiry is checked against the injected clock, not the system time.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        let inner = SessionManagerInner {
            keys,
            policy,
            clock: Arc::new(clock),
            validation,
        };

        Self {
            inner: Arc::new(inner),
        }
    }

    /// Returns the session policy.
    #[inline]
    pub fn policy(&self) -> &SessionPolicy {
        &self.inner.policy
    }

    /// Returns the name of the session cookie.
    #[inline]
    pub fn cookie_name(&self) -> &str {
        &self.inner.policy.cookie_name
    }

    /// Current time truncated to whole seconds, the granularity of `iat`.
    fn now(&self) -> Timestamp {
        let now = self.inner.clock.now();
        Timestamp::from_second(now.as_second()).unwrap_or(now)
    }

    /// Signs a token for `user` valid for `ttl`.
    ///
    /// `ttl` is truncated to whole seconds.
    ///
    /// # Errors
    ///
    /// - [`SessionError::InvalidTtl`] if `ttl` is under one second or overflows
    /// - [`SessionError::Encoding`] if signing fails
    pub fn encode(&self, user: &SessionUser, ttl: Duration) -> Result<SessionToken, SessionError> {
        let ttl = Duration::from_secs(ttl.as_secs());
        if ttl.is_zero() {
            return Err(SessionError::InvalidTtl);
        }

        let issued_at = self.now();
        let expires_at = issued_at
            .checked_add(ttl)
            .map_err(|_| SessionError::InvalidTtl)?;

        let claims = SessionClaims {
            user: user.clone(),
            issued_at,
            expires_at,
        };

        let header = Header::new(Algorithm::HS256);
        let token = jsonwebtoken::encode(&header, &claims, self.inner.keys.encoding_key())
            .map_err(|e| {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    user_id = %user.id,
                    "failed to sign session token"
                );
                SessionError::Encoding(e)
            })?;

        Ok(SessionToken { token, claims })
    }

    /// Verifies `token` and returns its claims.
    ///
    /// A token is expired once `now >= expiresAt + clock_skew`.
    ///
    /// # Errors
    ///
    /// - [`SessionError::InvalidToken`] for a bad signature, algorithm or
    ///   payload
    /// - [`SessionError::SessionExpired`] past the tolerated expiry
    pub fn decode(&self, token: &str) -> Result<SessionClaims, SessionError> {
        let token_data = jsonwebtoken::decode::<SessionClaims>(
            token,
            self.inner.keys.decoding_key(),
            &self.inner.validation,
        )
        .map_err(|e| {
            tracing::debug!(
                target: TRACING_TARGET,
                cause = ?e.kind(),
                "session token rejected"
            );
            SessionError::InvalidToken(e)
        })?;

        let claims = token_data.claims;
        let deadline = claims
            .expires_at
            .checked_add(self.inner.policy.clock_skew)
            .unwrap_or(Timestamp::MAX);

        if self.inner.clock.now() >= deadline {
            tracing::debug!(
                target: TRACING_TARGET,
                user_id = %claims.user.id,
                expired_at = %claims.expires_at,
                "session token expired"
            );
            return Err(SessionError::SessionExpired);
        }

        Ok(claims)
    }

    /// Starts a session for `user` and writes the session cookie.
    ///
    /// The cookie lives for the extended lifetime when `remember` is set and
    /// for the default lifetime otherwise. Any previous session cookie is
    /// overwritten.
    pub fn login(
        &self,
        cookies: &mut impl CookieStore,
        user: &SessionUser,
        remember: bool,
    ) -> Result<Acknowledgement, SessionError> {
        user.validate()?;

        let session = self.encode(user, self.inner.policy.ttl(remember))?;
        let cookie = session_cookie(
            self.cookie_name(),
            session.token,
            session.claims.expires_at,
        )?;
        cookies.set_cookie(cookie);

        tracing::info!(
            target: TRACING_TARGET,
            user_id = %user.id,
            remember,
            expires_at = %session.claims.expires_at,
            "session started"
        );

        Ok(Acknowledgement::LOGIN)
    }

    /// Ends the session by emitting a removal cookie. Idempotent.
    pub fn logout(&self, cookies: &mut impl CookieStore) -> Acknowledgement {
        cookies.remove_cookie(self.cookie_name());
        tracing::debug!(target: TRACING_TARGET, "session cookie cleared");
        Acknowledgement::LOGOUT
    }

    /// Returns the claims of the current session, if any.
    ///
    /// A missing cookie and any verification failure both yield `None`.
    pub fn current_session(&self, cookies: &impl CookieStore) -> Option<SessionClaims> {
        let token = cookies.get_cookie(self.cookie_name())?;
        self.decode(token).ok()
    }

    /// Re-issues the session carried by `incoming` with a fresh lifetime.
    ///
    /// Only `id`, `email` and `name` are carried over. The new token always
    /// gets the default lifetime, so a remember-me session shortens on its
    /// first refresh.
    ///
    /// Timestamps have whole-second granularity. A refresh within the same
    /// second as issuance yields the same `issuedAt` and a byte-identical
    /// token, so callers must not rely on strictly increasing issue times.
    ///
    /// Returns `Ok(None)` without touching `outgoing` when there is no token.
    ///
    /// # Errors
    ///
    /// When `incoming` fails verification, a removal cookie is written to
    /// `outgoing` and [`SessionError::SessionExpired`] is returned.
    pub fn refresh_session(
        &self,
        incoming: Option<&str>,
        outgoing: &mut impl CookieStore,
    ) -> Result<Option<SessionClaims>, SessionError> {
        let Some(token) = incoming else {
            return Ok(None);
        };

        let claims = match self.decode(token) {
            Ok(claims) => claims,
            Err(err) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %err,
                    "session refresh failed, clearing cookie"
                );
                outgoing.remove_cookie(self.cookie_name());
                return Err(SessionError::SessionExpired);
            }
        };

        let session = self.encode(&claims.user, self.inner.policy.default_ttl)?;
        let cookie = session_cookie(
            self.cookie_name(),
            session.token,
            session.claims.expires_at,
        )?;
        outgoing.set_cookie(cookie);

        tracing::trace!(
            target: TRACING_TARGET,
            user_id = %session.claims.user.id,
            expires_at = %session.claims.expires_at,
            "session refreshed"
        );

        Ok(Some(session.claims))
    }
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("policy", &self.inner.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use axum_extra::extract::cookie::CookieJar;

    use super::*;
    use crate::service::session::ManualClock;

    const EPOCH: i64 = 1_700_000_000;

    fn manager() -> (SessionManager, ManualClock) {
        let clock = ManualClock::new(Timestamp::from_second(EPOCH).unwrap());
        let keys = SessionKeys::from_secret("test-secret").unwrap();
        let manager = SessionManager::new(keys, SessionPolicy::default(), clock.clone());
        (manager, clock)
    }

    fn user() -> SessionUser {
        SessionUser::new("1", "a@b.com", "A")
    }

    #[test]
    fn encode_then_decode_preserves_identity() {
        let (manager, _) = manager();
        let session = manager.encode(&user(), Duration::from_secs(300)).unwrap();

        let claims = manager.decode(&session.token).unwrap();
        assert_eq!(claims.user, user());
        assert!(claims.issued_at < claims.expires_at);
        assert_eq!(claims, session.claims);
    }

    #[test]
    fn encode_is_deterministic_for_fixed_clock() {
        let (manager, _) = manager();
        let first = manager.encode(&user(), Duration::from_secs(60)).unwrap();
        let second = manager.encode(&user(), Duration::from_secs(60)).unwrap();
        assert_eq!(first.token, second.token);
    }

    #[test]
    fn encode_rejects_zero_ttl() {
        let (manager, _) = manager();
        let result = manager.encode(&user(), Duration::ZERO);
        assert!(matches!(result, Err(SessionError::InvalidTtl)));

        let result = manager.encode(&user(), Duration::from_millis(999));
        assert!(matches!(result, Err(SessionError::InvalidTtl)));
    }

    #[test]
    fn any_single_character_mutation_is_rejected() {
        let (manager, _) = manager();
        let token = manager.encode(&user(), Duration::from_secs(300)).unwrap().token;

        for (index, original) in token.char_indices() {
            let replacement = if original == 'A' { 'B' } else { 'A' };
            let mut tampered = token.clone();
            tampered.replace_range(index..index + 1, &replacement.to_string());

            let result = manager.decode(&tampered);
            assert!(
                matches!(result, Err(SessionError::InvalidToken(_))),
                "mutation at {index} was accepted"
            );
        }
    }

    #[test]
    fn foreign_key_is_rejected() {
        let (manager, clock) = manager();
        let other = SessionManager::new(
            SessionKeys::from_secret("other-secret").unwrap(),
            SessionPolicy::default(),
            clock,
        );

        let token = other.encode(&user(), Duration::from_secs(300)).unwrap().token;
        assert!(matches!(
            manager.decode(&token),
            Err(SessionError::InvalidToken(_))
        ));
    }

    #[test]
    fn expiry_honours_clock_skew() {
        let (manager, clock) = manager();
        let token = manager.encode(&user(), Duration::from_secs(1)).unwrap().token;

        clock.advance(Duration::from_secs(2));
        assert!(manager.decode(&token).is_ok());

        clock.advance(Duration::from_secs(4));
        assert!(matches!(
            manager.decode(&token),
            Err(SessionError::SessionExpired)
        ));
    }

    fn sign_raw(algorithm: Algorithm, payload: &serde_json::Value) -> String {
        let key = jsonwebtoken::EncodingKey::from_secret(b"test-secret");
        jsonwebtoken::encode(&Header::new(algorithm), payload, &key).unwrap()
    }

    #[test]
    fn other_algorithm_with_same_secret_is_rejected() {
        let (manager, _) = manager();
        let token = sign_raw(
            Algorithm::HS384,
            &serde_json::json!({
                "id": "1",
                "email": "a@b.com",
                "name": "A",
                "iat": EPOCH,
                "exp": EPOCH + 300,
            }),
        );

        assert!(matches!(
            manager.decode(&token),
            Err(SessionError::InvalidToken(_))
        ));
    }

    #[test]
    fn signed_payload_with_wrong_shape_is_rejected() {
        let (manager, _) = manager();

        let missing_iat = sign_raw(
            Algorithm::HS256,
            &serde_json::json!({
                "id": "1",
                "email": "a@b.com",
                "name": "A",
                "exp": EPOCH + 300,
            }),
        );
        assert!(matches!(
            manager.decode(&missing_iat),
            Err(SessionError::InvalidToken(_))
        ));

        let numeric_id = sign_raw(
            Algorithm::HS256,
            &serde_json::json!({
                "id": 1,
                "email": "a@b.com",
                "name": "A",
                "iat": EPOCH,
                "exp": EPOCH + 300,
            }),
        );
        assert!(matches!(
            manager.decode(&numeric_id),
            Err(SessionError::InvalidToken(_))
        ));
    }

    #[test]
    fn current_session_lapses_after_expiry() {
        let (manager, clock) = manager();
        let mut jar = CookieJar::new();
        manager.login(&mut jar, &user(), false).unwrap();
        assert!(manager.current_session(&jar).is_some());

        clock.advance(Duration::from_secs(300 + 5));
        assert!(manager.current_session(&jar).is_none());
    }

    #[test]
    fn refresh_within_same_second_reuses_issue_time() {
        let (manager, clock) = manager();
        let original = manager.encode(&user(), Duration::from_secs(300)).unwrap();

        clock.advance(Duration::from_millis(500));
        let mut outgoing = CookieJar::new();
        let refreshed = manager
            .refresh_session(Some(&original.token), &mut outgoing)
            .unwrap()
            .unwrap();

        assert_eq!(refreshed.issued_at, original.claims.issued_at);
    }

    #[test]
    fn login_then_current_session_then_logout() {
        let (manager, _) = manager();
        let mut jar = CookieJar::new();

        let ack = manager.login(&mut jar, &user(), false).unwrap();
        assert_eq!(ack, Acknowledgement::LOGIN);

        let claims = manager.current_session(&jar).unwrap();
        assert_eq!(claims.user.id, "1");

        let ack = manager.logout(&mut jar);
        assert_eq!(ack, Acknowledgement::LOGOUT);
        assert!(manager.current_session(&jar).is_none());

        // Logging out twice is harmless.
        manager.logout(&mut jar);
        assert!(manager.current_session(&jar).is_none());
    }

    #[test]
    fn login_rejects_incomplete_user() {
        let (manager, _) = manager();
        let mut jar = CookieJar::new();

        let result = manager.login(&mut jar, &SessionUser::new("1", "", "A"), false);
        assert!(matches!(result, Err(SessionError::InvalidUser(_))));
        assert!(jar.get("session").is_none());
    }

    #[test]
    fn remember_me_extends_cookie_expiry() {
        let (manager, _) = manager();

        let mut jar = CookieJar::new();
        manager.login(&mut jar, &user(), true).unwrap();
        let expires = jar.get("session").unwrap().expires_datetime().unwrap();
        assert_eq!(expires.unix_timestamp(), EPOCH + 86_400);

        let mut jar = CookieJar::new();
        manager.login(&mut jar, &user(), false).unwrap();
        let cookie = jar.get("session").unwrap();
        assert_eq!(cookie.expires_datetime().unwrap().unix_timestamp(), EPOCH + 300);
        assert_eq!(cookie.http_only(), Some(true));
    }

    #[test]
    fn current_session_ignores_missing_and_garbage_cookies() {
        let (manager, _) = manager();
        assert!(manager.current_session(&CookieJar::new()).is_none());

        let mut jar = CookieJar::new();
        jar.set_cookie(axum_extra::extract::cookie::Cookie::new("session", "garbage"));
        assert!(manager.current_session(&jar).is_none());
    }

    #[test]
    fn refresh_without_token_is_noop() {
        let (manager, _) = manager();
        let mut outgoing = CookieJar::new();

        assert!(manager.refresh_session(None, &mut outgoing).unwrap().is_none());
        assert!(outgoing.get("session").is_none());
    }

    #[test]
    fn refresh_reissues_active_session() {
        let (manager, clock) = manager();
        let original = manager.encode(&user(), Duration::from_secs(86_400)).unwrap();

        clock.advance(Duration::from_secs(10));
        let mut outgoing = CookieJar::new();
        let refreshed = manager
            .refresh_session(Some(&original.token), &mut outgoing)
            .unwrap()
            .unwrap();

        assert!(refreshed.issued_at > original.claims.issued_at);
        assert_eq!(refreshed.user, original.claims.user);
        assert_eq!(
            refreshed.expires_at.as_second() - refreshed.issued_at.as_second(),
            300
        );
        assert_eq!(manager.current_session(&outgoing), Some(refreshed));
    }

    #[test]
    fn refresh_of_expired_session_clears_cookie() {
        let (manager, clock) = manager();
        let token = manager.encode(&user(), Duration::from_secs(1)).unwrap().token;

        clock.advance(Duration::from_secs(60));
        let mut outgoing = CookieJar::new();
        let result = manager.refresh_session(Some(&token), &mut outgoing);

        assert!(matches!(result, Err(SessionError::SessionExpired)));
        let cookie = outgoing.get("session").unwrap();
        assert_eq!(cookie.value(), "");
    }

    #[test]
    fn refresh_of_garbage_is_reported_as_expired() {
        let (manager, _) = manager();
        let mut outgoing = CookieJar::new();
        let result = manager.refresh_session(Some("not.a.token"), &mut outgoing);

        assert!(matches!(result, Err(SessionError::SessionExpired)));
        assert!(outgoing.get("session").is_some());
    }
}
