//! Cookie storage seam between the session manager and the HTTP layer.

use axum_extra::extract::cookie::{Cookie, CookieJar};
use jiff::Timestamp;
use time::OffsetDateTime;

use super::SessionError;

/// Read and write access to request/response cookies.
pub trait CookieStore {
    /// Returns the value of the named cookie. Empty values count as absent.
    fn get_cookie(&self, name: &str) -> Option<&str>;

    /// Adds or overwrites a cookie.
    fn set_cookie(&mut self, cookie: Cookie<'static>);

    /// Emits a removal cookie for `name`, whether or not it was set.
    fn remove_cookie(&mut self, name: &str) {
        self.set_cookie(removal_cookie(name));
    }
}

impl CookieStore for CookieJar {
    fn get_cookie(&self, name: &str) -> Option<&str> {
        self.get(name)
            .map(|cookie| cookie.value())
            .filter(|value| !value.is_empty())
    }

    fn set_cookie(&mut self, cookie: Cookie<'static>) {
        let jar = std::mem::replace(self, CookieJar::new());
        *self = jar.add(cookie);
    }
}

/// Builds the `HttpOnly` session cookie expiring at `expires_at`.
pub(crate) fn session_cookie(
    name: &str,
    token: String,
    expires_at: Timestamp,
) -> Result<Cookie<'static>, SessionError> {
    let expires = OffsetDateTime::from_unix_timestamp(expires_at.as_second())
        .map_err(|_| SessionError::InvalidTtl)?;

    Ok(Cookie::build((name.to_owned(), token))
        .http_only(true)
        .path("/")
        .expires(expires)
        .build())
}

/// Builds a cookie that makes the browser drop `name`.
pub(crate) fn removal_cookie(name: &str) -> Cookie<'static> {
    let mut cookie = Cookie::build((name.to_owned(), ""))
        .http_only(true)
        .path("/")
        .build();
    cookie.make_removal();
    cookie
}
