//! Cookie-carried session tokens.
//!
//! [`SessionManager`] issues HS256-signed tokens, verifies them against an
//! injected [`Clock`] with a clock-skew tolerance, and reads and writes the
//! session cookie through a [`CookieStore`].

mod claims;
mod clock;
mod cookies;
mod error;
mod manager;

pub use claims::{Acknowledgement, SessionClaims, SessionToken, SessionUser};
pub use clock::{Clock, ManualClock, SystemClock};
pub use cookies::CookieStore;
pub use error::SessionError;
pub use manager::{SessionManager, SessionPolicy};
