//! Session payload types.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Identity carried by a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SessionUser {
    /// Opaque account identifier.
    #[validate(length(min = 1))]
    pub id: String,
    /// Account email address.
    #[validate(length(min = 1))]
    pub email: String,
    /// Account display name.
    #[validate(length(min = 1))]
    pub name: String,
}

impl SessionUser {
    /// Creates a new session identity.
    pub fn new(
        id: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
        }
    }
}

/// Claims signed into a session token.
///
/// Serialized as `{"id","email","name","iat","exp"}` with timestamps in whole
/// seconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// The identity this session belongs to.
    #[serde(flatten)]
    pub user: SessionUser,
    /// Issued at.
    #[serde(rename = "iat", with = "jiff::fmt::serde::timestamp::second::required")]
    pub issued_at: Timestamp,
    /// Expiration time.
    #[serde(rename = "exp", with = "jiff::fmt::serde::timestamp::second::required")]
    pub expires_at: Timestamp,
}

/// A signed token together with the claims it carries.
#[derive(Clone)]
pub struct SessionToken {
    /// Compact HS256 JWS.
    pub token: String,
    /// Claims encoded in `token`.
    pub claims: SessionClaims,
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("claims", &self.claims)
            .finish_non_exhaustive()
    }
}

/// Plain confirmation message returned by login and logout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Acknowledgement {
    pub message: &'static str,
}

impl Acknowledgement {
    pub const LOGIN: Self = Self {
        message: "Login Successful",
    };
    pub const LOGOUT: Self = Self {
        message: "Logout Successful",
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_wire_format() -> anyhow::Result<()> {
        let claims = SessionClaims {
            user: SessionUser::new("1", "a@b.com", "A"),
            issued_at: Timestamp::from_second(1_700_000_000)?,
            expires_at: Timestamp::from_second(1_700_000_300)?,
        };

        let json = serde_json::to_value(&claims)?;
        assert_eq!(
            json,
            serde_json::json!({
                "id": "1",
                "email": "a@b.com",
                "name": "A",
                "iat": 1_700_000_000,
                "exp": 1_700_000_300,
            })
        );

        let parsed: SessionClaims = serde_json::from_value(json)?;
        assert_eq!(parsed, claims);
        Ok(())
    }

    #[test]
    fn empty_fields_fail_validation() {
        assert!(SessionUser::new("1", "a@b.com", "A").validate().is_ok());
        assert!(SessionUser::new("", "a@b.com", "A").validate().is_err());
        assert!(SessionUser::new("1", "", "A").validate().is_err());
        assert!(SessionUser::new("1", "a@b.com", "").validate().is_err());
    }
}
