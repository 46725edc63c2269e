//! Authentication request types.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request payload for login.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Login {
    /// Email address of the account.
    #[validate(email)]
    #[validate(length(min = 3, max = 254))]
    pub email: String,

    /// Password of the account.
    #[validate(length(min = 1, max = 128))]
    pub password: String,

    /// Whether to issue an extended session.
    #[serde(default)]
    pub remember: bool,
}

/// Request payload for registering a new account.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Register {
    /// Email address of the account.
    #[validate(email)]
    #[validate(length(min = 3, max = 254))]
    pub email: String,

    /// Display name shown next to posts.
    #[validate(length(min = 1, max = 64))]
    pub name: String,

    /// Plaintext password, hashed before storage.
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_rejects_short_password() {
        let request = Register {
            email: "ada@example.com".to_owned(),
            name: "Ada".to_owned(),
            password: "short".to_owned(),
        };

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn login_remember_defaults_to_false() -> anyhow::Result<()> {
        let login: Login = serde_json::from_str(
            r#"{"email":"ada@example.com","password":"correct horse"}"#,
        )?;
        assert!(!login.remember);
        Ok(())
    }
}
