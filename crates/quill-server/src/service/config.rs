use std::borrow::Cow;
use std::time::Duration;

#[cfg(any(test, feature = "config"))]
use clap::Args;
use derive_builder::Builder;

use crate::service::{SessionKeys, SessionPolicy};
use crate::{Error, Result};

/// Default values for configuration options.
mod defaults {
    /// Default lifetime of a regular session in seconds.
    pub const SESSION_TIMEOUT_SECS: u64 = 300;

    /// Default lifetime of a "remember me" session in seconds.
    pub const REMEMBER_TIMEOUT_SECS: u64 = 86_400;

    /// Default tolerance past expiry in seconds.
    pub const CLOCK_SKEW_SECS: u64 = 5;

    /// Upper bound on the clock-skew tolerance in seconds.
    pub const MAX_CLOCK_SKEW_SECS: u64 = 60;
}

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Clone, Builder)]
#[cfg_attr(any(test, feature = "config"), derive(Args))]
#[must_use = "config does nothing unless you use it"]
#[builder(
    pattern = "owned",
    setter(into, prefix = "with"),
    build_fn(validate = "Self::validate")
)]
pub struct ServiceConfig {
    /// Secret used to sign session tokens.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "SECRET", hide_env_values = true)
    )]
    pub session_secret: String,

    /// Lifetime of a regular session in seconds.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "SESSION_TIMEOUT_SECS", default_value_t = defaults::SESSION_TIMEOUT_SECS)
    )]
    #[builder(default = "defaults::SESSION_TIMEOUT_SECS")]
    pub session_timeout_secs: u64,

    /// Lifetime of a "remember me" session in seconds.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "REMEMBER_TIMEOUT_SECS", default_value_t = defaults::REMEMBER_TIMEOUT_SECS)
    )]
    #[builder(default = "defaults::REMEMBER_TIMEOUT_SECS")]
    pub remember_timeout_secs: u64,

    /// How long past expiry a session token is still accepted, in seconds.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "CLOCK_SKEW_SECS", default_value_t = defaults::CLOCK_SKEW_SECS)
    )]
    #[builder(default = "defaults::CLOCK_SKEW_SECS")]
    pub clock_skew_secs: u64,
}

impl ServiceConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }

    /// Checks the configuration, e.g. after parsing it from the command line.
    ///
    /// # Errors
    ///
    /// Returns a configuration error describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        validate_values(
            &self.session_secret,
            self.session_timeout_secs,
            self.remember_timeout_secs,
            self.clock_skew_secs,
        )
        .map_err(Error::config)
    }

    /// Returns the session lifetimes as a [`SessionPolicy`].
    pub fn session_policy(&self) -> SessionPolicy {
        SessionPolicy {
            default_ttl: Duration::from_secs(self.session_timeout_secs),
            extended_ttl: Duration::from_secs(self.remember_timeout_secs),
            clock_skew: Duration::from_secs(self.clock_skew_secs),
            cookie_name: Cow::Borrowed(SessionPolicy::COOKIE_NAME),
        }
    }

    /// Derives and self-tests the session signing keys.
    pub fn load_session_keys(&self) -> Result<SessionKeys> {
        let keys = SessionKeys::from_secret(&self.session_secret)?;
        keys.validate_keys()?;
        Ok(keys)
    }
}

impl ServiceConfigBuilder {
    /// Wrapper for builder validation that returns String errors.
    fn validate(builder: &ServiceConfigBuilder) -> Result<(), String> {
        let Some(secret) = &builder.session_secret else {
            // Reported by the generated build function.
            return Ok(());
        };

        validate_values(
            secret,
            builder
                .session_timeout_secs
                .unwrap_or(defaults::SESSION_TIMEOUT_SECS),
            builder
                .remember_timeout_secs
                .unwrap_or(defaults::REMEMBER_TIMEOUT_SECS),
            builder.clock_skew_secs.unwrap_or(defaults::CLOCK_SKEW_SECS),
        )
    }
}

fn validate_values(
    secret: &str,
    session_timeout_secs: u64,
    remember_timeout_secs: u64,
    clock_skew_secs: u64,
) -> Result<(), String> {
    if secret.is_empty() {
        return Err("Session secret cannot be empty".to_string());
    }

    if session_timeout_secs == 0 {
        return Err("Session timeout must be greater than 0".to_string());
    }

    if remember_timeout_secs == 0 {
        return Err("Remember-me timeout must be greater than 0".to_string());
    }

    if remember_timeout_secs < session_timeout_secs {
        return Err("Remember-me timeout cannot be shorter than the session timeout".to_string());
    }

    if clock_skew_secs > defaults::MAX_CLOCK_SKEW_SECS {
        return Err(format!(
            "Clock skew cannot exceed {} seconds",
            defaults::MAX_CLOCK_SKEW_SECS
        ));
    }

    Ok(())
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("session_timeout_secs", &self.session_timeout_secs)
            .field("remember_timeout_secs", &self.remember_timeout_secs)
            .field("clock_skew_secs", &self.clock_skew_secs)
            .finish_non_exhaustive()
    }
}
