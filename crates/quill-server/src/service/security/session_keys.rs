//! Signing keys for session tokens.
//!
//! Sessions are signed with HS256, so one shared secret yields both the
//! encoding and the decoding key.

use std::fmt;
use std::sync::Arc;

use jiff::Timestamp;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::utility::tracing_targets::TRACING_TARGET_SESSION_KEYS as TRACING_TARGET;
use crate::{Error, Result};

/// HMAC keys used to sign and verify session tokens.
///
/// Cloning is cheap. The secret never appears in `Debug` output.
#[derive(Clone)]
pub struct SessionKeys {
    inner: Arc<SessionKeysInner>,
}

struct SessionKeysInner {
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
}

impl SessionKeys {
    /// Derives the keys from a shared secret.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the secret is empty.
    pub fn from_secret(secret: &str) -> Result<Self> {
        if secret.is_empty() {
            tracing::error!(target: TRACING_TARGET, "session secret is empty");
            return Err(Error::config("session secret must not be empty"));
        }

        let inner = SessionKeysInner {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
        };

        tracing::debug!(
            target: TRACING_TARGET,
            secret_len = secret.len(),
            "session keys derived",
        );

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Returns a reference to the decoding key.
    #[inline]
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.inner.decoding_key
    }

    /// Returns a reference to the encoding key.
    #[inline]
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.inner.encoding_key
    }

    /// Signs and verifies a throwaway token to prove the keys are usable.
    pub fn validate_keys(&self) -> Result<()> {
        #[derive(Debug, Clone, Serialize, Deserialize)]
        struct ProbeClaims {
            sub: String,
            exp: i64,
        }

        let claims = ProbeClaims {
            sub: "probe".to_owned(),
            exp: Timestamp::now().as_second() + 300,
        };

        let header = Header::new(Algorithm::HS256);
        let token = jsonwebtoken::encode(&header, &claims, self.encoding_key()).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                error = %e,
                "key validation failed during encoding",
            );
            Error::auth("key validation encoding failed").with_source(e)
        })?;

        let validation = Validation::new(Algorithm::HS256);
        jsonwebtoken::decode::<ProbeClaims>(&token, self.decoding_key(), &validation).map_err(
            |e| {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "key validation failed during decoding",
                );
                Error::auth("key validation decoding failed").with_source(e)
            },
        )?;

        tracing::debug!(target: TRACING_TARGET, "key validation successful");
        Ok(())
    }
}

impl fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeys").finish_non_exhaustive()
    }
}
