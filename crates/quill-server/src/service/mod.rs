//! Application state and dependency injection.

mod config;
mod security;
mod session;

use quill_store::MemoryStore;

pub use crate::service::config::{ServiceConfig, ServiceConfigBuilder};
pub use crate::service::security::{PasswordHasher, SessionKeys};
pub use crate::service::session::{
    Acknowledgement, Clock, CookieStore, ManualClock, SessionClaims, SessionError,
    SessionManager, SessionPolicy, SessionToken, SessionUser, SystemClock,
};
// Re-export error types from crate root for convenience
pub use crate::{Error, Result};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    // Persistence:
    pub store: MemoryStore,

    // Internal services:
    pub password_hasher: PasswordHasher,
    pub session_manager: SessionManager,
}

impl ServiceState {
    /// Initializes application state from configuration using wall-clock time.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the configuration is invalid or the
    /// session keys cannot be derived.
    pub fn new(service_config: &ServiceConfig) -> Result<Self> {
        Self::with_clock(service_config, SystemClock)
    }

    /// Initializes application state with a custom session clock.
    pub fn with_clock(service_config: &ServiceConfig, clock: impl Clock) -> Result<Self> {
        service_config.validate()?;

        let session_manager = SessionManager::new(
            service_config.load_session_keys()?,
            service_config.session_policy(),
            clock,
        );

        Ok(Self {
            store: MemoryStore::new(),
            password_hasher: PasswordHasher::new(),
            session_manager,
        })
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

// Persistence:
impl_di!(store: MemoryStore);

// Internal services:
impl_di!(password_hasher: PasswordHasher);
impl_di!(session_manager: SessionManager);
