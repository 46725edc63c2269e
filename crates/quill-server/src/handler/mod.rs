//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! ```rust
//! use quill_server::handler::routes;
//! use quill_server::service::{ServiceConfig, ServiceState};
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = ServiceConfig::builder()
//!     .with_session_secret("change-me")
//!     .build()?;
//! let state = ServiceState::new(&config)?;
//! let router: axum::Router = routes(state.clone()).with_state(state);
//! # Ok(())
//! # }
//! ```
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod authentication;
mod error;
mod posts;
pub mod request;
pub mod response;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
pub use crate::handler::response::ErrorResponse;
use crate::middleware::{refresh_session_middleware, require_session};
use crate::service::ServiceState;

#[inline]
async fn handler() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns a [`Router`] with all routes that need a session.
fn private_routes() -> Router<ServiceState> {
    Router::new().merge(posts::private_routes())
}

/// Returns a [`Router`] with all public routes.
fn public_routes() -> Router<ServiceState> {
    Router::new()
        .merge(authentication::routes())
        .merge(posts::public_routes())
}

/// Returns a [`Router`] with all routes.
///
/// Session-required routes are wrapped so that the session refresh runs
/// before the session check.
pub fn routes(state: ServiceState) -> Router<ServiceState> {
    let require_session = from_fn_with_state(state.clone(), require_session);
    let refresh_session = from_fn_with_state(state, refresh_session_middleware);

    // Later route layers wrap earlier ones.
    let private_router = private_routes()
        .route_layer(require_session)
        .route_layer(refresh_session);

    Router::new()
        .merge(private_router)
        .merge(public_routes())
        .fallback(handler)
}
