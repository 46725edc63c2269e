#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use anyhow::Context;
use axum::Router;
use quill_server::handler::routes;
use quill_server::middleware::RouterExt;
use quill_server::service::{ServiceConfig, ServiceState};

use crate::config::{Cli, ServerConfig};

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "quill_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "quill_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "quill_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = %error,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    cli.log();
    cli.validate()?;

    let state = create_service_state(&cli.service)?;
    let router = create_router(state, &cli.server);

    server::serve(router, cli.server).await?;

    Ok(())
}

/// Creates the service state from configuration.
///
/// Fails before any socket is bound when the session secret is unusable.
fn create_service_state(config: &ServiceConfig) -> anyhow::Result<ServiceState> {
    ServiceState::new(config).context("failed to create service state")
}

/// Creates the router with all middleware layers applied.
///
/// Error handling wraps observability, which wraps the routes.
fn create_router(state: ServiceState, server: &ServerConfig) -> Router {
    routes(state.clone())
        .with_state(state)
        .with_observability_layer()
        .with_error_handling_layer(server.request_timeout())
}
