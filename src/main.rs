//! This project is split in 2 main modules:
//!
//! - [gateway] (payment API capture client)
//! - [connect] (HTTP surface exposing the capture)
#![doc = include_str!("../README.md")]

use std::net::{Ipv4Addr, SocketAddrV4};

use anyhow::Context;
use axum::Router;
use tracing_subscriber::EnvFilter;

mod config;
/// HTTP surface of the service
///
/// Plain text and json endpoints that trigger a capture and report its outcome.
mod connect;
/// Payment API integration
///
/// This module defines the types and methods to send capture modification requests to the
/// payment API.
mod gateway;
mod state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_ansi(false)
        .init();

    match dotenvy::dotenv() {
        Ok(p) => tracing::info!(path = %p.display(), "Loaded environment variables from .env file"),
        Err(e) => tracing::warn!("Failed to load environment variables from .env: {e}"),
    };
    let config = config::Config::from_env()?;
    tracing::debug!(endpoint = %config.gateway.endpoint, "Using payment API endpoint");
    let gate = gateway::CaptureGateway::new(config.gateway).context("build http client")?;
    let state = state::AppState::new(gate, config.demo_request);

    let app = Router::new()
        .merge(connect::api::router())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state);

    let listener =
        tokio::net::TcpListener::bind(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, config.port))
            .await
            .with_context(|| format!("bind port {}", config.port))?;

    tracing::info!("Serving on port {}", config.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
