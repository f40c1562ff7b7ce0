//! Startup orchestration.
//!
//! # Responsibilities
//! - Load reason data
//! - Resolve the port and bind the listener
//! - Build the HTTP server
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Reason data loads before any socket is bound (no traffic with a
//!   partial store)

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{ConfigError, ServiceConfig};
use crate::http::HttpServer;
use crate::net::{listener, ListenerError, PortError, PortResolver, PORT_ENV};
use crate::reasons::{ReasonStore, StoreError};

/// Any error that stops the service from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("reason data error: {0}")]
    Store(#[from] StoreError),
    #[error("port resolution error: {0}")]
    Port(#[from] PortError),
    #[error("listener error: {0}")]
    Listener(#[from] ListenerError),
}

/// A server ready to run on its bound listener.
pub struct Service {
    pub server: HttpServer,
    pub listener: TcpListener,
}

/// Start up with the port override taken from the environment.
pub async fn bootstrap(config: ServiceConfig) -> Result<Service, StartupError> {
    let explicit = std::env::var(PORT_ENV).ok();
    bootstrap_with_port(config, explicit.as_deref()).await
}

/// Start up with an explicit port override (`Some("0")` binds an ephemeral port).
pub async fn bootstrap_with_port(
    config: ServiceConfig,
    explicit_port: Option<&str>,
) -> Result<Service, StartupError> {
    let store = ReasonStore::load(
        Path::new(&config.reasons.dir),
        &config.reasons.default_language,
    )?;
    tracing::info!(
        languages = store.languages().count(),
        default_language = store.default_language().code,
        "Reason store loaded"
    );

    let resolver = PortResolver::from_config(&config.listener)?;
    let port = resolver.resolve(explicit_port).await?;
    let listener = listener::bind(resolver.host(), port).await?;

    let server = HttpServer::new(config, Arc::new(store));
    Ok(Service { server, listener })
}
