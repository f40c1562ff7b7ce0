//! Startup port selection.
//!
//! # Responsibilities
//! - Honour an explicit `PORT` override without checking availability
//! - Otherwise probe upward from the default port for a free one
//! - Bound the probe so a crowded host fails with a clear error

use std::io::ErrorKind;
use std::net::{IpAddr, SocketAddr};

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ListenerConfig;

/// Environment variable carrying an explicit port.
pub const PORT_ENV: &str = "PORT";

/// Error type for port resolution.
#[derive(Debug, Error)]
pub enum PortError {
    #[error("invalid PORT value `{0}`")]
    InvalidPort(String),
    #[error("invalid listener host `{0}`")]
    InvalidHost(String),
    #[error("no free port in {start}..={end} after {attempts} attempts")]
    Exhausted { start: u16, end: u16, attempts: u16 },
    #[error("failed to probe port {port}: {source}")]
    Probe { port: u16, source: std::io::Error },
}

/// Picks the port the service binds.
#[derive(Debug, Clone)]
pub struct PortResolver {
    host: IpAddr,
    start: u16,
    max_attempts: u16,
}

impl PortResolver {
    pub fn new(host: IpAddr, start: u16, max_attempts: u16) -> Self {
        Self {
            host,
            start,
            max_attempts,
        }
    }

    pub fn from_config(config: &ListenerConfig) -> Result<Self, PortError> {
        let host = config
            .host
            .parse()
            .map_err(|_| PortError::InvalidHost(config.host.clone()))?;
        Ok(Self::new(host, config.default_port, config.max_port_probes))
    }

    pub fn host(&self) -> IpAddr {
        self.host
    }

    /// Use `explicit` when given, otherwise probe.
    pub async fn resolve(&self, explicit: Option<&str>) -> Result<u16, PortError> {
        match explicit.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) => {
                let port = value
                    .parse()
                    .map_err(|_| PortError::InvalidPort(value.to_string()))?;
                tracing::debug!(port, "Using port from {}", PORT_ENV);
                Ok(port)
            }
            None => self.probe().await,
        }
    }

    /// Return the first port from `start` that can be bound.
    ///
    /// Only `AddrInUse` moves the probe forward; any other bind error is
    /// returned immediately.
    pub async fn probe(&self) -> Result<u16, PortError> {
        let mut port = self.start;
        let mut attempts = 0;

        while attempts < self.max_attempts {
            attempts += 1;
            match TcpListener::bind(SocketAddr::new(self.host, port)).await {
                Ok(listener) => {
                    drop(listener);
                    if attempts > 1 {
                        tracing::info!(port, attempts, "Found free port");
                    }
                    return Ok(port);
                }
                Err(e) if e.kind() == ErrorKind::AddrInUse => {
                    tracing::debug!(port, "Port in use, trying next");
                }
                Err(source) => return Err(PortError::Probe { port, source }),
            }
            match port.checked_add(1) {
                Some(next) => port = next,
                None => break,
            }
        }

        Err(PortError::Exhausted {
            start: self.start,
            end: self.start.saturating_add(attempts.saturating_sub(1)),
            attempts,
        })
    }
}
