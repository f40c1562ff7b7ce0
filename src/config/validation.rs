//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (window > 0, probe bound > 0)
//! - Check the default language exists in the language directory
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::{IpAddr, SocketAddr};

use axum::http::HeaderName;
use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::reasons::languages;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.host `{0}` is not an IP address")]
    InvalidHost(String),
    #[error("listener.max_port_probes must be greater than zero")]
    ZeroPortProbes,
    #[error("reasons.default_language `{0}` is not a supported language")]
    UnknownDefaultLanguage(String),
    #[error("rate_limit.max_requests must be greater than zero")]
    ZeroMaxRequests,
    #[error("rate_limit.window_ms must be greater than zero")]
    ZeroWindow,
    #[error("rate_limit.client_ip_headers entry `{0}` is not a valid header name")]
    InvalidClientIpHeader(String),
    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,
    #[error("observability.metrics_address `{0}` is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.host.parse::<IpAddr>().is_err() {
        errors.push(ValidationError::InvalidHost(config.listener.host.clone()));
    }
    if config.listener.max_port_probes == 0 {
        errors.push(ValidationError::ZeroPortProbes);
    }
    if !languages::is_supported(&config.reasons.default_language) {
        errors.push(ValidationError::UnknownDefaultLanguage(
            config.reasons.default_language.clone(),
        ));
    }
    if config.rate_limit.enabled {
        if config.rate_limit.max_requests == 0 {
            errors.push(ValidationError::ZeroMaxRequests);
        }
        if config.rate_limit.window_ms == 0 {
            errors.push(ValidationError::ZeroWindow);
        }
        for name in &config.rate_limit.client_ip_headers {
            if HeaderName::from_bytes(name.as_bytes()).is_err() {
                errors.push(ValidationError::InvalidClientIpHeader(name.clone()));
            }
        }
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
