//! Metrics collection and exposition.
//!
//! # Metrics
//! - `naas_rejections_total` (counter): reasons served, by language
//! - `naas_rate_limited_total` (counter): requests refused by the limiter
//! - `naas_reasons_loaded` (gauge): reasons available, by language
//!
//! Recording is a no-op until a recorder is installed, so tests and
//! deployments without the exporter pay nothing.

use std::net::{AddrParseError, SocketAddr};

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::config::ObservabilityConfig;

/// Start the exporter when `metrics_enabled` is set.
///
/// Returns the address it was started on, or `None` when disabled. An
/// unparsable `metrics_address` is an error rather than a silent skip.
pub fn init_from_config(
    config: &ObservabilityConfig,
) -> Result<Option<SocketAddr>, AddrParseError> {
    if !config.metrics_enabled {
        return Ok(None);
    }
    let addr = scrape_address(config)?;
    init_metrics(addr);
    Ok(Some(addr))
}

fn scrape_address(config: &ObservabilityConfig) -> Result<SocketAddr, AddrParseError> {
    config.metrics_address.parse()
}

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_rejection(lang: &'static str) {
    counter!("naas_rejections_total", "lang" => lang).increment(1);
}

pub fn record_rate_limited() {
    counter!("naas_rate_limited_total").increment(1);
}

pub fn record_reasons_loaded(lang: &'static str, count: usize) {
    gauge!("naas_reasons_loaded", "lang" => lang).set(count as f64);
}
