//! No-as-a-Service
//!
//! Returns a random, humorous rejection reason over HTTP.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ listener ──▶ request id / trace ──▶ rate limit ──┬──▶ GET /no
//!                                                                      ├──▶ GET /languages
//!                                                                      ├──▶ GET /health
//!                                                                      └──▶ static files
//!
//!     Boot: config ──▶ reason store ──▶ port resolver ──▶ listener ──▶ serve
//! ```

use std::path::PathBuf;

use clap::Parser;

use no_as_a_service::config;
use no_as_a_service::lifecycle::{self, Shutdown};
use no_as_a_service::observability;

#[derive(Parser)]
#[command(name = "no-as-a-service")]
#[command(about = "Serve random rejection reasons over HTTP", long_about = None)]
struct Cli {
    /// Path to a TOML config file; built-in defaults are used when omitted.
    #[arg(short, long, env = "NAAS_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logging is not up yet, so config errors go straight to stderr.
    let config = config::load_or_default(cli.config.as_deref())?;
    observability::logging::init(&config.observability);

    tracing::info!("no-as-a-service v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        reasons_dir = %config.reasons.dir,
        default_language = %config.reasons.default_language,
        rate_limit_enabled = config.rate_limit.enabled,
        max_requests = config.rate_limit.max_requests,
        window_ms = config.rate_limit.window_ms,
        "Configuration loaded"
    );

    observability::metrics::init_from_config(&config.observability)?;

    let service = match lifecycle::bootstrap(config).await {
        Ok(service) => service,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return Err(e.into());
        }
    };

    let port = service.listener.local_addr()?.port();
    tracing::info!("No-as-a-Service is running on port {}", port);

    let shutdown = Shutdown::new();
    let mut server = tokio::spawn(service.server.run(service.listener, shutdown.subscribe()));

    tokio::select! {
        result = &mut server => result??,
        _ = shutdown.trigger_on_signal() => server.await??,
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
