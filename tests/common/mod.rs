//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::time::Duration;

use no_as_a_service::config::ServiceConfig;
use no_as_a_service::lifecycle::{bootstrap_with_port, Shutdown};

/// Config pointing at the bundled data, bound to localhost.
pub fn test_config() -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.listener.host = "127.0.0.1".into();
    config.reasons.dir = concat!(env!("CARGO_MANIFEST_DIR"), "/reasons").into();
    config.static_files.dir = concat!(env!("CARGO_MANIFEST_DIR"), "/public").into();
    config
}

/// A running service on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    handle: tokio::task::JoinHandle<Result<(), std::io::Error>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Trigger shutdown and wait for the server to drain.
    #[allow(dead_code)]
    pub async fn stop(self) {
        self.shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server did not stop in time")
            .expect("server task panicked")
            .expect("server returned an error");
    }
}

/// Boot the full service the way `main` does, minus signal handling.
pub async fn spawn_server(config: ServiceConfig) -> TestServer {
    let service = bootstrap_with_port(config, Some("0"))
        .await
        .expect("service failed to start");
    let addr = service.listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let handle = tokio::spawn(service.server.run(service.listener, shutdown.subscribe()));

    TestServer {
        addr,
        shutdown,
        handle,
    }
}

/// Client without connection pooling or proxies.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
