//! Fixed-window rate limiting keyed by client IP.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{rejection::ExtensionRejection, ConnectInfo, State},
    http::{header, HeaderName, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::config::RateLimitConfig;
use crate::observability::metrics;
use crate::security::client_ip::client_identity;

/// Counter for one client within its current window.
#[derive(Debug, Clone, Copy)]
struct WindowEntry {
    count: u32,
    window_start: Instant,
}

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Request admitted; `remaining` more fit in the current window.
    Allowed { remaining: u32 },
    /// Request rejected until the window resets.
    Limited { retry_after: Duration },
}

/// Body of the 429 response.
#[derive(Debug, Serialize)]
pub struct RateLimitError {
    pub error: String,
}

/// Per-client fixed-window limiter.
///
/// Counters live in a sharded map; the entry lock makes each
/// read-reset-increment atomic per client.
pub struct RateLimiter {
    entries: DashMap<String, WindowEntry>,
    max_requests: u32,
    window: Duration,
    trusted_headers: Vec<HeaderName>,
    message: String,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        let trusted_headers = config
            .client_ip_headers
            .iter()
            .filter_map(|name| HeaderName::from_bytes(name.as_bytes()).ok())
            .collect();
        Self::with_limits(
            config.max_requests,
            Duration::from_millis(config.window_ms),
            trusted_headers,
        )
    }

    pub fn with_limits(max_requests: u32, window: Duration, trusted_headers: Vec<HeaderName>) -> Self {
        Self {
            entries: DashMap::new(),
            max_requests,
            window,
            trusted_headers,
            message: format!(
                "Too many requests, please try again later. ({} reqs/{}/IP)",
                max_requests,
                describe_window(window)
            ),
        }
    }

    /// Count a request from `client` now.
    pub fn check(&self, client: &str) -> Decision {
        self.check_at(client, Instant::now())
    }

    /// Count a request from `client` at `now`.
    pub fn check_at(&self, client: &str, now: Instant) -> Decision {
        let mut entry = self
            .entries
            .entry(client.to_string())
            .or_insert(WindowEntry {
                count: 0,
                window_start: now,
            });

        let mut elapsed = now.saturating_duration_since(entry.window_start);
        if elapsed >= self.window {
            entry.count = 0;
            entry.window_start = now;
            elapsed = Duration::ZERO;
        }

        entry.count = entry.count.saturating_add(1);
        if entry.count <= self.max_requests {
            Decision::Allowed {
                remaining: self.max_requests - entry.count,
            }
        } else {
            Decision::Limited {
                retry_after: self.window.saturating_sub(elapsed),
            }
        }
    }

    /// Drop clients whose window has elapsed. Returns how many were removed.
    pub fn purge_expired(&self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.window_start) < self.window);
        before.saturating_sub(self.entries.len())
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.entries.len()
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn trusted_headers(&self) -> &[HeaderName] {
        &self.trusted_headers
    }

    /// Periodically purge expired entries until shutdown.
    pub fn spawn_sweeper(self: &Arc<Self>, mut shutdown: broadcast::Receiver<()>) -> JoinHandle<()> {
        let limiter = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(limiter.window);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let removed = limiter.purge_expired(Instant::now());
                        if removed > 0 {
                            tracing::debug!(
                                removed,
                                tracked = limiter.tracked_clients(),
                                "Purged expired rate-limit windows"
                            );
                        }
                    }
                    _ = shutdown.recv() => break,
                }
            }
        })
    }
}

/// "min" for 60s, "s" for 1s, otherwise an explicit duration.
fn describe_window(window: Duration) -> String {
    match window.as_millis() {
        60_000 => "min".to_string(),
        1_000 => "s".to_string(),
        ms if ms % 1_000 == 0 => format!("{}s", ms / 1_000),
        ms => format!("{}ms", ms),
    }
}

/// Middleware applying the limiter to every request.
///
/// The peer address is optional: routers driven without
/// `into_make_service_with_connect_info` still work, keyed on headers alone.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    connect_info: Result<ConnectInfo<SocketAddr>, ExtensionRejection>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let peer = connect_info.ok().map(|ConnectInfo(addr)| addr);
    let client = client_identity(request.headers(), limiter.trusted_headers(), peer);

    match limiter.check(&client) {
        Decision::Allowed { .. } => next.run(request).await,
        Decision::Limited { retry_after } => {
            tracing::warn!(client = %client, "Rate limit exceeded");
            metrics::record_rate_limited();
            let retry_after_secs = retry_after.as_secs_f64().ceil().max(1.0) as u64;
            (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, retry_after_secs.to_string())],
                Json(RateLimitError {
                    error: limiter.message().to_string(),
                }),
            )
                .into_response()
        }
    }
}
