//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → client_ip.rs (trusted header or peer address)
//!     → rate_limit.rs (per-client fixed window)
//!     → Pass to routing
//! ```
//!
//! # Design Decisions
//! - Limits apply before any handler, static files included
//! - Counters are process-local and vanish on restart

pub mod client_ip;
pub mod rate_limit;

pub use rate_limit::{rate_limit_middleware, Decision, RateLimiter};
