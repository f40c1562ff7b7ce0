//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Startup
//!     → port.rs (PORT override, or bounded probe from the default port)
//!     → listener.rs (bind host:port)
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - Probing is a bounded loop; exhaustion is a startup error
//! - An explicit port is trusted and never probed

pub mod listener;
pub mod port;

pub use listener::ListenerError;
pub use port::{PortError, PortResolver, PORT_ENV};
