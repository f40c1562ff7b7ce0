//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, trace span)
//!     → security::rate_limit (per-client window)
//!     → handlers.rs (/no, /languages, /health) or static files
//!     → response.rs (JSON bodies)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use response::{HealthResponse, LanguagesResponse, RejectionResponse};
pub use server::{AppState, HttpServer};
