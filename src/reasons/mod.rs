//! Reason data subsystem.
//!
//! # Data Flow
//! ```text
//! reasons/<code>.json (one flat JSON array per language)
//!     → store.rs (load every directory language, reject empty/malformed)
//!     → ReasonStore (immutable, shared via Arc)
//!     → http handlers pick one reason per request
//! ```
//!
//! # Design Decisions
//! - The language directory is compiled in; data files are read once at boot
//! - Loading is all-or-nothing: any bad file aborts startup
//! - Unsupported selectors fall back to the default language silently

pub mod languages;
pub mod store;

pub use languages::{Language, LANGUAGES};
pub use store::{ReasonStore, Rejection, StoreError};
