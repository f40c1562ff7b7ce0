//! Client identity extraction for per-client limits.

use std::net::{IpAddr, SocketAddr};

use axum::http::{HeaderMap, HeaderName};

/// Identity used when neither a trusted header nor a peer address is available.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Derive the client identity for a request.
///
/// Headers are tried in order; the first one holding a parseable IP wins. For
/// list-valued headers such as `x-forwarded-for` the left-most entry is the
/// originating client. Falls back to the connection peer.
pub fn client_identity(
    headers: &HeaderMap,
    trusted: &[HeaderName],
    peer: Option<SocketAddr>,
) -> String {
    trusted
        .iter()
        .filter_map(|name| headers.get(name))
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(',').next())
        .find_map(|candidate| candidate.trim().parse::<IpAddr>().ok())
        .or_else(|| peer.map(|addr| addr.ip()))
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}
