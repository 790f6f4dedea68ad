//! Span constructors for voting-power operations.
//!
//! Consistent span names and fields make fetches easy to follow across
//! concurrent tasks in any tracing backend.

use tracing::{info_span, Span};

use vp_types::CacheKey;

/// Span covering one `fetch` call, cache hit or not.
pub fn fetch_span(key: &CacheKey, account: &str) -> Span {
    info_span!("vp_fetch", key = %key, account = %account)
}

/// Span covering the gateway fan-out of a leading fetch.
pub fn gateway_span(network: &str, propose_call: bool) -> Span {
    info_span!("vp_gateway_call", network = %network, propose_call)
}

/// Span covering a full cache reset.
pub fn reset_span(reason: &str) -> Span {
    info_span!("vp_reset", reason = %reason)
}
