//! Header sanitization at the gateway boundary.
//!
//! # Responsibilities
//! - Drop headers the upstream client computes itself (outbound)
//! - Drop headers the serving layer computes itself (inbound responses)
//! - Leave every other header untouched, including cookies
//!
//! `content-encoding` is not in the response list. The upstream client
//! removes it together with the encoding whenever it decodes a body, so
//! a label that is still present after buffering describes bytes that
//! are still encoded and must reach the caller with them.

use axum::http::header::{self, HeaderMap, HeaderName};

/// Never forwarded to an upstream candidate.
pub const OUTBOUND_STRIPPED: [HeaderName; 3] = [
    header::HOST,
    header::CONNECTION,
    header::CONTENT_LENGTH,
];

/// Never copied from an upstream response.
pub const RESPONSE_STRIPPED: [HeaderName; 3] = [
    header::TRANSFER_ENCODING,
    header::CONTENT_LENGTH,
    header::CONNECTION,
];

/// Headers to send upstream.
pub fn outbound_headers(inbound: &HeaderMap) -> HeaderMap {
    filtered(inbound, &OUTBOUND_STRIPPED)
}

/// Headers to return to the caller.
pub fn response_headers(upstream: &HeaderMap) -> HeaderMap {
    filtered(upstream, &RESPONSE_STRIPPED)
}

fn filtered(headers: &HeaderMap, stripped: &[HeaderName]) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers.iter() {
        if !stripped.contains(name) {
            out.append(name.clone(), value.clone());
        }
    }
    out
}
