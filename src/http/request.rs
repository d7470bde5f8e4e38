//! Inbound request capture.
//!
//! # Responsibilities
//! - Read the inbound body exactly once
//! - Parse it as JSON when `content-type` says so, keep raw bytes otherwise
//! - Strip the mount prefix and keep the query string unchanged
//! - Sanitize headers for forwarding

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, Request, Uri};
use thiserror::Error;

use crate::security::headers::outbound_headers;
use crate::upstream::message::normalize_path;
use crate::upstream::{ForwardBody, ForwardedRequest};

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to read request body: {0}")]
    Body(#[from] axum::Error),
}

/// Turn an inbound request into a replayable `ForwardedRequest`.
pub async fn capture(
    request: Request<Body>,
    max_body_size: usize,
    strip_prefix: Option<&str>,
) -> Result<ForwardedRequest, CaptureError> {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, max_body_size).await?;

    Ok(ForwardedRequest {
        path_and_query: forward_path(&parts.uri, strip_prefix),
        body: decode_body(&parts.headers, bytes),
        headers: outbound_headers(&parts.headers),
        method: parts.method,
    })
}

/// Path and query to append to a candidate's base URL.
pub fn forward_path(uri: &Uri, strip_prefix: Option<&str>) -> String {
    let mut path = uri.path();
    if let Some(prefix) = strip_prefix.map(|p| p.trim_end_matches('/')) {
        if let Some(rest) = path.strip_prefix(prefix) {
            if rest.is_empty() || rest.starts_with('/') {
                path = rest;
            }
        }
    }

    let mut out = normalize_path(path.to_string());
    if let Some(query) = uri.query() {
        out.push('?');
        out.push_str(query);
    }
    out
}

fn decode_body(headers: &HeaderMap, bytes: Bytes) -> ForwardBody {
    if bytes.is_empty() {
        return ForwardBody::Empty;
    }

    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.contains("application/json"))
        .unwrap_or(false);
    if !is_json {
        return ForwardBody::Raw(bytes);
    }

    match serde_json::from_slice(&bytes).map(ForwardBody::json) {
        Ok(Ok(body)) => body,
        Ok(Err(e)) | Err(e) => {
            tracing::debug!(error = %e, "JSON body did not parse, forwarding raw bytes");
            ForwardBody::Raw(bytes)
        }
    }
}
