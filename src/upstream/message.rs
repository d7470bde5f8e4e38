//! Request and response values exchanged with upstream candidates.

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use serde_json::Value;

/// Body captured once from the inbound request and replayed on every attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ForwardBody {
    Empty,
    /// Parsed JSON with its encoding, serialized once at capture time.
    Json { value: Value, encoded: Bytes },
    /// Opaque bytes, replayed verbatim.
    Raw(Bytes),
}

impl ForwardBody {
    pub fn json(value: Value) -> Result<Self, serde_json::Error> {
        let encoded = Bytes::from(serde_json::to_vec(&value)?);
        Ok(ForwardBody::Json { value, encoded })
    }

    /// Bytes to send upstream, `None` for no body.
    pub fn bytes(&self) -> Option<Bytes> {
        match self {
            ForwardBody::Empty => None,
            ForwardBody::Json { encoded, .. } => Some(encoded.clone()),
            ForwardBody::Raw(bytes) => Some(bytes.clone()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ForwardBody::Empty => "empty",
            ForwardBody::Json { .. } => "json",
            ForwardBody::Raw(_) => "raw",
        }
    }
}

/// A logical request, independent of the candidate it is sent to.
#[derive(Debug, Clone)]
pub struct ForwardedRequest {
    pub method: Method,
    /// Path plus optional `?query`, always starting with `/`.
    pub path_and_query: String,
    /// Already sanitized for forwarding.
    pub headers: HeaderMap,
    pub body: ForwardBody,
}

impl ForwardedRequest {
    /// A bodiless GET asking for JSON.
    pub fn get_json(path_and_query: impl Into<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        Self {
            method: Method::GET,
            path_and_query: normalize_path(path_and_query.into()),
            headers,
            body: ForwardBody::Empty,
        }
    }
}

pub(crate) fn normalize_path(path: String) -> String {
    if path.starts_with('/') {
        path
    } else {
        format!("/{}", path)
    }
}

/// Fully buffered upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}
