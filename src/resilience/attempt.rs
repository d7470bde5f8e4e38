//! Attempt outcomes and failure classification.
//!
//! # Classification
//! ```text
//! deadline exceeded           → Timeout      (failover)
//! transport error             → Network      (failover)
//! primary: 404 or >= 500      → PrimaryDown  (failover)
//! any other response          → Success      (passed through, even non-2xx)
//! ```
//!
//! Only the primary's 404/5xx counts as down: its hosting platform answers
//! those when the application is not running. Secondary and local
//! candidates return meaningful application errors.

use axum::http::StatusCode;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::upstream::{Candidate, Role, UpstreamResponse};

/// Why an attempt triggers failover.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("network error: {0}")]
    Network(String),

    #[error("primary responded with status {}", .0.as_u16())]
    PrimaryDown(StatusCode),
}

impl AttemptError {
    /// Metric label.
    pub fn kind(&self) -> &'static str {
        match self {
            AttemptError::Timeout(_) => "timeout",
            AttemptError::Network(_) => "network_error",
            AttemptError::PrimaryDown(_) => "http_error",
        }
    }
}

/// Result of one forwarding attempt.
#[derive(Debug)]
pub enum AttemptResult {
    Success(UpstreamResponse),
    Failure(AttemptError),
}

impl AttemptResult {
    pub fn label(&self) -> &'static str {
        match self {
            AttemptResult::Success(_) => "success",
            AttemptResult::Failure(e) => e.kind(),
        }
    }
}

/// Decide whether a received response counts as success for `role`.
pub fn classify(role: Role, response: UpstreamResponse) -> AttemptResult {
    let status = response.status;
    if role == Role::Primary && (status == StatusCode::NOT_FOUND || status.as_u16() >= 500) {
        return AttemptResult::Failure(AttemptError::PrimaryDown(status));
    }
    AttemptResult::Success(response)
}

/// Diagnostic entry for a failed attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptRecord {
    pub target: String,
    #[serde(skip)]
    pub role: Role,
    pub error: String,
}

impl AttemptRecord {
    pub fn new(candidate: &Candidate, error: &AttemptError) -> Self {
        Self {
            target: candidate.target().to_string(),
            role: candidate.role,
            error: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;
    use axum::http::HeaderMap;

    fn response(status: u16) -> UpstreamResponse {
        UpstreamResponse {
            status: StatusCode::from_u16(status).unwrap(),
            headers: HeaderMap::new(),
            body: Bytes::from_static(b"{}"),
        }
    }

    #[test]
    fn test_primary_down_statuses() {
        for status in [404, 500, 502, 503, 599, 600, 999] {
            match classify(Role::Primary, response(status)) {
                AttemptResult::Failure(AttemptError::PrimaryDown(s)) => assert_eq!(s.as_u16(), status),
                other => panic!("expected PrimaryDown for {}, got {:?}", status, other),
            }
        }
    }

    #[test]
    fn test_primary_application_errors_pass_through() {
        for status in [200, 201, 301, 400, 401, 429] {
            assert!(matches!(classify(Role::Primary, response(status)), AttemptResult::Success(_)));
        }
    }

    #[test]
    fn test_fallback_errors_pass_through() {
        for role in [Role::Secondary, Role::Local] {
            for status in [404, 500, 503] {
                assert!(matches!(classify(role, response(status)), AttemptResult::Success(_)));
            }
        }
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            AttemptError::Timeout(Duration::from_secs(15)).to_string(),
            "timed out after 15s"
        );
        assert_eq!(
            AttemptError::PrimaryDown(StatusCode::NOT_FOUND).to_string(),
            "primary responded with status 404"
        );
        assert_eq!(AttemptError::Network("connection refused".into()).kind(), "network_error");
    }
}
