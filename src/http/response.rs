//! Outbound response construction.
//!
//! # Responsibilities
//! - Rebuild a buffered upstream response for the caller
//! - Render the 503 diagnostic when every attempt failed

use axum::body::Body;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::resilience::ExhaustedReport;
use crate::security::headers::response_headers;
use crate::upstream::UpstreamResponse;

pub const BACKEND_UNREACHABLE: &str = "Backend unreachable";

/// Status and non-transport headers copied, body buffered.
pub fn passthrough(upstream: UpstreamResponse) -> Response {
    let headers = response_headers(&upstream.headers);
    let mut response = Response::new(Body::from(upstream.body));
    *response.status_mut() = upstream.status;
    *response.headers_mut() = headers;
    response
}

#[derive(Serialize)]
struct UnreachableBody<'a> {
    error: &'static str,
    details: &'a ExhaustedReport,
}

/// `503 {"error":"Backend unreachable","details":{...}}`.
pub fn exhausted(report: &ExhaustedReport) -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(UnreachableBody {
            error: BACKEND_UNREACHABLE,
            details: report,
        }),
    )
        .into_response()
}
