//! Single-attempt forwarding.
//!
//! # Responsibilities
//! - Send one `ForwardedRequest` to one candidate
//! - Buffer the whole response body
//!
//! Deadlines and failure classification live in `resilience`; a
//! forwarder only reports transport-level errors.

use std::future::Future;
use thiserror::Error;

use crate::upstream::candidate::Candidate;
use crate::upstream::message::{ForwardedRequest, UpstreamResponse};

/// Connection could not be established or the body could not be read.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest hides the root cause (DNS, refused) behind `source`.
        let mut message = e.to_string();
        let mut source = std::error::Error::source(&e);
        while let Some(inner) = source {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            source = inner.source();
        }
        TransportError(message)
    }
}

/// Sends requests to a candidate.
pub trait Forward: Send + Sync {
    fn send(
        &self,
        target: &Candidate,
        request: &ForwardedRequest,
    ) -> impl Future<Output = Result<UpstreamResponse, TransportError>> + Send;
}

/// HTTP forwarder backed by a pooled `reqwest` client.
///
/// gzip, brotli, deflate and zstd bodies are decoded by the client, which
/// also drops their `content-encoding`. Any other encoding is buffered
/// as received and keeps its label. Redirects are returned to the caller
/// rather than followed.
#[derive(Debug, Clone)]
pub struct HttpForwarder {
    client: reqwest::Client,
}

impl HttpForwarder {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("manga-gateway/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { client })
    }
}

impl Forward for HttpForwarder {
    fn send(
        &self,
        target: &Candidate,
        request: &ForwardedRequest,
    ) -> impl Future<Output = Result<UpstreamResponse, TransportError>> + Send {
        let url = target.url_for(&request.path_and_query);
        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .headers(request.headers.clone());
        if let Some(body) = request.body.bytes() {
            builder = builder.body(body);
        }

        async move {
            let response = builder.send().await?;
            let status = response.status();
            let headers = response.headers().clone();
            let body = response.bytes().await?;
            Ok(UpstreamResponse { status, headers, body })
        }
    }
}
