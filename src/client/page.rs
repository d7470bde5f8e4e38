//! Page data client.
//!
//! Server-side page code fetches content through the same failover logic
//! as the gateway, with the stricter 3.5 s per-attempt deadline. Sharing
//! the gateway's `FailoverState` lets both paths learn from each other.

use axum::http::StatusCode;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::GatewayConfig;
use crate::resilience::{ExhaustedReport, FailoverRouter, FailoverState, RouteOutcome};
use crate::upstream::{Forward, ForwardedRequest, HttpForwarder, Topology, UpstreamResponse};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("backend unreachable: {}", describe_attempts(.0))]
    Exhausted(Box<ExhaustedReport>),

    #[error("{target} responded with status {status}")]
    UpstreamStatus { target: String, status: StatusCode },

    #[error("invalid JSON from {target}: {source}")]
    Decode {
        target: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid upstream URL: {0}")]
    Topology(#[from] url::ParseError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

fn describe_attempts(report: &ExhaustedReport) -> String {
    format!(
        "{} ({}), then {} ({})",
        report.attempt_1.target, report.attempt_1.error, report.attempt_2.target, report.attempt_2.error
    )
}

/// Failover-aware JSON client for page rendering code.
pub struct PageClient<F = HttpForwarder> {
    router: FailoverRouter<F>,
}

impl PageClient<HttpForwarder> {
    /// Build from configuration, sharing `state` with the gateway.
    pub fn from_config(config: &GatewayConfig, state: Arc<FailoverState>) -> Result<Self, FetchError> {
        let topology = Topology::from_config(config)?;
        let forwarder = HttpForwarder::new()?;
        Ok(Self::new(
            forwarder,
            topology,
            state,
            Duration::from_millis(config.timeouts.page_fetch_attempt_ms),
        ))
    }
}

impl<F: Forward> PageClient<F> {
    pub fn new(forwarder: F, topology: Topology, state: Arc<FailoverState>, attempt_timeout: Duration) -> Self {
        Self {
            router: FailoverRouter::new(forwarder, topology, state, attempt_timeout),
        }
    }

    /// Fetch the raw response for `path_and_query`; non-2xx passthroughs
    /// are returned, not treated as errors.
    pub async fn get(&self, path_and_query: &str) -> Result<(String, UpstreamResponse), FetchError> {
        match self.router.route(&ForwardedRequest::get_json(path_and_query)).await {
            RouteOutcome::Passthrough { target, response, .. } => Ok((target.target().to_string(), response)),
            RouteOutcome::Exhausted(report) => Err(FetchError::Exhausted(Box::new(report))),
        }
    }

    /// Fetch and decode a JSON document.
    pub async fn get_json<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<T, FetchError> {
        let (target, response) = self.get(path_and_query).await?;
        if !response.status.is_success() {
            return Err(FetchError::UpstreamStatus {
                target,
                status: response.status,
            });
        }
        serde_json::from_slice(&response.body).map_err(|source| FetchError::Decode { target, source })
    }

    pub fn router(&self) -> &FailoverRouter<F> {
        &self.router
    }
}
