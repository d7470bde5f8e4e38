//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router: catch-all gateway route plus optional status endpoints
//! - Wire up middleware (request id, tracing, overall deadline, body limit)
//! - Hand each inbound request to the failover router
//! - Apply reloaded upstream topologies
//! - Serve until the shutdown signal

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin;
use crate::config::GatewayConfig;
use crate::http::request::capture;
use crate::http::response;
use crate::observability::metrics;
use crate::resilience::{FailoverRouter, FailoverState, RouteOutcome};
use crate::upstream::{HttpForwarder, Topology};

pub const X_REQUEST_ID: &str = "x-request-id";

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid upstream URL: {0}")]
    Topology(#[from] url::ParseError),

    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<FailoverRouter<HttpForwarder>>,
    pub max_body_size: usize,
    pub strip_prefix: Option<Arc<str>>,
    pub admin_key: Arc<str>,
}

/// HTTP server for the gateway.
pub struct GatewayServer {
    router: Router,
    config: GatewayConfig,
    gateway: Arc<FailoverRouter<HttpForwarder>>,
}

impl GatewayServer {
    /// Create a server with a fresh failover state.
    pub fn new(config: GatewayConfig) -> Result<Self, ServerError> {
        Self::with_state(config, Arc::new(FailoverState::new()))
    }

    /// Create a server sharing `state` with other routers in the process.
    pub fn with_state(config: GatewayConfig, state: Arc<FailoverState>) -> Result<Self, ServerError> {
        let topology = Topology::from_config(&config)?;
        let forwarder = HttpForwarder::new()?;
        let gateway = Arc::new(FailoverRouter::new(
            forwarder,
            topology,
            state,
            Duration::from_millis(config.timeouts.gateway_attempt_ms),
        ));

        let state = AppState {
            gateway: gateway.clone(),
            max_body_size: config.security.max_body_size,
            strip_prefix: config.listener.strip_prefix.as_deref().map(Arc::from),
            admin_key: Arc::from(config.admin.api_key.as_str()),
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            gateway,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/", any(gateway_handler))
            .route("/{*path}", any(gateway_handler));
        if config.admin.enabled {
            router = router.merge(admin::admin_router(state.clone()));
        }

        router
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The failover router shared by every handler.
    pub fn gateway(&self) -> Arc<FailoverRouter<HttpForwarder>> {
        self.gateway.clone()
    }

    /// A clone of the Axum router, e.g. for in-process requests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown` fires.
    ///
    /// Configurations received on `config_updates` replace the upstream
    /// topology; other settings need a restart.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<GatewayConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mode = self.config.mode.as_str(),
            attempt_timeout_ms = self.config.timeouts.gateway_attempt_ms,
            "Gateway starting"
        );

        let gateway = self.gateway.clone();
        let reload_task = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                match Topology::from_config(&config) {
                    Ok(topology) => gateway.update_topology(topology),
                    Err(e) => tracing::error!(error = %e, "Ignoring reloaded config with invalid upstream URL"),
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        reload_task.abort();
        tracing::info!("Gateway stopped");
        Ok(())
    }
}

/// Catch-all handler: capture once, route with failover, translate back.
async fn gateway_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let forwarded = match capture(request, state.max_body_size, state.strip_prefix.as_deref()).await {
        Ok(forwarded) => forwarded,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Rejecting request");
            metrics::record_request(method.as_str(), 400, start_time);
            return (StatusCode::BAD_REQUEST, "Failed to read request body").into_response();
        }
    };

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %forwarded.path_and_query,
        body = forwarded.body.kind(),
        "Forwarding request"
    );

    let response = match state.gateway.route(&forwarded).await {
        RouteOutcome::Passthrough { target, response, attempts } => {
            tracing::debug!(
                request_id = %request_id,
                target = %target.target(),
                status = %response.status,
                attempts,
                "Upstream responded"
            );
            response::passthrough(response)
        }
        RouteOutcome::Exhausted(report) => response::exhausted(&report),
    };

    metrics::record_request(method.as_str(), response.status().as_u16(), start_time);
    response
}
