//! Shared utilities for integration testing.

#![allow(dead_code)]

use axum::{
    body::Bytes,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::IntoResponse,
    Json, Router,
};
use manga_gateway::config::GatewayConfig;
use manga_gateway::http::GatewayServer;
use manga_gateway::lifecycle::Shutdown;
use manga_gateway::resilience::FailoverRouter;
use manga_gateway::upstream::HttpForwarder;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::compression::CompressionLayer;

/// A mock content API answering every path with a fixed status.
///
/// The JSON body echoes what the upstream received.
#[derive(Clone)]
pub struct MockUpstream {
    pub name: &'static str,
    pub status: u16,
    pub delay: Option<Duration>,
}

impl MockUpstream {
    pub fn ok(name: &'static str) -> Self {
        Self { name, status: 200, delay: None }
    }

    pub fn status(name: &'static str, status: u16) -> Self {
        Self { name, status, delay: None }
    }

    pub fn hanging(name: &'static str, delay: Duration) -> Self {
        Self { name, status: 200, delay: Some(delay) }
    }
}

/// Start a mock upstream on an ephemeral port. Returns its address and hit counter.
pub async fn spawn_upstream(spec: MockUpstream) -> (SocketAddr, Arc<AtomicU32>) {
    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();

    let handler = move |method: Method, uri: Uri, headers: HeaderMap, body: Bytes| {
        let spec = spec.clone();
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = spec.delay {
                tokio::time::sleep(delay).await;
            }
            let echo = json!({
                "served_by": spec.name,
                "method": method.as_str(),
                "path": uri.path(),
                "query": uri.query(),
                "body": String::from_utf8_lossy(&body),
                "request_id": headers.get("x-request-id").and_then(|v| v.to_str().ok()),
                "host": headers.get("host").and_then(|v| v.to_str().ok()),
            });
            (
                StatusCode::from_u16(spec.status).unwrap(),
                [("x-served-by", spec.name)],
                Json(echo),
            )
                .into_response()
        }
    };

    let app = Router::new().fallback(handler);
    (serve(app).await, hits)
}

/// Encoding a compressing upstream applies when the request accepts it.
#[derive(Clone, Copy)]
pub enum Encoding {
    Gzip,
    Zstd,
}

/// Chapter list large enough to be worth compressing.
pub fn chapter_list(served_by: &str) -> Value {
    let chapters: Vec<Value> = (1..=40)
        .map(|n| json!({"number": n, "title": format!("Chapter {}", n), "pages": 24}))
        .collect();
    json!({"served_by": served_by, "chapters": chapters})
}

/// Start an upstream that answers every path with `chapter_list`, compressed.
pub async fn spawn_compressing_upstream(name: &'static str, encoding: Encoding) -> SocketAddr {
    let compression = match encoding {
        Encoding::Gzip => CompressionLayer::new().no_zstd(),
        Encoding::Zstd => CompressionLayer::new().no_gzip(),
    };
    let payload = chapter_list(name);
    let app = Router::new()
        .fallback(move || {
            let payload = payload.clone();
            async move { ([("x-served-by", name)], Json(payload)) }
        })
        .layer(compression);
    serve(app).await
}

/// Bytes served with an encoding no HTTP client decodes.
pub const ARCHIVE_BODY: &[u8] = &[0x28, 0xb5, 0x2f, 0xfd, 0x00, 0x58, 0x61, 0x00];

/// Start an upstream answering with `ARCHIVE_BODY` labelled `content-encoding: x-archive`.
pub async fn spawn_archive_upstream(name: &'static str) -> SocketAddr {
    let app = Router::new().fallback(move || async move {
        (
            [
                ("content-encoding", "x-archive"),
                ("content-type", "application/json"),
                ("x-served-by", name),
            ],
            Bytes::from_static(ARCHIVE_BODY),
        )
    });
    serve(app).await
}

/// Start an upstream that redirects every path to `location`.
pub async fn spawn_redirecting_upstream(location: &'static str) -> (SocketAddr, Arc<AtomicU32>) {
    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();
    let app = Router::new().fallback(move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            (StatusCode::FOUND, [("location", location)])
        }
    });
    (serve(app).await, hits)
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// An address nothing listens on.
pub async fn dead_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

pub fn url(addr: SocketAddr) -> String {
    format!("http://{}", addr)
}

/// Gateway config for the given upstreams with short attempt deadlines.
pub fn gateway_config(primary: SocketAddr, secondary: SocketAddr, local: SocketAddr) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstreams.primary_url = url(primary);
    config.upstreams.secondary_url = url(secondary);
    config.upstreams.local_url = url(local);
    config.timeouts.gateway_attempt_ms = 300;
    config.timeouts.request_secs = 5;
    config.observability.metrics_enabled = false;
    config
}

pub struct RunningGateway {
    pub addr: SocketAddr,
    pub gateway: Arc<FailoverRouter<HttpForwarder>>,
    pub shutdown: Shutdown,
}

impl RunningGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for RunningGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the gateway on an ephemeral port.
pub async fn start_gateway(config: GatewayConfig) -> RunningGateway {
    let server = GatewayServer::new(config).unwrap();
    let gateway = server.gateway();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let (_, config_updates) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    RunningGateway { addr, gateway, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// A client that neither decodes bodies nor follows redirects, so tests
/// see exactly what the gateway sent.
pub fn raw_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .no_gzip()
        .no_brotli()
        .no_deflate()
        .no_zstd()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}
