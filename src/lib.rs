//! Manga content gateway library.
//!
//! A failover request router between the reader frontend and the content
//! API: primary, secondary (tunnel) and local development backends.

pub mod admin;
pub mod client;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod security;
pub mod upstream;

pub use client::PageClient;
pub use config::GatewayConfig;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
pub use resilience::{FailoverRouter, FailoverState};
