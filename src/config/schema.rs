//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, mount prefix).
    pub listener: ListenerConfig,

    /// Production or development candidate ordering.
    pub mode: RunMode,

    /// Upstream content API base URLs.
    pub upstreams: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Status/admin endpoints.
    pub admin: AdminConfig,

    /// Request size limits.
    pub security: SecurityConfig,
}

impl GatewayConfig {
    /// True when the development candidate ordering is active.
    pub fn is_dev(&self) -> bool {
        self.mode == RunMode::Development
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Path prefix removed before forwarding (e.g. "/api/proxy").
    /// Requests outside the prefix are forwarded unchanged.
    pub strip_prefix: Option<String>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            strip_prefix: None,
        }
    }
}

/// Selects how candidates are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    #[default]
    Production,
    Development,
}

impl RunMode {
    /// Parse the value of the `GATEWAY_ENV` variable.
    pub fn from_env_value(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(RunMode::Development),
            "production" | "prod" => Some(RunMode::Production),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Production => "production",
            RunMode::Development => "development",
        }
    }
}

/// Upstream base URLs. Paths and query strings are appended unchanged.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Primary remote backend.
    pub primary_url: String,

    /// Secondary (tunnel) remote backend.
    pub secondary_url: String,

    /// Local development backend. Only used in development mode.
    pub local_url: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            primary_url: "http://127.0.0.1:7860".to_string(),
            secondary_url: "http://127.0.0.1:7861".to_string(),
            local_url: "http://127.0.0.1:8000".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Per-attempt deadline at the gateway entry point, in milliseconds.
    pub gateway_attempt_ms: u64,

    /// Per-attempt deadline for the in-process page data client, in milliseconds.
    pub page_fetch_attempt_ms: u64,

    /// Overall deadline for one inbound request in seconds.
    /// Must leave room for two gateway attempts.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            gateway_attempt_ms: 15_000,
            page_fetch_attempt_ms: 3_500,
            request_secs: 35,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Status endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AdminConfig {
    /// Mount the `/_gateway/*` endpoints.
    pub enabled: bool,

    /// Bearer token required by the endpoints.
    pub api_key: String,
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum inbound body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}
