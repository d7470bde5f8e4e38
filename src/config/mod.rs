//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! gateway.toml (optional)
//!     → loader.rs (parse, apply GATEWAY_* env overrides)
//!     → validation.rs (semantic checks, all errors reported)
//!     → GatewayConfig
//!
//! On file change:
//!     watcher.rs reloads + validates
//!     → server swaps the upstream topology atomically
//! ```
//!
//! Only the topology (mode and base URLs) is hot-reloadable. Listener,
//! timeouts and limits apply at startup.

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AdminConfig, GatewayConfig, ListenerConfig, ObservabilityConfig, RunMode, SecurityConfig,
    TimeoutConfig, UpstreamConfig,
};
