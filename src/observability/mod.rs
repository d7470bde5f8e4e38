//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! http, resilience, config
//!     → logging.rs (tracing events, EnvFilter)
//!     → metrics.rs (Prometheus counters, gauges, histograms)
//! ```
//!
//! Request ids (`x-request-id`) are set by the HTTP layer and forwarded
//! upstream with the other headers.

pub mod logging;
pub mod metrics;
