//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (read body once, sanitize headers)
//!     → [resilience::FailoverRouter picks and tries candidates]
//!     → response.rs (passthrough or 503 diagnostic)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use server::{AppState, GatewayServer, ServerError, X_REQUEST_ID};
