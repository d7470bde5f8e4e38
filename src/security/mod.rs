//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request  → headers.rs (drop host/connection/content-length) → upstream
//! Upstream response → headers.rs (drop encoding/length/connection)    → caller
//! ```
//!
//! Body size limits are enforced by the HTTP layer from
//! `security.max_body_size`.

pub mod headers;
