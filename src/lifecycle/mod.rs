//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! signals.rs: SIGINT/SIGTERM → Shutdown::trigger
//! shutdown.rs: broadcast → server stops accepting, drains, exits
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
