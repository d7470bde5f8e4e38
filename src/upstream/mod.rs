//! Upstream candidates subsystem.
//!
//! # Data Flow
//! ```text
//! FailoverState snapshot + Topology
//!     → resolver.rs (ordered AttemptPlan)
//!     → forwarder.rs (one attempt against one candidate)
//!     → message.rs (buffered UpstreamResponse)
//! ```

pub mod candidate;
pub mod forwarder;
pub mod message;
pub mod resolver;

pub use candidate::{Candidate, Role, Topology};
pub use forwarder::{Forward, HttpForwarder, TransportError};
pub use message::{ForwardBody, ForwardedRequest, UpstreamResponse};
pub use resolver::{next_candidate, resolve, AttemptPlan};
