//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → orchestrator.rs (Attempt1 → Attempt2 → Exhausted)
//!     → timeouts.rs (deadline per attempt, aborted on expiry)
//!     → attempt.rs (classify response or error)
//!     → state.rs (update process-wide preference after a failover)
//! ```

pub mod attempt;
pub mod orchestrator;
pub mod state;
pub mod timeouts;

pub use attempt::{AttemptError, AttemptRecord, AttemptResult};
pub use orchestrator::{ExhaustedReport, FailoverRouter, RouteOutcome, StatsSnapshot};
pub use state::{FailoverState, Preference};
pub use timeouts::{GATEWAY_ATTEMPT_TIMEOUT, PAGE_FETCH_ATTEMPT_TIMEOUT};
