//! Failover orchestration.
//!
//! # Phases
//! ```text
//! Attempt1 ──success──▶ passthrough
//!    │ failure
//!    ▼
//! Attempt2 ──success──▶ passthrough (+ preference update outside dev mode)
//!    │ failure
//!    ▼
//! Exhausted ──────────▶ 503 report with both attempts
//! ```
//!
//! At most two attempts per request, sequential, no backoff.

use arc_swap::ArcSwap;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::observability::metrics;
use crate::resilience::attempt::{classify, AttemptError, AttemptRecord, AttemptResult};
use crate::resilience::state::{FailoverState, Preference};
use crate::resilience::timeouts::with_deadline;
use crate::upstream::{resolver, Candidate, Forward, ForwardedRequest, Topology, UpstreamResponse};

/// Both attempts failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExhaustedReport {
    pub attempt_1: AttemptRecord,
    pub attempt_2: AttemptRecord,
    pub is_dev: bool,
}

/// What the orchestrator hands back to its caller.
#[derive(Debug)]
pub enum RouteOutcome {
    /// A candidate answered; the response goes back unchanged.
    Passthrough {
        target: Candidate,
        response: UpstreamResponse,
        attempts: u8,
    },
    Exhausted(ExhaustedReport),
}

enum Phase {
    Attempt1,
    Attempt2 { first: AttemptRecord, next: Candidate },
    Exhausted(ExhaustedReport),
}

#[derive(Debug, Default)]
struct RouterStats {
    requests: AtomicU64,
    failovers: AtomicU64,
    exhausted: AtomicU64,
}

/// Counter snapshot for the status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub requests: u64,
    pub failovers: u64,
    pub exhausted: u64,
}

/// Routes requests across candidates with at most one failover.
pub struct FailoverRouter<F> {
    forwarder: F,
    topology: ArcSwap<Topology>,
    state: Arc<FailoverState>,
    attempt_timeout: Duration,
    stats: RouterStats,
}

impl<F: Forward> FailoverRouter<F> {
    pub fn new(
        forwarder: F,
        topology: Topology,
        state: Arc<FailoverState>,
        attempt_timeout: Duration,
    ) -> Self {
        Self {
            forwarder,
            topology: ArcSwap::from_pointee(topology),
            state,
            attempt_timeout,
            stats: RouterStats::default(),
        }
    }

    /// Shared preference flag, for other routers in the same process.
    pub fn state(&self) -> Arc<FailoverState> {
        self.state.clone()
    }

    pub fn topology(&self) -> Arc<Topology> {
        self.topology.load_full()
    }

    /// Swap in a reloaded topology. In-flight requests keep their snapshot.
    pub fn update_topology(&self, topology: Topology) {
        tracing::info!(
            dev_mode = topology.dev_mode,
            primary = %topology.primary.target(),
            secondary = %topology.secondary.target(),
            local = %topology.local.target(),
            "Upstream topology updated"
        );
        self.topology.store(Arc::new(topology));
    }

    pub fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    pub fn stats(&self) -> StatsSnapshot {
        StatsSnapshot {
            requests: self.stats.requests.load(Ordering::Relaxed),
            failovers: self.stats.failovers.load(Ordering::Relaxed),
            exhausted: self.stats.exhausted.load(Ordering::Relaxed),
        }
    }

    /// Force the primary back to the front of the order.
    pub fn reset_preference(&self) -> Preference {
        let previous = self.state.reset();
        metrics::record_preference(Preference::Primary);
        previous
    }

    /// Route one request through at most two candidates.
    pub async fn route(&self, request: &ForwardedRequest) -> RouteOutcome {
        self.stats.requests.fetch_add(1, Ordering::Relaxed);

        let topology = self.topology.load_full();
        let plan = resolver::resolve(&topology, self.state.preference());
        let mut phase = Phase::Attempt1;

        loop {
            phase = match phase {
                Phase::Attempt1 => {
                    let target = plan.first();
                    match self.attempt(target, request).await {
                        AttemptResult::Success(response) => {
                            return RouteOutcome::Passthrough {
                                target: target.clone(),
                                response,
                                attempts: 1,
                            };
                        }
                        AttemptResult::Failure(error) => {
                            let next = resolver::next_candidate(&topology, target.role).clone();
                            tracing::warn!(
                                target = %target.target(),
                                role = %target.role,
                                next = %next.role,
                                error = %error,
                                "First attempt failed, failing over"
                            );
                            Phase::Attempt2 {
                                first: AttemptRecord::new(target, &error),
                                next,
                            }
                        }
                    }
                }
                Phase::Attempt2 { first, next } => match self.attempt(&next, request).await {
                    AttemptResult::Success(response) => {
                        self.stats.failovers.fetch_add(1, Ordering::Relaxed);
                        metrics::record_failover(first.role.as_str(), next.role.as_str());
                        if !topology.dev_mode {
                            self.prefer(&next);
                        }
                        return RouteOutcome::Passthrough {
                            target: next,
                            response,
                            attempts: 2,
                        };
                    }
                    AttemptResult::Failure(error) => Phase::Exhausted(ExhaustedReport {
                        attempt_1: first,
                        attempt_2: AttemptRecord::new(&next, &error),
                        is_dev: topology.dev_mode,
                    }),
                },
                Phase::Exhausted(report) => {
                    self.stats.exhausted.fetch_add(1, Ordering::Relaxed);
                    metrics::record_exhausted();
                    tracing::error!(
                        attempt_1 = %report.attempt_1.target,
                        attempt_1_error = %report.attempt_1.error,
                        attempt_2 = %report.attempt_2.target,
                        attempt_2_error = %report.attempt_2.error,
                        is_dev = report.is_dev,
                        "All upstream candidates failed"
                    );
                    return RouteOutcome::Exhausted(report);
                }
            };
        }
    }

    async fn attempt(&self, target: &Candidate, request: &ForwardedRequest) -> AttemptResult {
        let started = Instant::now();
        let result = match with_deadline(self.attempt_timeout, self.forwarder.send(target, request)).await {
            Ok(Ok(response)) => classify(target.role, response),
            Ok(Err(e)) => AttemptResult::Failure(AttemptError::Network(e.to_string())),
            Err(_) => AttemptResult::Failure(AttemptError::Timeout(self.attempt_timeout)),
        };

        if let AttemptResult::Success(response) = &result {
            if !response.status.is_success() {
                tracing::debug!(
                    target = %target.target(),
                    status = %response.status,
                    "Passing through upstream application error"
                );
            }
        }
        metrics::record_attempt(target.role.as_str(), result.label(), started);
        result
    }

    fn prefer(&self, winner: &Candidate) {
        if let Some(previous) = self.state.record_success(winner.role) {
            let current = self.state.preference();
            tracing::info!(
                from = previous.as_str(),
                to = current.as_str(),
                target = %winner.target(),
                "Failover preference changed"
            );
            metrics::record_preference(current);
        }
    }
}
