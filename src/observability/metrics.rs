//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): inbound requests by method, status
//! - `gateway_request_duration_seconds` (histogram): inbound latency
//! - `gateway_upstream_attempts_total` (counter): attempts by role, outcome
//! - `gateway_upstream_attempt_duration_seconds` (histogram): attempt latency by role
//! - `gateway_failovers_total` (counter): successful second attempts by from, to
//! - `gateway_exhausted_total` (counter): requests where both attempts failed
//! - `gateway_preferred_candidate` (gauge): 0=primary, 1=secondary
//!
//! Without an installed recorder every call is a no-op.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

use crate::resilience::state::Preference;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            tracing::info!(address = %addr, "Metrics endpoint listening");
            record_preference(Preference::Primary);
        }
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    let status = status.to_string();
    counter!("gateway_requests_total", "method" => method.to_string(), "status" => status.clone())
        .increment(1);
    histogram!("gateway_request_duration_seconds", "method" => method.to_string(), "status" => status)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_attempt(role: &'static str, outcome: &'static str, start: Instant) {
    counter!("gateway_upstream_attempts_total", "role" => role, "outcome" => outcome).increment(1);
    histogram!("gateway_upstream_attempt_duration_seconds", "role" => role)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_failover(from: &'static str, to: &'static str) {
    counter!("gateway_failovers_total", "from" => from, "to" => to).increment(1);
}

pub fn record_exhausted() {
    counter!("gateway_exhausted_total").increment(1);
}

pub fn record_preference(preference: Preference) {
    gauge!("gateway_preferred_candidate").set(preference as u8 as f64);
}
