use axum::{extract::State, Json};
use serde::Serialize;

use crate::http::server::AppState;
use crate::resilience::{Preference, StatsSnapshot};
use crate::upstream::{resolver, Role};

#[derive(Debug, Serialize)]
pub struct CandidateStatus {
    pub role: Role,
    pub target: String,
}

#[derive(Debug, Serialize)]
pub struct GatewayStatus {
    pub version: &'static str,
    pub mode: &'static str,
    pub preferred: Preference,
    /// Order the next request will try.
    pub candidates: Vec<CandidateStatus>,
    pub attempt_timeout_ms: u64,
    pub stats: StatsSnapshot,
}

#[derive(Debug, Serialize)]
pub struct PreferenceReset {
    pub previous: Preference,
    pub preferred: Preference,
}

pub async fn get_status(State(state): State<AppState>) -> Json<GatewayStatus> {
    let gateway = &state.gateway;
    let topology = gateway.topology();
    let preferred = gateway.state().preference();
    let plan = resolver::resolve(&topology, preferred);

    Json(GatewayStatus {
        version: env!("CARGO_PKG_VERSION"),
        mode: if topology.dev_mode { "development" } else { "production" },
        preferred,
        candidates: plan
            .candidates()
            .iter()
            .map(|c| CandidateStatus {
                role: c.role,
                target: c.target().to_string(),
            })
            .collect(),
        attempt_timeout_ms: gateway.attempt_timeout().as_millis() as u64,
        stats: gateway.stats(),
    })
}

pub async fn reset_preference(State(state): State<AppState>) -> Json<PreferenceReset> {
    let previous = state.gateway.reset_preference();
    tracing::info!(previous = previous.as_str(), "Failover preference reset to primary");
    Json(PreferenceReset {
        previous,
        preferred: Preference::Primary,
    })
}
