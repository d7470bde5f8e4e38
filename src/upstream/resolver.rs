//! Endpoint resolution.
//!
//! # Ordering
//! ```text
//! development: local → primary → secondary
//! production:  preferred remote → other remote   (local never used)
//! ```
//!
//! # Next candidate after a failed first attempt
//! ```text
//! local     → primary
//! primary   → secondary
//! secondary → primary   (recovery retry)
//! ```

use crate::resilience::state::Preference;
use crate::upstream::candidate::{Candidate, Role, Topology};

/// Ordered candidates for one request. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptPlan {
    candidates: Vec<Candidate>,
}

impl AttemptPlan {
    /// The candidate tried first.
    pub fn first(&self) -> &Candidate {
        &self.candidates[0]
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn roles(&self) -> Vec<Role> {
        self.candidates.iter().map(|c| c.role).collect()
    }
}

/// Produce the attempt order for the current mode and preference snapshot.
pub fn resolve(topology: &Topology, preference: Preference) -> AttemptPlan {
    let candidates = if topology.dev_mode {
        vec![
            topology.local.clone(),
            topology.primary.clone(),
            topology.secondary.clone(),
        ]
    } else {
        match preference {
            Preference::Primary => vec![topology.primary.clone(), topology.secondary.clone()],
            Preference::Secondary => vec![topology.secondary.clone(), topology.primary.clone()],
        }
    };
    AttemptPlan { candidates }
}

/// Candidate for the second attempt after `failed` did not succeed.
pub fn next_candidate(topology: &Topology, failed: Role) -> &Candidate {
    match failed {
        Role::Local => &topology.primary,
        Role::Primary => &topology.secondary,
        Role::Secondary => &topology.primary,
    }
}
