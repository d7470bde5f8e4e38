//! Process-wide failover preference.
//!
//! # State Transitions
//! ```text
//! Primary   → Secondary: primary failed, secondary succeeded
//! Secondary → Primary:   secondary failed, primary succeeded (recovery)
//! ```
//!
//! The flag only orders attempts. Concurrent requests may race on it;
//! last write wins.

use serde::Serialize;
use std::sync::atomic::{AtomicU8, Ordering};

use crate::upstream::Role;

/// Which remote candidate is tried first in production.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Preference {
    #[default]
    Primary = 0,
    Secondary = 1,
}

impl From<u8> for Preference {
    fn from(val: u8) -> Self {
        match val {
            1 => Preference::Secondary,
            _ => Preference::Primary,
        }
    }
}

impl Preference {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preference::Primary => "primary",
            Preference::Secondary => "secondary",
        }
    }
}

/// Shared preference flag. Starts as `Primary`.
#[derive(Debug, Default)]
pub struct FailoverState {
    preferred: AtomicU8,
}

impl FailoverState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current preference.
    pub fn preference(&self) -> Preference {
        Preference::from(self.preferred.load(Ordering::Relaxed))
    }

    /// Record that `role` just served a request after a failover.
    ///
    /// Returns the previous preference when it changed. `Local` never
    /// changes the preference.
    pub fn record_success(&self, role: Role) -> Option<Preference> {
        let next = match role {
            Role::Primary => Preference::Primary,
            Role::Secondary => Preference::Secondary,
            Role::Local => return None,
        };
        let previous = Preference::from(self.preferred.swap(next as u8, Ordering::Relaxed));
        (previous != next).then_some(previous)
    }

    /// Force the primary back to the front of the order.
    pub fn reset(&self) -> Preference {
        Preference::from(self.preferred.swap(Preference::Primary as u8, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_primary() {
        assert_eq!(FailoverState::new().preference(), Preference::Primary);
    }

    #[test]
    fn test_flip_and_recover() {
        let state = FailoverState::new();

        assert_eq!(state.record_success(Role::Secondary), Some(Preference::Primary));
        assert_eq!(state.preference(), Preference::Secondary);

        assert_eq!(state.record_success(Role::Secondary), None);

        assert_eq!(state.record_success(Role::Primary), Some(Preference::Secondary));
        assert_eq!(state.preference(), Preference::Primary);
    }

    #[test]
    fn test_local_success_is_ignored() {
        let state = FailoverState::new();
        state.record_success(Role::Secondary);
        assert_eq!(state.record_success(Role::Local), None);
        assert_eq!(state.preference(), Preference::Secondary);
    }

    #[test]
    fn test_reset() {
        let state = FailoverState::new();
        state.record_success(Role::Secondary);
        assert_eq!(state.reset(), Preference::Secondary);
        assert_eq!(state.preference(), Preference::Primary);
    }
}
