//! Turn-track recovery.
//!
//! Squadrons that struck or aborted sit on the turn track for a few turns
//! before they are back on deck. Recovery ticks once per Cleanup phase.

use crate::board::{Location, Unit, UnitStatus};

/// Squadrons after one recovery tick, plus what happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recovery {
    pub units: Vec<Unit>,
    pub messages: Vec<String>,
}

/// Advances every squadron on the turn track by one turn.
///
/// A squadron whose counter reaches zero lands on its home carrier (or the
/// pool if it has none) ready for operations.
pub fn process_turn_track(units: &[Unit]) -> Recovery {
    let mut messages = Vec::new();
    let units = units
        .iter()
        .map(|u| {
            let mut u = u.clone();
            if u.location != Location::TurnTrack {
                return u;
            }
            let remaining = u.turns_until_ready.unwrap_or(1).saturating_sub(1);
            if remaining == 0 {
                let home = u.home();
                u.relocate(home);
                messages.push(format!(
                    "{} returned to {} and is now combat ready.",
                    u.id,
                    if u.carrier.is_some() { home.as_str() } else { "Ready Deck" }
                ));
            } else {
                u.turns_until_ready = Some(remaining);
            }
            u
        })
        .collect();

    Recovery { units, messages }
}

/// Rearms exhausted CAP fighters. Returns one message per fighter restored.
pub fn rearm_cap(units: &mut [Unit]) -> Vec<String> {
    let mut messages = Vec::new();
    for u in units.iter_mut().filter(|u| u.status == UnitStatus::CapLow) {
        u.status = UnitStatus::CapNormal;
        messages.push(format!("{} CAP rearmed and back on station.", u.id));
    }
    messages
}
