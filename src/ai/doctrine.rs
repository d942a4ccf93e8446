//! Japanese autoplay doctrine.
//!
//! A fixed, greedy plan for the Japanese side used by the simulation harness
//! and benchmarks: keep a fighter over every carrier, throw bombers at the US
//! task force once it is found, and keep Midway under attack until then.

use crate::board::{GameState, Location, Owner, Phase, Unit, UnitId, UnitStatus, UnitType};
use crate::movegen::legal_destinations;

/// One move order for a Japanese squadron.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOrder {
    pub unit: UnitId,
    pub to: Location,
}

/// What the doctrine wants to do in the current phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Move(MoveOrder),
    CommitStrike,
    Recon,
    UsStrike,
    Advance,
}

fn wants(unit: &Unit, state: &GameState) -> Option<Location> {
    if unit.owner != Owner::Japan || unit.status != UnitStatus::Ready {
        return None;
    }
    let legal = legal_destinations(unit, state);
    let preferred = match unit.unit_type {
        UnitType::Fighter => Location::Cap,
        _ if state.us_fleet_found => Location::Staging,
        UnitType::DiveBomber => Location::MidwayFlight,
        UnitType::TorpedoBomber => return None,
    };
    legal.contains(&preferred).then_some(preferred)
}

/// Move orders for every ready squadron, in roster order.
///
/// Orders are computed against one snapshot. They never compete for the same
/// CAP slot because each carrier only has one fighter.
pub fn plan_moves(state: &GameState) -> Vec<MoveOrder> {
    if state.phase != Phase::Japanese {
        return Vec::new();
    }
    state
        .units
        .iter()
        .filter_map(|u| wants(u, state).map(|to| MoveOrder { unit: u.id.clone(), to }))
        .collect()
}

/// True if some Japanese squadron is staged or flying to Midway.
pub fn strike_ready(state: &GameState) -> bool {
    state
        .units
        .iter()
        .any(|u| u.owner == Owner::Japan && matches!(u.location, Location::Staging | Location::MidwayFlight))
}

/// The full sequence of actions for the current phase, ending in `Advance`.
pub fn plan_phase(state: &GameState) -> Vec<Action> {
    let mut actions = Vec::new();
    match state.phase {
        Phase::Japanese => {
            let moves = plan_moves(state);
            let launching = !moves.is_empty() || strike_ready(state);
            actions.extend(moves.into_iter().map(Action::Move));
            if launching && !state.strike_resolved {
                actions.push(Action::CommitStrike);
            }
        }
        Phase::Recon if !state.recon_resolved => actions.push(Action::Recon),
        Phase::American if !state.strike_resolved => actions.push(Action::UsStrike),
        _ => {}
    }
    actions.push(Action::Advance);
    actions
}
