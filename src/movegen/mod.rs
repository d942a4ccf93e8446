//! Movement legality.
//!
//! Decides whether a squadron may be ordered to a location in the current
//! state, and enumerates every location it may legally be ordered to.

use crate::board::{GameState, Location, Phase, Unit, UnitType};

/// The result of checking a move order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveCheck {
    Allowed,
    Rejected(&'static str),
}

impl MoveCheck {
    pub fn is_allowed(&self) -> bool {
        matches!(self, MoveCheck::Allowed)
    }

    pub fn reason(&self) -> Option<&'static str> {
        match self {
            MoveCheck::Allowed => None,
            MoveCheck::Rejected(r) => Some(r),
        }
    }
}

/// Checks whether `unit` may move to `target`.
///
/// Rules are checked in order and the first failure wins:
/// 1. moves happen only in the Japanese phase;
/// 2. CAP takes fighters only, and only with a free slot on their own carrier;
/// 3. staging needs the US fleet to have been found;
/// 4. torpedo bombers cannot fly against Midway.
pub fn can_move(unit: &Unit, target: Location, state: &GameState) -> MoveCheck {
    if state.phase != Phase::Japanese {
        return MoveCheck::Rejected("units can only move in the Japanese phase");
    }

    if target == Location::Cap {
        if unit.unit_type != UnitType::Fighter {
            return MoveCheck::Rejected("only fighters can fly CAP");
        }
        let Some(carrier) = unit.carrier else {
            return MoveCheck::Rejected("only carrier fighters can fly CAP");
        };
        if state.carrier(carrier).free_cap_slot().is_none() {
            return MoveCheck::Rejected("all CAP slots are full for this carrier");
        }
    }

    if target == Location::Staging && !state.us_fleet_found {
        return MoveCheck::Rejected("the US fleet must be found before staging a strike");
    }

    if target == Location::MidwayFlight && unit.unit_type == UnitType::TorpedoBomber {
        return MoveCheck::Rejected("torpedo bombers only attack ships");
    }

    MoveCheck::Allowed
}

/// Every location `unit` may legally be ordered to, excluding where it already is.
pub fn legal_destinations(unit: &Unit, state: &GameState) -> Vec<Location> {
    Location::ALL
        .into_iter()
        .filter(|loc| *loc != unit.location)
        .filter(|loc| can_move(unit, *loc, state).is_allowed())
        .collect()
}
