//! Drawing the US strike force.
//!
//! US squadrons are drawn blind from a cup that also holds dummy counters.
//! Bombers are drawn until a dummy comes out (a 5 or 6), each real bomber
//! being a torpedo squadron on 1-3 and a dive-bomber squadron on 4-6.
//! Escorts are then drawn until a dummy comes out (4 or better).

use crate::board::{Unit, UnitId, UnitType};
use crate::dice::{Dice, DiceError};

/// Counters of each kind in the cup.
pub const MAX_DRAWS_PER_CUP: usize = 8;

const BOMBER_DUMMY: u8 = 5;
const FIGHTER_DUMMY: u8 = 4;

/// The drawn strike force and the draw narrative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrikeDraw {
    pub units: Vec<Unit>,
    pub messages: Vec<String>,
}

/// Draws the US strike force launched on `turn`.
pub fn draw_us_strike(turn: usize, dice: &mut impl Dice) -> Result<StrikeDraw, DiceError> {
    let mut units = Vec::new();
    let mut messages = vec!["--- Drawing American Strike Force ---".to_string()];

    let mut bombers = 0;
    while bombers < MAX_DRAWS_PER_CUP {
        if dice.d6()? >= BOMBER_DUMMY {
            messages.push("US Bomber draw: Dummy pulled.".to_string());
            break;
        }
        bombers += 1;
        let unit_type = if dice.d6()? <= 3 {
            UnitType::TorpedoBomber
        } else {
            UnitType::DiveBomber
        };
        units.push(Unit::american(UnitId(format!("US-B{}-T{}", bombers, turn)), unit_type));
        messages.push(format!("US Bomber draw: Real unit pulled ({}).", unit_type));
    }

    let mut fighters = 0;
    while fighters < MAX_DRAWS_PER_CUP {
        if dice.d6()? >= FIGHTER_DUMMY {
            messages.push("US Fighter draw: Dummy pulled.".to_string());
            break;
        }
        fighters += 1;
        units.push(Unit::american(
            UnitId(format!("US-F{}-T{}", fighters, turn)),
            UnitType::Fighter,
        ));
        messages.push("US Fighter draw: Real unit pulled (FIGHTER).".to_string());
    }

    if units.is_empty() {
        messages.push("US strike attempt resulted in no units launched.".to_string());
    } else {
        messages.push(format!(
            "US launches strike of {} bombers and {} fighters!",
            bombers, fighters
        ));
    }

    Ok(StrikeDraw { units, messages })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Location, Owner, UnitStatus};
    use crate::dice::ScriptedDice;

    #[test]
    fn dummies_first_means_no_strike() {
        let draw = draw_us_strike(4, &mut ScriptedDice::new([5, 4])).unwrap();
        assert!(draw.units.is_empty());
        assert!(draw.messages.last().unwrap().contains("no units launched"));
    }

    #[test]
    fn mixed_strike_force() {
        // Bomber: real (2) torpedo (1); real (4) dive (6); dummy (6).
        // Fighter: real (1); dummy (4).
        let draw = draw_us_strike(7, &mut ScriptedDice::new([2, 1, 4, 6, 6, 1, 4])).unwrap();
        let types: Vec<UnitType> = draw.units.iter().map(|u| u.unit_type).collect();
        assert_eq!(
            types,
            vec![UnitType::TorpedoBomber, UnitType::DiveBomber, UnitType::Fighter]
        );
        assert_eq!(draw.units[0].id.as_str(), "US-B1-T7");
        assert_eq!(draw.units[2].id.as_str(), "US-F1-T7");
        assert_eq!(draw.units[2].hp, 3);
        assert!(draw.units.iter().all(|u| u.owner == Owner::Us
            && u.status == UnitStatus::InFlight
            && u.location == Location::FleetApproach));
        assert!(draw.messages.last().unwrap().contains("2 bombers and 1 fighters"));
    }

    #[test]
    fn cup_runs_out() {
        let faces = std::iter::repeat(1).take(MAX_DRAWS_PER_CUP * 3);
        let draw = draw_us_strike(9, &mut ScriptedDice::new(faces)).unwrap();
        assert_eq!(draw.units.len(), MAX_DRAWS_PER_CUP * 2);
    }
}
