//! US strike target selection.
//!
//! Each squadron in a US strike picks the carrier that looks most attractive
//! right now: badly damaged ships, thin CAP, and the flagship all draw fire,
//! with a random fog-of-war term on top. Selection is re-run for every
//! squadron so a carrier sunk earlier in the strike is never picked again.

use crate::board::{Carrier, GameState, FLAGSHIP};
use crate::dice::{Dice, DiceError};

const CRITICAL_DAMAGE_BONUS: u32 = 50;
const DAMAGED_BONUS: u32 = 20;
const NO_CAP_BONUS: u32 = 40;
const WEAK_CAP_BONUS: u32 = 25;
const LIGHT_CAP_BONUS: u32 = 10;
const FLAGSHIP_BONUS: u32 = 5;
/// Fog-of-war noise is uniform in `0..FOG_OF_WAR`.
const FOG_OF_WAR: u8 = 20;

/// The carrier a US squadron goes after, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetChoice {
    pub carrier: Carrier,
    pub score: u32,
    pub reason: String,
}

/// Attractiveness of `carrier` before fog of war, with the reasons behind it.
pub fn base_score(state: &GameState, carrier: Carrier) -> (u32, Vec<&'static str>) {
    let mut score = 0;
    let mut reasons = Vec::new();

    let damage = state.carrier(carrier).damage();
    if damage >= 3 {
        score += CRITICAL_DAMAGE_BONUS;
        reasons.push("CRITICAL DAMAGE");
    } else if damage > 0 {
        score += DAMAGED_BONUS;
        reasons.push("DAMAGED");
    }

    let (normal, low) = state.cap_strength(carrier);
    if normal == 0 && low == 0 {
        score += NO_CAP_BONUS;
        reasons.push("NO CAP");
    } else if normal == 0 {
        score += WEAK_CAP_BONUS;
        reasons.push("WEAK CAP");
    } else if normal < 2 {
        score += LIGHT_CAP_BONUS;
    }

    if carrier == FLAGSHIP {
        score += FLAGSHIP_BONUS;
    }

    (score, reasons)
}

/// Picks the target for one US squadron, or `None` if every carrier is sunk.
///
/// One noise roll is made per active carrier, in board order. Exact ties go
/// to the earlier carrier.
pub fn select_us_target(
    state: &GameState,
    dice: &mut impl Dice,
) -> Result<Option<TargetChoice>, DiceError> {
    let mut best: Option<TargetChoice> = None;

    for carrier in state.active_carriers() {
        let (base, reasons) = base_score(state, carrier);
        let noise = (dice.roll(FOG_OF_WAR)? - 1) as u32;
        let score = base + noise;
        if best.as_ref().map_or(true, |b| score > b.score) {
            let reason = if reasons.is_empty() {
                "OPPORTUNITY".to_string()
            } else {
                reasons.join(", ")
            };
            best = Some(TargetChoice { carrier, score, reason });
        }
    }

    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Location, UnitId, UnitStatus, ALL_CARRIERS};
    use crate::dice::ScriptedDice;

    fn fly_cap(state: &mut GameState, id: &str, status: UnitStatus) {
        let id = UnitId::from(id);
        let carrier = state.unit(&id).unwrap().carrier.unwrap();
        state.carrier_mut(carrier).occupy_cap_slot(id.clone());
        let u = state.unit_mut(&id).unwrap();
        u.relocate(Location::Cap);
        u.status = status;
    }

    #[test]
    fn base_scores_on_fresh_board() {
        let state = GameState::new();
        assert_eq!(base_score(&state, Carrier::Akagi), (45, vec!["NO CAP"]));
        assert_eq!(base_score(&state, Carrier::Kaga), (40, vec!["NO CAP"]));
    }

    #[test]
    fn damage_and_cap_modifiers() {
        let mut state = GameState::new();
        state.damage_carrier(Carrier::Kaga, 3);
        fly_cap(&mut state, "KAGA-F", UnitStatus::CapNormal);
        assert_eq!(base_score(&state, Carrier::Kaga), (60, vec!["CRITICAL DAMAGE"]));

        state.damage_carrier(Carrier::Hiryu, 1);
        fly_cap(&mut state, "HIRYU-F", UnitStatus::CapLow);
        assert_eq!(base_score(&state, Carrier::Hiryu), (45, vec!["DAMAGED", "WEAK CAP"]));
    }

    #[test]
    fn flagship_wins_even_noise() {
        let state = GameState::new();
        let choice = select_us_target(&state, &mut ScriptedDice::new([1, 1, 1, 1]))
            .unwrap()
            .unwrap();
        assert_eq!(choice.carrier, Carrier::Akagi);
        assert_eq!(choice.score, 45);
        assert_eq!(choice.reason, "NO CAP");
    }

    #[test]
    fn noise_can_swing_the_choice() {
        let state = GameState::new();
        let choice = select_us_target(&state, &mut ScriptedDice::new([1, 1, 20, 1]))
            .unwrap()
            .unwrap();
        assert_eq!(choice.carrier, Carrier::Hiryu);
        assert_eq!(choice.score, 59);
    }

    #[test]
    fn sunk_carriers_are_never_targeted() {
        let mut state = GameState::new();
        state.damage_carrier(Carrier::Akagi, 4);
        state.damage_carrier(Carrier::Kaga, 4);
        state.damage_carrier(Carrier::Soryu, 4);
        let mut dice = ScriptedDice::new([20]);
        let choice = select_us_target(&state, &mut dice).unwrap().unwrap();
        assert_eq!(choice.carrier, Carrier::Hiryu);
        assert_eq!(dice.remaining(), 0);
    }

    #[test]
    fn no_targets_when_all_sunk() {
        let mut state = GameState::new();
        for c in ALL_CARRIERS {
            state.damage_carrier(c, 4);
        }
        assert_eq!(select_us_target(&state, &mut ScriptedDice::default()).unwrap(), None);
    }
}
