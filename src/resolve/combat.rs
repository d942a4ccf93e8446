//! Air strike resolution.
//!
//! Both strike directions run the same three steps against a snapshot of the
//! state: CAP interception, anti-aircraft fire, then the attack roll. Each
//! step may stop the squadron. Nothing here mutates state; the store applies
//! the returned [`CombatResult`].
//!
//! An attack that meets no CAP at all is unopposed and scores hits equal to
//! the pips rolled. An opposed attack scores at most one hit.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Carrier, GameState, Unit, UnitId, UnitStatus, UnitType};
use crate::dice::{Dice, DiceError};

/// US CAP kills a Japanese fighter on this roll or better.
const US_CAP_KILLS_FIGHTER: u8 = 6;
/// Japanese CAP kills a US fighter on this roll or better.
const JAPANESE_CAP_KILLS_FIGHTER: u8 = 5;
/// Either side's CAP kills a bomber on this roll or better.
const CAP_KILLS_BOMBER: u8 = 5;
/// Either side's CAP turns a bomber back on this roll or better.
const CAP_TURNS_BACK_BOMBER: u8 = 3;
/// US task-force AA turns a Japanese bomber back on this roll or better.
const US_AA_ABORT: u8 = 5;
/// Japanese fleet AA turns a US bomber back on this roll or better.
const JAPANESE_AA_ABORT: u8 = 6;

/// Targets a Japanese strike can be sent against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JapaneseTarget {
    UsTaskForce,
    Midway,
}

/// Anything a strike can hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrikeTarget {
    UsTaskForce,
    Midway,
    Carrier(Carrier),
}

impl From<JapaneseTarget> for StrikeTarget {
    fn from(t: JapaneseTarget) -> Self {
        match t {
            JapaneseTarget::UsTaskForce => StrikeTarget::UsTaskForce,
            JapaneseTarget::Midway => StrikeTarget::Midway,
        }
    }
}

impl fmt::Display for StrikeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrikeTarget::UsTaskForce => f.write_str("US_TF"),
            StrikeTarget::Midway => f.write_str("MIDWAY"),
            StrikeTarget::Carrier(c) => write!(f, "{}", c),
        }
    }
}

/// Outcome of one squadron's attack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatResult {
    pub attacker: UnitId,
    pub unit_type: UnitType,
    pub target: StrikeTarget,
    /// Every die rolled, in order.
    pub rolls: Vec<u8>,
    pub hits: u32,
    pub aborted: bool,
    pub destroyed: bool,
    /// True if defending CAP engaged the attacker.
    pub cap_engaged: bool,
    /// CAP fighter worn down to low readiness by this attack, if any.
    pub exhausted_cap: Option<UnitId>,
}

impl CombatResult {
    fn new(unit: &Unit, target: StrikeTarget) -> Self {
        CombatResult {
            attacker: unit.id.clone(),
            unit_type: unit.unit_type,
            target,
            rolls: Vec::with_capacity(3),
            hits: 0,
            aborted: false,
            destroyed: false,
            cap_engaged: false,
            exhausted_cap: None,
        }
    }

    /// True if the squadron survived to return to the turn track.
    pub fn survived(&self) -> bool {
        !self.destroyed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interception {
    Destroyed,
    Aborted,
    Through,
}

fn intercept(unit_type: UnitType, roll: u8, fighter_kill: u8) -> Interception {
    match unit_type {
        UnitType::Fighter if roll >= fighter_kill => Interception::Destroyed,
        UnitType::Fighter => Interception::Through,
        _ if roll >= CAP_KILLS_BOMBER => Interception::Destroyed,
        _ if roll >= CAP_TURNS_BACK_BOMBER => Interception::Aborted,
        _ => Interception::Through,
    }
}

/// Runs the interception roll and records it. Returns true if the squadron
/// is stopped.
fn run_interception(
    result: &mut CombatResult,
    dice: &mut impl Dice,
    fighter_kill: u8,
) -> Result<bool, DiceError> {
    let roll = dice.d6()?;
    result.rolls.push(roll);
    match intercept(result.unit_type, roll, fighter_kill) {
        Interception::Destroyed => {
            result.destroyed = true;
            Ok(true)
        }
        Interception::Aborted => {
            result.aborted = true;
            Ok(true)
        }
        Interception::Through => Ok(false),
    }
}

/// Runs the AA roll and records it. Fighters are never turned back by flak.
fn run_aa(result: &mut CombatResult, dice: &mut impl Dice, abort_on: u8) -> Result<bool, DiceError> {
    let roll = dice.d6()?;
    result.rolls.push(roll);
    if result.unit_type.is_bomber() && roll >= abort_on {
        result.aborted = true;
        return Ok(true);
    }
    Ok(false)
}

/// Resolves one Japanese squadron attacking the US task force or Midway.
pub fn resolve_japanese_strike(
    unit: &Unit,
    target: JapaneseTarget,
    state: &GameState,
    dice: &mut impl Dice,
) -> Result<CombatResult, DiceError> {
    let mut result = CombatResult::new(unit, target.into());

    if target == JapaneseTarget::UsTaskForce && state.us_fleet_found {
        result.cap_engaged = true;
        if run_interception(&mut result, dice, US_CAP_KILLS_FIGHTER)? {
            return Ok(result);
        }
    }

    if run_aa(&mut result, dice, US_AA_ABORT)? {
        return Ok(result);
    }

    let roll = dice.d6()?;
    result.rolls.push(roll);
    result.hits = match target {
        JapaneseTarget::Midway => roll as u32,
        JapaneseTarget::UsTaskForce => {
            let needed = match unit.unit_type {
                UnitType::Fighter => 5,
                UnitType::DiveBomber => 6,
                UnitType::TorpedoBomber => 5,
            };
            (roll >= needed) as u32
        }
    };

    Ok(result)
}

/// True if `carrier`'s CAP will engage an attacker of `unit_type`.
///
/// Low-readiness CAP cannot climb fast enough to catch dive bombers.
pub fn cap_engages(state: &GameState, carrier: Carrier, unit_type: UnitType) -> bool {
    let (normal, low) = state.cap_strength(carrier);
    normal > 0 || (low > 0 && unit_type != UnitType::DiveBomber)
}

/// Resolves one US squadron attacking a Japanese carrier.
pub fn resolve_american_strike(
    unit: &Unit,
    carrier: Carrier,
    state: &GameState,
    dice: &mut impl Dice,
) -> Result<CombatResult, DiceError> {
    let mut result = CombatResult::new(unit, StrikeTarget::Carrier(carrier));
    result.cap_engaged = cap_engages(state, carrier, unit.unit_type);

    if result.cap_engaged {
        if unit.unit_type == UnitType::TorpedoBomber {
            result.exhausted_cap = state
                .carrier(carrier)
                .cap_units()
                .find(|id| state.unit(id).map(|u| u.status) == Some(UnitStatus::CapNormal))
                .cloned();
        }
        if run_interception(&mut result, dice, JAPANESE_CAP_KILLS_FIGHTER)? {
            return Ok(result);
        }
    }

    if run_aa(&mut result, dice, JAPANESE_AA_ABORT)? {
        return Ok(result);
    }

    let roll = dice.d6()?;
    result.rolls.push(roll);
    result.hits = if !result.cap_engaged {
        roll as u32
    } else {
        match unit.unit_type {
            UnitType::DiveBomber => (roll >= 6) as u32,
            UnitType::TorpedoBomber => (roll >= 5) as u32,
            UnitType::Fighter => 0,
        }
    };

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Location, Owner};
    use crate::dice::ScriptedDice;

    fn jp(state: &GameState, id: &str) -> Unit {
        state.unit(&UnitId::from(id)).unwrap().clone()
    }

    fn us(unit_type: UnitType) -> Unit {
        Unit::american(UnitId::from("US-X"), unit_type)
    }

    fn put_on_cap(state: &mut GameState, id: &str, status: UnitStatus) {
        let id = UnitId::from(id);
        let carrier = state.unit(&id).unwrap().carrier.unwrap();
        state.carrier_mut(carrier).occupy_cap_slot(id.clone());
        let u = state.unit_mut(&id).unwrap();
        u.relocate(Location::Cap);
        u.status = status;
    }

    fn found() -> GameState {
        let mut state = GameState::new();
        state.us_fleet_found = true;
        state
    }

    #[test]
    fn unopposed_midway_strike_scores_pips() {
        let state = GameState::new();
        let db = jp(&state, "AKAGI-DB");
        let r = resolve_japanese_strike(&db, JapaneseTarget::Midway, &state, &mut ScriptedDice::new([2, 4]))
            .unwrap();
        assert_eq!(r.rolls, vec![2, 4]);
        assert_eq!(r.hits, 4);
        assert!(!r.aborted && !r.destroyed && !r.cap_engaged);
    }

    #[test]
    fn midway_aa_turns_bombers_back() {
        let state = GameState::new();
        let db = jp(&state, "KAGA-DB");
        let r = resolve_japanese_strike(&db, JapaneseTarget::Midway, &state, &mut ScriptedDice::new([5]))
            .unwrap();
        assert!(r.aborted);
        assert_eq!(r.hits, 0);
        assert_eq!(r.rolls, vec![5]);
    }

    #[test]
    fn fighters_ignore_aa() {
        let state = GameState::new();
        let f = jp(&state, "KAGA-F");
        let r = resolve_japanese_strike(&f, JapaneseTarget::Midway, &state, &mut ScriptedDice::new([6, 3]))
            .unwrap();
        assert!(!r.aborted);
        assert_eq!(r.hits, 3);
    }

    #[test]
    fn us_cap_interception_outcomes() {
        let state = found();
        let tb = jp(&state, "HIRYU-TB");

        let r = resolve_japanese_strike(&tb, JapaneseTarget::UsTaskForce, &state, &mut ScriptedDice::new([5]))
            .unwrap();
        assert!(r.destroyed);
        assert_eq!(r.rolls.len(), 1);

        let r = resolve_japanese_strike(&tb, JapaneseTarget::UsTaskForce, &state, &mut ScriptedDice::new([3]))
            .unwrap();
        assert!(r.aborted && !r.destroyed);

        let f = jp(&state, "HIRYU-F");
        let r = resolve_japanese_strike(&f, JapaneseTarget::UsTaskForce, &state, &mut ScriptedDice::new([5, 1, 5]))
            .unwrap();
        assert!(!r.destroyed);
        assert_eq!(r.hits, 1);
        let r = resolve_japanese_strike(&f, JapaneseTarget::UsTaskForce, &state, &mut ScriptedDice::new([6]))
            .unwrap();
        assert!(r.destroyed);
    }

    #[test]
    fn opposed_task_force_hits_are_binary() {
        let state = found();
        let db = jp(&state, "SORYU-DB");
        let r = resolve_japanese_strike(&db, JapaneseTarget::UsTaskForce, &state, &mut ScriptedDice::new([1, 1, 5]))
            .unwrap();
        assert_eq!(r.hits, 0);
        let r = resolve_japanese_strike(&db, JapaneseTarget::UsTaskForce, &state, &mut ScriptedDice::new([1, 1, 6]))
            .unwrap();
        assert_eq!(r.hits, 1);

        let tb = jp(&state, "SORYU-TB");
        let r = resolve_japanese_strike(&tb, JapaneseTarget::UsTaskForce, &state, &mut ScriptedDice::new([2, 4, 5]))
            .unwrap();
        assert_eq!(r.hits, 1);
        assert_eq!(r.rolls, vec![2, 4, 5]);
    }

    #[test]
    fn unopposed_carrier_strike_scores_pips() {
        let state = GameState::new();
        let r = resolve_american_strike(&us(UnitType::DiveBomber), Carrier::Kaga, &state, &mut ScriptedDice::new([5, 3]))
            .unwrap();
        assert!(!r.cap_engaged);
        assert_eq!(r.hits, 3);
        assert_eq!(r.rolls.len(), 2);
    }

    #[test]
    fn japanese_aa_needs_a_six() {
        let state = GameState::new();
        let r = resolve_american_strike(&us(UnitType::TorpedoBomber), Carrier::Kaga, &state, &mut ScriptedDice::new([6]))
            .unwrap();
        assert!(r.aborted);
        assert_eq!(r.hits, 0);
    }

    #[test]
    fn low_cap_cannot_catch_dive_bombers() {
        let mut state = GameState::new();
        put_on_cap(&mut state, "AKAGI-F", UnitStatus::CapLow);
        assert!(!cap_engages(&state, Carrier::Akagi, UnitType::DiveBomber));
        assert!(cap_engages(&state, Carrier::Akagi, UnitType::TorpedoBomber));
        assert!(cap_engages(&state, Carrier::Akagi, UnitType::Fighter));

        // The dive bomber sees no CAP and gets the unopposed pips.
        let r = resolve_american_strike(&us(UnitType::DiveBomber), Carrier::Akagi, &state, &mut ScriptedDice::new([1, 4]))
            .unwrap();
        assert!(!r.cap_engaged);
        assert_eq!(r.hits, 4);
    }

    #[test]
    fn opposed_carrier_strike_is_binary() {
        let mut state = GameState::new();
        put_on_cap(&mut state, "HIRYU-F", UnitStatus::CapNormal);
        let r = resolve_american_strike(&us(UnitType::DiveBomber), Carrier::Hiryu, &state, &mut ScriptedDice::new([1, 1, 6]))
            .unwrap();
        assert!(r.cap_engaged);
        assert_eq!(r.hits, 1);
        let r = resolve_american_strike(&us(UnitType::Fighter), Carrier::Hiryu, &state, &mut ScriptedDice::new([4, 1, 6]))
            .unwrap();
        assert_eq!(r.hits, 0);
        let r = resolve_american_strike(&us(UnitType::Fighter), Carrier::Hiryu, &state, &mut ScriptedDice::new([5]))
            .unwrap();
        assert!(r.destroyed);
    }

    #[test]
    fn torpedo_run_exhausts_cap_even_when_shot_down() {
        let mut state = GameState::new();
        put_on_cap(&mut state, "SORYU-F", UnitStatus::CapNormal);
        let r = resolve_american_strike(&us(UnitType::TorpedoBomber), Carrier::Soryu, &state, &mut ScriptedDice::new([6]))
            .unwrap();
        assert!(r.destroyed);
        assert_eq!(r.exhausted_cap, Some(UnitId::from("SORYU-F")));
    }

    #[test]
    fn torpedo_run_against_low_cap_exhausts_nothing() {
        let mut state = GameState::new();
        put_on_cap(&mut state, "SORYU-F", UnitStatus::CapLow);
        let r = resolve_american_strike(&us(UnitType::TorpedoBomber), Carrier::Soryu, &state, &mut ScriptedDice::new([1, 1, 5]))
            .unwrap();
        assert!(r.cap_engaged);
        assert_eq!(r.exhausted_cap, None);
        assert_eq!(r.hits, 1);
    }

    #[test]
    fn exhausted_dice_fail_the_strike() {
        let state = GameState::new();
        let u = us(UnitType::DiveBomber);
        assert_eq!(u.owner, Owner::Us);
        let err = resolve_american_strike(&u, Carrier::Akagi, &state, &mut ScriptedDice::new([2])).unwrap_err();
        assert_eq!(err, DiceError::Exhausted(1));
    }
}
