//! Game state store.
//!
//! [`Game`] owns the current [`GameState`] and the dice, and exposes the
//! player commands. Every command runs against a working copy of the state
//! which is committed only if the command completes. A rejected order leaves
//! the state as it was apart from one "Order rejected" log entry; a dice
//! failure leaves it untouched.

use tracing::{debug, info, warn};

use crate::ai::select_us_target;
use crate::board::{GameState, LogCategory, LogEntry, Location, Owner, Phase, UnitId, UnitStatus};
use crate::dice::{Dice, DiceError, RngDice};
use crate::movegen::{can_move, MoveCheck};
use crate::resolve::{
    advance_phase, calculate_score, draw_us_strike, is_game_over, next_turn, process_turn_track,
    rearm_cap, resolve_american_strike, resolve_japanese_strike, resolve_recon, CombatResult,
    JapaneseTarget, ReconOutcome, ScoreBreakdown, StrikeTarget,
};
use crate::scenario;

/// Errors that abort a command without touching the state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("dice failure: {0}")]
    Dice(#[from] DiceError),

    #[error("unit '{0}' vanished during resolution")]
    UnknownUnit(UnitId),
}

/// Whether a command was carried out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandStatus {
    Applied,
    Rejected(String),
}

/// What a command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub status: CommandStatus,
    /// Log entries written by the command, oldest first.
    pub entries: Vec<LogEntry>,
    /// Per-squadron strike results, in resolution order.
    pub combat: Vec<CombatResult>,
    pub recon: Option<ReconOutcome>,
}

impl CommandOutcome {
    pub fn is_applied(&self) -> bool {
        self.status == CommandStatus::Applied
    }

    pub fn rejection(&self) -> Option<&str> {
        match &self.status {
            CommandStatus::Rejected(reason) => Some(reason),
            CommandStatus::Applied => None,
        }
    }
}

/// Side results gathered while a command runs.
#[derive(Default)]
struct Report {
    combat: Vec<CombatResult>,
    recon: Option<ReconOutcome>,
}

type Step = Result<Result<(), String>, EngineError>;

const GAME_OVER: &str = "the game is over";

/// A game in progress.
pub struct Game<D: Dice = RngDice> {
    state: GameState,
    dice: D,
}

impl Game<RngDice> {
    /// Starts a fresh game. A seed of 0 draws the dice seed from entropy.
    pub fn new(seed: u64) -> Self {
        Game::with_dice(RngDice::from_seed_option(seed))
    }
}

impl<D: Dice> Game<D> {
    /// Starts a fresh game rolling with `dice`.
    pub fn with_dice(dice: D) -> Self {
        Game {
            state: GameState::new(),
            dice,
        }
    }

    /// Resumes from an existing state.
    pub fn from_state(state: GameState, dice: D) -> Self {
        Game { state, dice }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn dice_mut(&mut self) -> &mut D {
        &mut self.dice
    }

    /// Replaces the dice, keeping the state.
    pub fn set_dice(&mut self, dice: D) {
        self.dice = dice;
    }

    pub fn score(&self) -> ScoreBreakdown {
        calculate_score(&self.state)
    }

    /// Runs `command` on a working copy and commits it on success.
    fn run<F>(&mut self, name: &str, command: F) -> Result<CommandOutcome, EngineError>
    where
        F: FnOnce(&mut GameState, &mut D, &mut Report) -> Step,
    {
        let first_id = self.state.log.next_id();
        let mut draft = self.state.clone();
        let mut report = Report::default();

        let status = match command(&mut draft, &mut self.dice, &mut report)? {
            Ok(()) => {
                debug_assert!(
                    draft.validate().is_ok(),
                    "{} broke an invariant: {:?}",
                    name,
                    draft.validate()
                );
                debug!(command = name, turn = draft.turn, phase = %draft.phase, "applied");
                self.state = draft;
                CommandStatus::Applied
            }
            Err(reason) => {
                warn!(command = name, %reason, "order rejected");
                self.state
                    .push_log(format!("Order rejected: {}", reason), LogCategory::System);
                report = Report::default();
                CommandStatus::Rejected(reason)
            }
        };

        let mut entries: Vec<LogEntry> = self
            .state
            .log
            .iter()
            .take_while(|e| e.id >= first_id)
            .cloned()
            .collect();
        entries.reverse();

        Ok(CommandOutcome {
            status,
            entries,
            combat: report.combat,
            recon: report.recon,
        })
    }

    /// Selects a squadron, or clears the selection with `None`.
    pub fn select_unit(&mut self, id: Option<&UnitId>) -> Result<CommandOutcome, EngineError> {
        let id = id.cloned();
        self.run("select", move |state, _, _| {
            if let Some(id) = &id {
                if state.unit(id).is_none() {
                    return Ok(Err(format!("unknown unit '{}'", id)));
                }
            }
            state.selected_unit = id;
            Ok(Ok(()))
        })
    }

    /// Moves a Japanese squadron to `target`.
    pub fn move_unit(&mut self, id: &UnitId, target: Location) -> Result<CommandOutcome, EngineError> {
        self.run("move", |state, _, _| {
            if state.game_over {
                return Ok(Err(GAME_OVER.to_string()));
            }
            let unit = match state.unit(id) {
                Some(u) => u.clone(),
                None => return Ok(Err(format!("unknown unit '{}'", id))),
            };
            if unit.owner != Owner::Japan {
                return Ok(Err("only Japanese squadrons take orders".to_string()));
            }
            match unit.status {
                UnitStatus::Destroyed => return Ok(Err(format!("{} has been destroyed", id))),
                UnitStatus::Returning => {
                    return Ok(Err(format!("{} is still recovering on the turn track", id)))
                }
                _ => {}
            }
            if unit.location == target {
                return Ok(Err(format!("{} is already at {}", id, target)));
            }
            if let MoveCheck::Rejected(reason) = can_move(&unit, target, state) {
                return Ok(Err(reason.to_string()));
            }

            state.lift_unit(id);
            if target == Location::Cap {
                if let Some(carrier) = unit.carrier {
                    state.carrier_mut(carrier).occupy_cap_slot(id.clone());
                }
            }
            state
                .unit_mut(id)
                .ok_or_else(|| EngineError::UnknownUnit(id.clone()))?
                .relocate(target);
            state.push_log(format!("{} moved to {}", id, target), LogCategory::Movement);
            state.selected_unit = None;
            Ok(Ok(()))
        })
    }

    /// Moves to the next phase, running recovery on entering Cleanup and
    /// checking for the end of the game afterwards.
    pub fn advance_phase(&mut self) -> Result<CommandOutcome, EngineError> {
        self.run("advance", |state, _, _| {
            if state.game_over {
                return Ok(Err(GAME_OVER.to_string()));
            }

            let transition = advance_phase(state.phase, state.turn);
            state.turn = next_turn(state.turn, &transition);
            state.phase = transition.next_phase;
            state.recon_resolved = false;
            state.strike_resolved = false;
            for msg in transition.messages {
                state.push_log(msg, LogCategory::System);
            }

            if state.phase == Phase::Cleanup {
                let recovery = process_turn_track(&state.units);
                state.units = recovery.units;
                for msg in recovery.messages {
                    state.push_log(msg, LogCategory::Movement);
                }
                for msg in rearm_cap(&mut state.units) {
                    state.push_log(msg, LogCategory::System);
                }
            }

            if is_game_over(state) {
                let score = calculate_score(state);
                state.game_over = true;
                info!(final_score = score.final_score, rating = %score.rating, "game over");
                state.push_log(
                    format!("Game over: {} (final score {})", score.rating, score.final_score),
                    LogCategory::System,
                );
            }
            Ok(Ok(()))
        })
    }

    /// Flies the search for both sides. Once per Recon phase.
    pub fn perform_recon(&mut self) -> Result<CommandOutcome, EngineError> {
        self.run("recon", |state, dice, report| {
            if state.game_over {
                return Ok(Err(GAME_OVER.to_string()));
            }
            if state.phase != Phase::Recon {
                return Ok(Err("recon is only flown in the Recon phase".to_string()));
            }
            if state.recon_resolved {
                return Ok(Err("recon has already been resolved this phase".to_string()));
            }

            let outcome = resolve_recon(state, dice)?;
            debug!(japan_roll = ?outcome.japan_roll, us_roll = ?outcome.us_roll, "recon");
            state.us_fleet_found |= outcome.us_fleet_found;
            state.japan_fleet_found |= outcome.japan_fleet_found;
            state.recon_resolved = true;
            for msg in &outcome.messages {
                state.push_log(msg.clone(), LogCategory::Recon);
            }
            report.recon = Some(outcome);
            Ok(Ok(()))
        })
    }

    /// Commits the Japanese strike: squadrons on Staging attack the US task
    /// force, squadrons flying to Midway attack the island.
    pub fn resolve_strikes(&mut self) -> Result<CommandOutcome, EngineError> {
        self.run("strike", |state, dice, report| {
            if state.game_over {
                return Ok(Err(GAME_OVER.to_string()));
            }
            if state.phase != Phase::Japanese {
                return Ok(Err("strikes are committed in the Japanese phase".to_string()));
            }
            if state.strike_resolved {
                return Ok(Err("strikes have already been committed this phase".to_string()));
            }

            let attackers: Vec<(UnitId, JapaneseTarget)> = state
                .units
                .iter()
                .filter(|u| u.owner == Owner::Japan)
                .filter_map(|u| match u.location {
                    Location::Staging => Some((u.id.clone(), JapaneseTarget::UsTaskForce)),
                    Location::MidwayFlight => Some((u.id.clone(), JapaneseTarget::Midway)),
                    _ => None,
                })
                .collect();
            if attackers.is_empty() {
                return Ok(Err("no squadrons are staged or in flight".to_string()));
            }

            state.push_log("--- Japanese strike launched ---", LogCategory::Combat);
            for (id, target) in attackers {
                let unit = state
                    .unit(&id)
                    .cloned()
                    .ok_or_else(|| EngineError::UnknownUnit(id.clone()))?;
                let result = resolve_japanese_strike(&unit, target, state, dice)?;
                debug!(unit = %id, rolls = ?result.rolls, hits = result.hits, "japanese strike");
                apply_outcome(state, &result)?;
                match target {
                    JapaneseTarget::Midway => state.midway_damage += result.hits,
                    JapaneseTarget::UsTaskForce => state.us_task_force_hits += result.hits,
                }
                state.push_log(describe(&result), LogCategory::Combat);
                report.combat.push(result);
            }
            state.strike_resolved = true;
            Ok(Ok(()))
        })
    }

    /// Draws and resolves the US strike against the Kido Butai.
    pub fn perform_american_strike(&mut self) -> Result<CommandOutcome, EngineError> {
        self.run("usstrike", |state, dice, report| {
            if state.game_over {
                return Ok(Err(GAME_OVER.to_string()));
            }
            if state.phase != Phase::American {
                return Ok(Err("US strikes only launch in the American phase".to_string()));
            }
            if state.strike_resolved {
                return Ok(Err("the US strike has already been resolved this phase".to_string()));
            }

            let draw = draw_us_strike(state.turn, dice)?;
            for msg in draw.messages {
                state.push_log(msg, LogCategory::Combat);
            }
            let attackers: Vec<UnitId> = draw.units.iter().map(|u| u.id.clone()).collect();
            state.units.extend(draw.units);

            for id in attackers {
                let choice = match select_us_target(state, dice)? {
                    Some(c) => c,
                    None => {
                        state.push_log("No Japanese carriers remain afloat.", LogCategory::Combat);
                        break;
                    }
                };
                state.push_log(
                    format!("{} targets {} ({})", id, choice.carrier, choice.reason),
                    LogCategory::Combat,
                );

                let unit = state
                    .unit(&id)
                    .cloned()
                    .ok_or_else(|| EngineError::UnknownUnit(id.clone()))?;
                let result = resolve_american_strike(&unit, choice.carrier, state, dice)?;
                debug!(unit = %id, target = %choice.carrier, rolls = ?result.rolls, hits = result.hits, "us strike");

                if let Some(cap) = &result.exhausted_cap {
                    if let Some(fighter) = state.unit_mut(cap) {
                        fighter.status = UnitStatus::CapLow;
                    }
                    state.push_log(
                        format!("{} drawn down by the torpedo attack; CAP readiness LOW.", cap),
                        LogCategory::Combat,
                    );
                }
                apply_outcome(state, &result)?;
                state.push_log(describe(&result), LogCategory::Combat);

                if result.hits > 0 {
                    let (taken, sunk_now) = state.damage_carrier(choice.carrier, result.hits);
                    if taken > 0 {
                        state.push_log(
                            format!(
                                "{} takes {} damage ({}/4).",
                                choice.carrier,
                                taken,
                                state.carrier(choice.carrier).damage()
                            ),
                            LogCategory::Combat,
                        );
                    }
                    if sunk_now {
                        info!(carrier = %choice.carrier, turn = state.turn, "carrier sunk");
                        state.push_log(
                            format!("CRITICAL: {} is sinking!", choice.carrier),
                            LogCategory::Combat,
                        );
                    }
                }
                report.combat.push(result);
            }

            state
                .units
                .retain(|u| u.owner == Owner::Japan || u.is_destroyed());
            state.strike_resolved = true;
            Ok(Ok(()))
        })
    }

    /// Replaces the game with the named scenario's opening position.
    pub fn load_scenario(&mut self, id: &str) -> Result<CommandOutcome, EngineError> {
        self.run("scenario", |state, _, _| {
            let scenario = match scenario::find(id) {
                Some(s) => s,
                None => return Ok(Err(format!("unknown scenario '{}'", id))),
            };
            let next_id = state.log.next_id();
            *state = scenario.build();
            state.log.rebase(next_id);
            info!(scenario = scenario.id, "scenario loaded");
            Ok(Ok(()))
        })
    }

    /// Starts over from the 04:30 position.
    pub fn reset_game(&mut self) -> Result<CommandOutcome, EngineError> {
        self.run("reset", |state, _, _| {
            let next_id = state.log.next_id();
            *state = GameState::new();
            state.log.rebase(next_id);
            Ok(Ok(()))
        })
    }

    /// Replaces the state wholesale, as when loading a saved game.
    pub fn restore(&mut self, saved: GameState) -> Result<CommandOutcome, EngineError> {
        self.run("load", move |state, _, _| {
            if let Err(violation) = saved.validate() {
                return Ok(Err(format!("saved game is inconsistent: {}", violation)));
            }
            let next_id = state.log.next_id();
            *state = saved;
            state.log.rebase(next_id);
            state.push_log("Saved game restored", LogCategory::System);
            Ok(Ok(()))
        })
    }
}

/// Moves a squadron after its attack: destroyed ones to the pool, the rest
/// onto the turn track.
fn apply_outcome(state: &mut GameState, result: &CombatResult) -> Result<(), EngineError> {
    let unit = state
        .unit_mut(&result.attacker)
        .ok_or_else(|| EngineError::UnknownUnit(result.attacker.clone()))?;
    if result.destroyed {
        unit.destroy();
    } else {
        unit.relocate(Location::TurnTrack);
    }
    Ok(())
}

/// One-line log text for a strike result.
fn describe(result: &CombatResult) -> String {
    let target = match result.target {
        StrikeTarget::UsTaskForce => "the US Task Force".to_string(),
        StrikeTarget::Midway => "Midway".to_string(),
        StrikeTarget::Carrier(c) => c.to_string(),
    };
    if result.destroyed {
        format!("{} shot down attacking {}.", result.attacker, target)
    } else if result.aborted {
        format!("{} turned back short of {}.", result.attacker, target)
    } else if result.hits == 0 {
        format!("{} attacks {}: no hits.", result.attacker, target)
    } else {
        format!("{} attacks {}: {} hit(s)!", result.attacker, target, result.hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Carrier, ALL_CARRIERS};
    use crate::dice::ScriptedDice;

    fn game(faces: impl IntoIterator<Item = u8>) -> Game<ScriptedDice> {
        Game::with_dice(ScriptedDice::new(faces))
    }

    fn idle() -> Game<ScriptedDice> {
        Game::with_dice(ScriptedDice::default())
    }

    fn id(s: &str) -> UnitId {
        UnitId::from(s)
    }

    #[test]
    fn move_to_cap_occupies_slot() {
        let mut g = idle();
        g.select_unit(Some(&id("AKAGI-F"))).unwrap();
        let out = g.move_unit(&id("AKAGI-F"), Location::Cap).unwrap();
        assert!(out.is_applied());
        assert_eq!(out.entries.len(), 1);
        assert_eq!(out.entries[0].category, LogCategory::Movement);
        let unit = g.state().unit(&id("AKAGI-F")).unwrap();
        assert_eq!(unit.status, UnitStatus::CapNormal);
        assert_eq!(g.state().carrier(Carrier::Akagi).cap_slots[0], Some(id("AKAGI-F")));
        assert_eq!(g.state().selected_unit, None);

        // And back off again.
        g.move_unit(&id("AKAGI-F"), Location::Carrier(Carrier::Akagi)).unwrap();
        assert_eq!(g.state().carrier(Carrier::Akagi).free_cap_slot(), Some(0));
        assert_eq!(g.state().unit(&id("AKAGI-F")).unwrap().status, UnitStatus::Ready);
    }

    #[test]
    fn rejected_move_only_logs() {
        let mut g = idle();
        let before = g.state().clone();
        let out = g.move_unit(&id("KAGA-DB"), Location::Staging).unwrap();
        assert_eq!(
            out.rejection(),
            Some("the US fleet must be found before staging a strike")
        );
        assert_eq!(out.entries.len(), 1);
        assert!(out.entries[0].message.starts_with("Order rejected:"));
        assert_eq!(g.state().units, before.units);
        assert_eq!(g.state().log.len(), before.log.len() + 1);
    }

    #[test]
    fn store_level_move_checks() {
        let mut g = idle();
        let out = g.move_unit(&id("NOPE"), Location::Cap).unwrap();
        assert_eq!(out.rejection(), Some("unknown unit 'NOPE'"));
        let out = g
            .move_unit(&id("HIRYU-TB"), Location::Carrier(Carrier::Hiryu))
            .unwrap();
        assert!(out.rejection().unwrap().contains("already at"));
    }

    #[test]
    fn recon_once_per_phase() {
        let mut g = game([6, 2]);
        g.advance_phase().unwrap();
        let out = g.perform_recon().unwrap();
        assert!(out.is_applied());
        assert!(g.state().us_fleet_found);
        assert!(!g.state().japan_fleet_found);
        assert_eq!(out.recon.unwrap().japan_roll, Some(6));

        let snapshot = g.state().clone();
        let out = g.perform_recon().unwrap();
        assert!(!out.is_applied());
        assert_eq!(g.state().units, snapshot.units);
        assert!(g.state().us_fleet_found);
    }

    #[test]
    fn dice_failure_changes_nothing() {
        let mut g = idle();
        g.advance_phase().unwrap();
        let before = g.state().clone();
        let err = g.perform_recon().unwrap_err();
        assert_eq!(err, EngineError::Dice(DiceError::Exhausted(0)));
        assert_eq!(g.state(), &before);
    }

    #[test]
    fn midway_strike_scores_and_returns() {
        let mut g = game([2, 4]);
        g.move_unit(&id("AKAGI-DB"), Location::MidwayFlight).unwrap();
        let out = g.resolve_strikes().unwrap();
        assert!(out.is_applied());
        assert_eq!(out.combat.len(), 1);
        assert_eq!(g.state().midway_damage, 4);
        let unit = g.state().unit(&id("AKAGI-DB")).unwrap();
        assert_eq!(unit.status, UnitStatus::Returning);
        assert_eq!(unit.turns_until_ready, Some(3));

        let out = g.resolve_strikes().unwrap();
        assert!(!out.is_applied());
    }

    #[test]
    fn american_strike_sinks_and_discards_survivors() {
        let mut state = GameState::new();
        state.turn = 4;
        state.phase = Phase::American;
        let mut g = Game::from_state(state, ScriptedDice::default());
        // Draw: one dive bomber (2, 6), bomber dummy (6), fighter dummy (5).
        // Target noise: Akagi 1, Kaga 1, Hiryu 1, Soryu 1 -> Akagi.
        // Attack: AA 1, unopposed 6 pips -> sinks Akagi.
        g.dice_mut().extend([2, 6, 6, 5, 1, 1, 1, 1, 1, 6]);
        let out = g.perform_american_strike().unwrap();
        assert!(out.is_applied());
        assert_eq!(out.combat.len(), 1);
        assert_eq!(out.combat[0].target, StrikeTarget::Carrier(Carrier::Akagi));
        assert!(g.state().carrier(Carrier::Akagi).is_sunk());
        assert!(out
            .entries
            .iter()
            .any(|e| e.message == "CRITICAL: AKAGI is sinking!"));
        assert!(g.state().units.iter().all(|u| u.owner == Owner::Japan));
        assert_eq!(g.state().destroyed_count(Owner::Japan), 3);
    }

    #[test]
    fn torpedo_attack_exhausts_cap() {
        let mut g = idle();
        g.move_unit(&id("SORYU-F"), Location::Cap).unwrap();
        for c in [Carrier::Akagi, Carrier::Kaga, Carrier::Hiryu] {
            let f = UnitId(format!("{}-F", c));
            g.move_unit(&f, Location::Cap).unwrap();
        }
        let mut state = g.state().clone();
        state.turn = 3;
        state.phase = Phase::American;
        let mut g = Game::from_state(state, ScriptedDice::default());
        // Torpedo bomber (1, 1), dummies (5, 4); noise favours Soryu; CAP roll 6 kills it.
        g.dice_mut().extend([1, 1, 5, 4, 1, 1, 1, 20, 6]);
        let out = g.perform_american_strike().unwrap();
        assert!(out.combat[0].destroyed);
        assert_eq!(
            g.state().unit(&id("SORYU-F")).unwrap().status,
            UnitStatus::CapLow
        );
        assert_eq!(g.state().destroyed_count(Owner::Us), 1);
    }

    #[test]
    fn cleanup_recovers_turn_track() {
        let mut g = game([1, 3]);
        g.move_unit(&id("KAGA-DB"), Location::MidwayFlight).unwrap();
        g.resolve_strikes().unwrap();
        for _ in 0..12 {
            if g.state().unit(&id("KAGA-DB")).unwrap().status == UnitStatus::Ready {
                break;
            }
            g.advance_phase().unwrap();
        }
        let unit = g.state().unit(&id("KAGA-DB")).unwrap();
        assert_eq!(unit.location, Location::Carrier(Carrier::Kaga));
        assert_eq!(g.state().turn, 2);
        assert_eq!(g.state().phase, Phase::Cleanup);
    }

    #[test]
    fn game_over_is_sticky() {
        let mut state = GameState::new();
        for c in ALL_CARRIERS {
            state.damage_carrier(c, 4);
        }
        state.phase = Phase::American;
        let mut g = Game::from_state(state, ScriptedDice::default());
        let out = g.advance_phase().unwrap();
        assert!(out.is_applied());
        assert!(g.state().game_over);
        assert!(!g.advance_phase().unwrap().is_applied());
        assert!(g.select_unit(None).unwrap().is_applied());

        g.reset_game().unwrap();
        assert!(!g.state().game_over);
    }

    #[test]
    fn log_ids_survive_reset() {
        let mut g = idle();
        g.advance_phase().unwrap();
        let before = g.state().log.next_id();
        let out = g.load_scenario("HIRYU_REVENGE").unwrap();
        assert!(out.is_applied());
        assert!(out.entries.iter().all(|e| e.id >= before));
        assert_eq!(out.entries.len(), 3);
        assert_eq!(g.state().turn, 10);

        let out = g.load_scenario("MIDWAY_AGAIN").unwrap();
        assert_eq!(out.rejection(), Some("unknown scenario 'MIDWAY_AGAIN'"));
    }
}
