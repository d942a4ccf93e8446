//! Game state representation.
//!
//! Holds the complete snapshot of a game at a point in time: the turn clock,
//! phase, carrier damage, every squadron counter, search results, and the
//! game log.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::carrier::{Carrier, CarrierState, ALL_CARRIERS, CARRIER_COUNT, SINKING_DAMAGE};
use super::log::{GameLog, LogCategory, LogEntry};
use super::unit::{Location, Owner, Unit, UnitId, UnitStatus, UnitType};

/// Number of turns in a game.
pub const TURN_COUNT: usize = 16;

/// Index of the last turn.
pub const FINAL_TURN: usize = TURN_COUNT - 1;

/// Game-clock label for each turn.
pub const TURN_LABELS: [&str; TURN_COUNT] = [
    "04:30", "05:30", "06:30", "07:30", "08:30", "09:30", "10:30", "11:30", "12:30", "13:30",
    "14:30", "15:30", "16:30", "17:30", "18:30", "19:30",
];

/// The phase within a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Japanese,
    Recon,
    American,
    Cleanup,
}

/// Phases in turn order.
pub const ALL_PHASES: [Phase; 4] = [Phase::Japanese, Phase::Recon, Phase::American, Phase::Cleanup];

impl Phase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::Japanese => "JAPANESE",
            Phase::Recon => "RECON",
            Phase::American => "AMERICAN",
            Phase::Cleanup => "CLEANUP",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A broken state invariant. Seeing one means a rules bug, not a bad order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("turn index {0} out of range")]
    TurnOutOfRange(usize),

    #[error("carrier {0} has damage {1} above the sinking threshold")]
    DamageOutOfRange(Carrier, u8),

    #[error("duplicate unit id '{0}'")]
    DuplicateUnit(UnitId),

    #[error("CAP slot on {0} references unknown unit '{1}'")]
    UnknownCapUnit(Carrier, UnitId),

    #[error("CAP slot on {0} holds '{1}', which is not one of its fighters")]
    ForeignCapUnit(Carrier, UnitId),

    #[error("unit '{0}' has status {1:?} at {2}")]
    StatusLocationMismatch(UnitId, UnitStatus, Location),

    #[error("unit '{0}' flies CAP without holding exactly one slot on its carrier")]
    CapSlotMismatch(UnitId),

    #[error("unit '{0}' has a turn-track counter off the turn track")]
    StrayTrackCounter(UnitId),

    #[error("unit '{0}' of sunk carrier {1} is still in play")]
    SunkCarrierUnit(UnitId, Carrier),
}

/// Complete game state at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub turn: usize,
    pub phase: Phase,
    /// Indexed by `Carrier as usize`.
    pub carriers: [CarrierState; CARRIER_COUNT],
    pub units: Vec<Unit>,
    pub midway_damage: u32,
    /// Hits scored on the US task force. Reported, not scored.
    pub us_task_force_hits: u32,
    pub us_fleet_found: bool,
    pub japan_fleet_found: bool,
    pub recon_resolved: bool,
    pub strike_resolved: bool,
    pub game_over: bool,
    pub log: GameLog,
    pub selected_unit: Option<UnitId>,
    pub scenario: Option<String>,
}

impl GameState {
    /// Creates the 04:30 starting position: every carrier undamaged with a
    /// fighter, a dive bomber, and a torpedo bomber ready on deck.
    pub fn new() -> Self {
        let mut units = Vec::with_capacity(CARRIER_COUNT * 3);
        for carrier in ALL_CARRIERS {
            for unit_type in [UnitType::Fighter, UnitType::DiveBomber, UnitType::TorpedoBomber] {
                units.push(Unit::japanese(carrier, unit_type));
            }
        }

        let mut state = GameState {
            turn: 0,
            phase: Phase::Japanese,
            carriers: ALL_CARRIERS.map(CarrierState::new),
            units,
            midway_damage: 0,
            us_task_force_hits: 0,
            us_fleet_found: false,
            japan_fleet_found: false,
            recon_resolved: false,
            strike_resolved: false,
            game_over: false,
            log: GameLog::new(),
            selected_unit: None,
            scenario: None,
        };
        state.push_log(format!("Game started at {}", TURN_LABELS[0]), LogCategory::System);
        state
    }

    /// The game-clock label of the current turn.
    pub fn clock(&self) -> &'static str {
        TURN_LABELS[self.turn.min(FINAL_TURN)]
    }

    pub fn carrier(&self, carrier: Carrier) -> &CarrierState {
        &self.carriers[carrier as usize]
    }

    pub fn carrier_mut(&mut self, carrier: Carrier) -> &mut CarrierState {
        &mut self.carriers[carrier as usize]
    }

    /// Carriers still afloat, in board order.
    pub fn active_carriers(&self) -> impl Iterator<Item = Carrier> + '_ {
        ALL_CARRIERS.into_iter().filter(|c| !self.carrier(*c).is_sunk())
    }

    pub fn all_carriers_sunk(&self) -> bool {
        self.carriers.iter().all(|c| c.is_sunk())
    }

    pub fn unit(&self, id: &UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| &u.id == id)
    }

    pub fn unit_mut(&mut self, id: &UnitId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|u| &u.id == id)
    }

    /// Statuses of the fighters flying CAP over `carrier`.
    pub fn cap_statuses(&self, carrier: Carrier) -> impl Iterator<Item = UnitStatus> + '_ {
        self.carrier(carrier)
            .cap_units()
            .filter_map(|id| self.unit(id))
            .map(|u| u.status)
    }

    /// Counts (normal, low) CAP fighters over `carrier`.
    pub fn cap_strength(&self, carrier: Carrier) -> (usize, usize) {
        self.cap_statuses(carrier).fold((0, 0), |(normal, low), s| match s {
            UnitStatus::CapNormal => (normal + 1, low),
            UnitStatus::CapLow => (normal, low + 1),
            _ => (normal, low),
        })
    }

    /// Destroyed squadrons belonging to `owner`.
    pub fn destroyed_count(&self, owner: Owner) -> usize {
        self.units
            .iter()
            .filter(|u| u.owner == owner && u.is_destroyed())
            .count()
    }

    /// Appends a log entry stamped with the current game clock.
    pub fn push_log(&mut self, message: impl Into<String>, category: LogCategory) -> LogEntry {
        let clock = self.clock();
        self.log.push(clock, message, category)
    }

    /// Takes a squadron off its current spot, releasing any CAP slot it held.
    pub fn lift_unit(&mut self, id: &UnitId) {
        let carrier = match self.unit(id) {
            Some(u) if u.location == Location::Cap => u.carrier,
            _ => None,
        };
        if let Some(c) = carrier {
            self.carrier_mut(c).release_cap_slot(id);
        }
    }

    /// Applies hits to a carrier. If this sinks it, every squadron of that
    /// carrier still in play is destroyed.
    ///
    /// Returns the damage actually taken and whether the carrier sank now.
    pub fn damage_carrier(&mut self, carrier: Carrier, hits: u32) -> (u8, bool) {
        let was_sunk = self.carrier(carrier).is_sunk();
        let taken = self.carrier_mut(carrier).apply_damage(hits);
        let sunk_now = !was_sunk && self.carrier(carrier).is_sunk();
        if sunk_now {
            self.carrier_mut(carrier).cap_slots = [None, None];
            for unit in self.units.iter_mut() {
                if unit.carrier == Some(carrier) && !unit.is_destroyed() {
                    unit.destroy();
                }
            }
        }
        (taken, sunk_now)
    }

    /// Checks every structural invariant and reports the first violation.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        if self.turn > FINAL_TURN {
            return Err(InvariantViolation::TurnOutOfRange(self.turn));
        }

        for (i, unit) in self.units.iter().enumerate() {
            if self.units[..i].iter().any(|u| u.id == unit.id) {
                return Err(InvariantViolation::DuplicateUnit(unit.id.clone()));
            }
        }

        for cv in &self.carriers {
            if cv.damage() > SINKING_DAMAGE {
                return Err(InvariantViolation::DamageOutOfRange(cv.name, cv.damage()));
            }
            for id in cv.cap_units() {
                let unit = self
                    .unit(id)
                    .ok_or_else(|| InvariantViolation::UnknownCapUnit(cv.name, id.clone()))?;
                if unit.unit_type != UnitType::Fighter || unit.carrier != Some(cv.name) {
                    return Err(InvariantViolation::ForeignCapUnit(cv.name, id.clone()));
                }
            }
        }

        for unit in &self.units {
            let consistent = match unit.status {
                UnitStatus::CapNormal | UnitStatus::CapLow => unit.location == Location::Cap,
                UnitStatus::Destroyed => unit.location == Location::Pool,
                UnitStatus::Returning => unit.location == Location::TurnTrack,
                _ => !matches!(unit.location, Location::Cap | Location::TurnTrack),
            };
            if !consistent {
                return Err(InvariantViolation::StatusLocationMismatch(
                    unit.id.clone(),
                    unit.status,
                    unit.location,
                ));
            }

            if unit.status.is_cap() {
                let held = unit
                    .carrier
                    .map(|c| self.carrier(c).cap_units().filter(|id| **id == unit.id).count())
                    .unwrap_or(0);
                if held != 1 {
                    return Err(InvariantViolation::CapSlotMismatch(unit.id.clone()));
                }
            }

            if unit.turns_until_ready.is_some() != (unit.location == Location::TurnTrack) {
                return Err(InvariantViolation::StrayTrackCounter(unit.id.clone()));
            }

            if let Some(c) = unit.carrier {
                if self.carrier(c).is_sunk() && !unit.is_destroyed() {
                    return Err(InvariantViolation::SunkCarrierUnit(unit.id.clone(), c));
                }
            }
        }

        Ok(())
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
