//! Starting positions.
//!
//! A scenario is a fixed record laid over the 04:30 default position: a start
//! time and phase, pre-set damage and search results, and historical seed
//! entries for the log. Loading one replaces the whole game state.

use crate::board::{
    Carrier, GameLog, GameState, LogCategory, Location, Owner, Phase, UnitType, TURN_LABELS,
};

/// A fixed scenario definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub turn: usize,
    pub phase: Phase,
    pub midway_damage: u32,
    pub us_fleet_found: bool,
    pub japan_fleet_found: bool,
    /// Carriers already lost when the scenario opens.
    pub sunk: &'static [Carrier],
    /// Japanese bombers start spotted on deck for a strike.
    pub bombers_spotted: bool,
    pub seed_log: &'static [&'static str],
}

pub const STANDARD_MORNING: &str = "STANDARD_MORNING";
pub const FATEFUL_FIVE: &str = "FATEFUL_FIVE";
pub const HIRYU_REVENGE: &str = "HIRYU_REVENGE";

pub const SCENARIOS: [Scenario; 3] = [
    Scenario {
        id: STANDARD_MORNING,
        name: "Morning Strike",
        description: "The standard 04:30 start. Secure the skies over Midway and locate the US Task Force.",
        turn: 0,
        phase: Phase::Japanese,
        midway_damage: 0,
        us_fleet_found: false,
        japan_fleet_found: false,
        sunk: &[],
        bombers_spotted: false,
        seed_log: &[],
    },
    Scenario {
        id: FATEFUL_FIVE,
        name: "The Fateful Five Minutes",
        description: "10:25 AM. Japanese flight decks are packed with rearmed bombers. US Dive Bombers are diving. Can you survive the onslaught?",
        turn: 6,
        phase: Phase::American,
        midway_damage: 8,
        us_fleet_found: true,
        japan_fleet_found: false,
        sunk: &[],
        bombers_spotted: true,
        seed_log: &[
            "HISTORICAL: 10:25 AM. US SBD Dauntlesses are beginning their dives!",
            "All Japanese carriers have bombers spotted on deck!",
        ],
    },
    Scenario {
        id: HIRYU_REVENGE,
        name: "Hiryū's Revenge",
        description: "14:30 PM. Akagi, Kaga, and Soryu are burning wrecks. Hiryu is the lone survivor. Launch everything against the US Task Force!",
        turn: 10,
        phase: Phase::Japanese,
        midway_damage: 10,
        us_fleet_found: true,
        japan_fleet_found: true,
        sunk: &[Carrier::Akagi, Carrier::Kaga, Carrier::Soryu],
        bombers_spotted: false,
        seed_log: &[
            "HISTORICAL: 14:30 PM. Hiryu stands alone against the US fleet.",
            "Avenge the Kido Butai!",
        ],
    },
];

/// Looks up a scenario by id.
pub fn find(id: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|s| s.id.eq_ignore_ascii_case(id))
}

impl Scenario {
    /// Builds the opening state for this scenario.
    pub fn build(&self) -> GameState {
        let mut state = GameState::new();
        state.turn = self.turn;
        state.phase = self.phase;
        state.midway_damage = self.midway_damage;
        state.us_fleet_found = self.us_fleet_found;
        state.japan_fleet_found = self.japan_fleet_found;
        state.scenario = Some(self.id.to_string());

        for &carrier in self.sunk {
            state.damage_carrier(carrier, crate::board::SINKING_DAMAGE as u32);
        }

        if self.bombers_spotted {
            for unit in state.units.iter_mut() {
                if unit.owner == Owner::Japan && unit.unit_type != UnitType::Fighter && !unit.is_destroyed() {
                    unit.relocate(Location::Staging);
                }
            }
        }

        state.log = GameLog::new();
        state.push_log(
            format!("Scenario loaded: {} ({})", self.name, TURN_LABELS[self.turn]),
            LogCategory::System,
        );
        for line in self.seed_log {
            state.push_log(*line, LogCategory::Historical);
        }
        state
    }
}
