//! Board representation and game-state types.
//!
//! Contains the core data structures for carriers, squadrons, board
//! locations, the game log, and the overall game state.

pub mod carrier;
pub mod log;
pub mod state;
pub mod unit;

pub use carrier::{
    Carrier, CarrierState, ALL_CARRIERS, CAP_SLOTS, CARRIER_COUNT, FLAGSHIP, SINKING_DAMAGE,
};
pub use log::{GameLog, LogCategory, LogEntry, LOG_CAPACITY};
pub use state::{
    GameState, InvariantViolation, Phase, ALL_PHASES, FINAL_TURN, TURN_COUNT, TURN_LABELS,
};
pub use unit::{Location, Owner, Unit, UnitId, UnitStatus, UnitType, RECOVERY_DELAY};
