//! Rules resolution.
//!
//! Pure functions that take a state snapshot (and dice, where the rules call
//! for a roll) and return what should change: phase sequencing, search,
//! strike combat, the US strike draw, turn-track recovery, and scoring.

pub mod combat;
pub mod cup;
pub mod phase;
pub mod recon;
pub mod recovery;
pub mod scoring;

pub use combat::{
    cap_engages, resolve_american_strike, resolve_japanese_strike, CombatResult, JapaneseTarget,
    StrikeTarget,
};
pub use cup::{draw_us_strike, StrikeDraw};
pub use phase::{advance_phase, next_turn, PhaseTransition, FIRST_AMERICAN_TURN};
pub use recon::{resolve_recon, ReconOutcome};
pub use recovery::{process_turn_track, rearm_cap, Recovery};
pub use scoring::{calculate_score, is_game_over, Rating, ScoreBreakdown};
