//! Phase sequencing logic.
//!
//! Determines the next phase of the turn and whether the turn clock moves.
//!
//! Phase flow:
//! - Japanese -> Recon
//! - Recon    -> American, or Cleanup during the first two turns
//! - American -> Cleanup
//! - Cleanup  -> Japanese of the next turn

use crate::board::{Phase, FINAL_TURN};

/// Turns before this index have no American phase.
pub const FIRST_AMERICAN_TURN: usize = 2;

/// The outcome of advancing the phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseTransition {
    pub next_phase: Phase,
    /// True when wrapping past Cleanup into a new turn.
    pub advance_turn: bool,
    pub messages: Vec<String>,
}

/// Computes the phase that follows `current` on turn `turn`.
pub fn advance_phase(current: Phase, turn: usize) -> PhaseTransition {
    let mut messages = Vec::new();

    let (next_phase, advance_turn) = match current {
        Phase::Japanese => (Phase::Recon, false),
        Phase::Recon if turn < FIRST_AMERICAN_TURN => {
            messages.push("US strikes skipped (early morning)".to_string());
            (Phase::Cleanup, false)
        }
        Phase::Recon => (Phase::American, false),
        Phase::American => (Phase::Cleanup, false),
        Phase::Cleanup => (Phase::Japanese, true),
    };

    messages.push(format!("Transitioned to {} phase", next_phase));

    PhaseTransition {
        next_phase,
        advance_turn,
        messages,
    }
}

/// The turn index after applying `transition` on turn `turn`.
///
/// The clock stops at the final turn.
pub fn next_turn(turn: usize, transition: &PhaseTransition) -> usize {
    if transition.advance_turn && turn < FINAL_TURN {
        turn + 1
    } else {
        turn
    }
}
