//! Search resolution.
//!
//! Each side that has not yet found the other rolls once. Japan needs a 6;
//! the US, searching with Midway-based patrols, needs a 5 or better.

use crate::board::GameState;
use crate::dice::{Dice, DiceError};

/// Roll Japan needs to find the US task force.
pub const JAPAN_SEARCH_TARGET: u8 = 6;

/// Roll the US needs to find the Kido Butai.
pub const US_SEARCH_TARGET: u8 = 5;

/// The result of one round of searching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconOutcome {
    /// True if the US fleet was found by this search.
    pub us_fleet_found: bool,
    /// True if the Japanese fleet was found by this search.
    pub japan_fleet_found: bool,
    pub japan_roll: Option<u8>,
    pub us_roll: Option<u8>,
    pub messages: Vec<String>,
}

/// Rolls searches for each side that is still hidden.
pub fn resolve_recon(state: &GameState, dice: &mut impl Dice) -> Result<ReconOutcome, DiceError> {
    let mut out = ReconOutcome::default();

    if !state.us_fleet_found {
        let roll = dice.d6()?;
        out.japan_roll = Some(roll);
        out.messages.push(format!("Japan recon roll: {}", roll));
        if roll >= JAPAN_SEARCH_TARGET {
            out.us_fleet_found = true;
            out.messages.push("US Task Force located!".to_string());
        }
    }

    if !state.japan_fleet_found {
        let roll = dice.d6()?;
        out.us_roll = Some(roll);
        out.messages.push(format!("US recon roll: {}", roll));
        if roll >= US_SEARCH_TARGET {
            out.japan_fleet_found = true;
            out.messages.push("Kido Butai discovered by US scouts!".to_string());
        }
    }

    if out.japan_roll.is_none() && out.us_roll.is_none() {
        out.messages.push("Both fleets already located; no search flown.".to_string());
    }

    Ok(out)
}
