//! Victory points and the end-of-game check.
//!
//! Japan scores for damage to Midway and for US squadrons shot down. The US
//! scores for carrier hits, sinkings, and Japanese squadrons shot down. The
//! final score is Japan's total minus the US total.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{GameState, Owner, FINAL_TURN};

/// Points the US scores per carrier sunk.
const SUNK_CARRIER_POINTS: i32 = 10;
/// Points the US scores per hit on a carrier still afloat.
const CARRIER_HIT_POINTS: i32 = 2;

/// Outcome band for a final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rating {
    MajorJapaneseDefeat,
    MinorJapaneseDefeat,
    Draw,
    MinorJapaneseVictory,
    MajorJapaneseVictory,
}

impl Rating {
    /// Every rating, worst to best.
    pub const ALL: [Rating; 5] = [
        Rating::MajorJapaneseDefeat,
        Rating::MinorJapaneseDefeat,
        Rating::Draw,
        Rating::MinorJapaneseVictory,
        Rating::MajorJapaneseVictory,
    ];

    pub fn from_score(score: i32) -> Rating {
        match score {
            i32::MIN..=-6 => Rating::MajorJapaneseDefeat,
            -5..=-1 => Rating::MinorJapaneseDefeat,
            0 => Rating::Draw,
            1..=5 => Rating::MinorJapaneseVictory,
            _ => Rating::MajorJapaneseVictory,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Rating::MajorJapaneseDefeat => "Major Japanese Defeat",
            Rating::MinorJapaneseDefeat => "Minor Japanese Defeat",
            Rating::Draw => "Draw",
            Rating::MinorJapaneseVictory => "Minor Japanese Victory",
            Rating::MajorJapaneseVictory => "Major Japanese Victory",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub japan_midway_points: i32,
    pub japan_squadron_kill_points: i32,
    /// Japanese squadrons destroyed so far.
    pub japan_squadrons_lost: usize,
    pub us_carrier_hit_points: i32,
    pub us_carrier_sunk_points: i32,
    pub us_squadron_kill_points: i32,
    pub total_japan_score: i32,
    pub total_us_score: i32,
    pub final_score: i32,
    pub rating: Rating,
    pub is_game_over: bool,
}

/// A quarter point per squadron, rounded half up.
fn squadron_points(destroyed: usize) -> i32 {
    ((destroyed + 2) / 4) as i32
}

/// Scores the current position.
pub fn calculate_score(state: &GameState) -> ScoreBreakdown {
    let japan_midway_points = state.midway_damage as i32;
    let japan_squadron_kill_points = squadron_points(state.destroyed_count(Owner::Us));

    let (us_carrier_hit_points, us_carrier_sunk_points) =
        state.carriers.iter().fold((0, 0), |(hit, sunk), cv| {
            if cv.is_sunk() {
                (hit, sunk + SUNK_CARRIER_POINTS)
            } else {
                (hit + cv.damage() as i32 * CARRIER_HIT_POINTS, sunk)
            }
        });

    let japan_squadrons_lost = state.destroyed_count(Owner::Japan);
    let us_squadron_kill_points = squadron_points(japan_squadrons_lost);

    let total_japan_score = japan_midway_points + japan_squadron_kill_points;
    let total_us_score = us_carrier_hit_points + us_carrier_sunk_points + us_squadron_kill_points;
    let final_score = total_japan_score - total_us_score;

    ScoreBreakdown {
        japan_midway_points,
        japan_squadron_kill_points,
        japan_squadrons_lost,
        us_carrier_hit_points,
        us_carrier_sunk_points,
        us_squadron_kill_points,
        total_japan_score,
        total_us_score,
        final_score,
        rating: Rating::from_score(final_score),
        is_game_over: is_game_over(state),
    }
}

/// True once every carrier is sunk or the clock reaches 19:30.
pub fn is_game_over(state: &GameState) -> bool {
    state.all_carriers_sunk() || state.turn >= FINAL_TURN
}
