//! Computer players.
//!
//! The US side is always played by the rules' own targeting logic; the
//! Japanese doctrine drives the autoplay used for batch simulation.

pub mod doctrine;
pub mod targeting;

pub use doctrine::{plan_moves, plan_phase, strike_ready, Action, MoveOrder};
pub use targeting::{base_score, select_us_target, TargetChoice};
