//! Text front-end session.
//!
//! Owns a [`Game`] plus the front-end options and turns parsed commands into
//! response lines:
//!
//! - `log <CATEGORY> <time> <message>` for every new game-log entry
//! - `combat <unit> <type> <target> rolls=<r,..> hits=<n> <result>` per squadron
//! - `rejected <reason>` when an order is refused
//! - `score <json>` and `state <json>` snapshots
//! - `error <message>` when a command could not run at all

use std::io::{self, Write};
use std::path::Path;

use tracing::{debug, warn};

use super::parser::Command;
use super::snapshot::{load_file, save_file, Preferences};
use crate::dice::RngDice;
use crate::engine::{CommandOutcome, EngineError, Game};
use crate::resolve::CombatResult;

/// Engine options settable with `setoption`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// Dice seed; 0 draws from entropy.
    pub seed: u64,
}

pub struct Session {
    game: Game<RngDice>,
    options: EngineOptions,
    preferences: Preferences,
}

impl Session {
    pub fn new() -> Self {
        Session {
            game: Game::new(0),
            options: EngineOptions::default(),
            preferences: Preferences::default(),
        }
    }

    pub fn game(&self) -> &Game<RngDice> {
        &self.game
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Applies `setoption`. Unknown names are ignored with a warning.
    pub fn set_option(&mut self, name: &str, value: Option<&str>) {
        match name.to_ascii_lowercase().as_str() {
            "seed" => match value.map(str::parse::<u64>) {
                Some(Ok(seed)) => {
                    self.options.seed = seed;
                    self.game.set_dice(RngDice::from_seed_option(seed));
                    debug!(seed, "dice reseeded");
                }
                _ => warn!("invalid Seed value: {:?}", value),
            },
            "muted" => {
                self.preferences.muted = value.map_or(true, |v| v == "true");
            }
            "volume" => match value.map(str::parse::<f32>) {
                Some(Ok(v)) if (0.0..=1.0).contains(&v) => self.preferences.volume = v,
                _ => warn!("invalid Volume value: {:?}", value),
            },
            other => warn!("unknown option: {}", other),
        }
    }

    /// Handles one command. Returns `Ok(false)` once the session should end.
    pub fn handle<W: Write>(&mut self, command: Command, out: &mut W) -> io::Result<bool> {
        let result = match command {
            Command::IsReady => {
                writeln!(out, "readyok")?;
                Ok(None)
            }
            Command::Quit => return Ok(false),
            Command::SetOption { name, value } => {
                self.set_option(&name, value.as_deref());
                Ok(None)
            }
            Command::Select { unit } => self.game.select_unit(unit.as_ref()).map(Some),
            Command::Move { unit, to } => self.game.move_unit(&unit, to).map(Some),
            Command::Advance => self.game.advance_phase().map(Some),
            Command::Recon => self.game.perform_recon().map(Some),
            Command::UsStrike => self.game.perform_american_strike().map(Some),
            Command::Strike => self.game.resolve_strikes().map(Some),
            Command::Scenario { id } => self.game.load_scenario(&id).map(Some),
            Command::Reset => self.game.reset_game().map(Some),
            Command::Score => {
                let score = serde_json::to_string(&self.game.score())?;
                writeln!(out, "score {}", score)?;
                Ok(None)
            }
            Command::State => {
                let state = serde_json::to_string(self.game.state())?;
                writeln!(out, "state {}", state)?;
                Ok(None)
            }
            Command::Save { path } => {
                match save_file(Path::new(&path), self.game.state(), &self.preferences) {
                    Ok(()) => writeln!(out, "saved {}", path)?,
                    Err(e) => writeln!(out, "error {}", e)?,
                }
                Ok(None)
            }
            Command::Load { path } => match load_file(Path::new(&path)) {
                Ok(saved) => {
                    self.preferences = saved.preferences;
                    self.game.restore(saved.state).map(Some)
                }
                Err(e) => {
                    writeln!(out, "error {}", e)?;
                    Ok(None)
                }
            },
        };

        match result {
            Ok(Some(outcome)) => write_outcome(&outcome, out)?,
            Ok(None) => {}
            Err(e) => write_error(&e, out)?,
        }
        out.flush()?;
        Ok(true)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

fn write_outcome<W: Write>(outcome: &CommandOutcome, out: &mut W) -> io::Result<()> {
    for entry in &outcome.entries {
        writeln!(out, "log {} {} {}", entry.category, entry.timestamp, entry.message)?;
    }
    for result in &outcome.combat {
        write_combat(result, out)?;
    }
    if let Some(reason) = outcome.rejection() {
        writeln!(out, "rejected {}", reason)?;
    }
    Ok(())
}

fn write_combat<W: Write>(result: &CombatResult, out: &mut W) -> io::Result<()> {
    let rolls: Vec<String> = result.rolls.iter().map(|r| r.to_string()).collect();
    let verdict = if result.destroyed {
        "destroyed"
    } else if result.aborted {
        "aborted"
    } else {
        "attacked"
    };
    writeln!(
        out,
        "combat {} {} {} rolls={} hits={} {}",
        result.attacker,
        result.unit_type,
        result.target,
        rolls.join(","),
        result.hits,
        verdict
    )
}

fn write_error<W: Write>(error: &EngineError, out: &mut W) -> io::Result<()> {
    warn!("command failed: {}", error);
    writeln!(out, "error {}", error)
}
