//! Text command parser.
//!
//! Parses lines read by the `kido-butai` binary into structured [`Command`]
//! variants the main loop dispatches on. Unknown or malformed lines yield
//! `None` after a warning on the diagnostic channel.

use tracing::warn;

use crate::board::{Location, UnitId};

/// A parsed front-end command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Synchronization ping; the engine replies `readyok`.
    IsReady,

    /// Set an engine option: `setoption name <id> [value <x>]`.
    SetOption { name: String, value: Option<String> },

    /// `select <id>` or `select none`.
    Select { unit: Option<UnitId> },

    /// `move <id> <location>`.
    Move { unit: UnitId, to: Location },

    /// Advance to the next phase.
    Advance,

    /// Fly the search.
    Recon,

    /// Resolve the US strike.
    UsStrike,

    /// Commit the Japanese strike.
    Strike,

    /// `scenario <id>`.
    Scenario { id: String },

    /// Start over.
    Reset,

    /// Print the score breakdown.
    Score,

    /// Print the state as JSON.
    State,

    /// `save <path>`.
    Save { path: String },

    /// `load <path>`.
    Load { path: String },

    /// Terminate the process.
    Quit,
}

/// Parses a single line of input into a `Command`.
pub fn parse_command(line: &str) -> Option<Command> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let (&head, args) = tokens.split_first()?;

    match head {
        "isready" => Some(Command::IsReady),
        "advance" => Some(Command::Advance),
        "recon" => Some(Command::Recon),
        "usstrike" => Some(Command::UsStrike),
        "strike" => Some(Command::Strike),
        "reset" => Some(Command::Reset),
        "score" => Some(Command::Score),
        "state" => Some(Command::State),
        "quit" => Some(Command::Quit),

        "setoption" => parse_setoption(args),
        "select" => parse_select(args),
        "move" => parse_move(args),
        "scenario" => one_arg("scenario", args).map(|id| Command::Scenario { id }),
        "save" => one_arg("save", args).map(|path| Command::Save { path }),
        "load" => one_arg("load", args).map(|path| Command::Load { path }),

        other => {
            warn!("unknown command: {}", other);
            None
        }
    }
}

fn one_arg(command: &str, args: &[&str]) -> Option<String> {
    match args {
        [arg] => Some(arg.to_string()),
        _ => {
            warn!("malformed {}: expected '{} <arg>'", command, command);
            None
        }
    }
}

/// Parses the arguments of `setoption name <id> [value <x>]`.
fn parse_setoption(args: &[&str]) -> Option<Command> {
    if args.len() < 2 || args[0] != "name" {
        warn!("malformed setoption: expected 'setoption name <id> [value <x>]'");
        return None;
    }

    let rest = &args[1..];
    let (name_parts, value_parts) = match rest.iter().position(|&t| t == "value") {
        Some(vi) => (&rest[..vi], &rest[vi + 1..]),
        None => (rest, &[][..]),
    };
    if name_parts.is_empty() {
        warn!("malformed setoption: empty name");
        return None;
    }

    let value = if value_parts.is_empty() {
        None
    } else {
        Some(value_parts.join(" "))
    };
    Some(Command::SetOption {
        name: name_parts.join(" "),
        value,
    })
}

fn parse_select(args: &[&str]) -> Option<Command> {
    match args {
        ["none"] => Some(Command::Select { unit: None }),
        [id] => Some(Command::Select {
            unit: Some(UnitId::from(*id)),
        }),
        _ => {
            warn!("malformed select: expected 'select <id>|none'");
            None
        }
    }
}

fn parse_move(args: &[&str]) -> Option<Command> {
    let [id, loc] = args else {
        warn!("malformed move: expected 'move <id> <location>'");
        return None;
    };
    match Location::from_token(loc) {
        Some(to) => Some(Command::Move {
            unit: UnitId::from(*id),
            to,
        }),
        None => {
            warn!("unknown location: '{}'", loc);
            None
        }
    }
}
