//! Front-end protocol handling.
//!
//! The line-oriented command parser and session used by the `kido-butai`
//! binary, and the JSON saved-game format.

pub mod parser;
pub mod session;
pub mod snapshot;

pub use parser::{parse_command, Command};
pub use session::{EngineOptions, Session};
pub use snapshot::{
    load_file, load_json, save_file, save_json, Preferences, SavedGame, SnapshotError, STORAGE_KEY,
};
