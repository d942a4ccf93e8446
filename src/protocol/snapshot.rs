//! Saved-game encoding.
//!
//! A saved game is one JSON record holding the storage key, the complete
//! [`GameState`], and the player's sound preferences. Decoding checks the key
//! and validates the state before handing it back.

use serde::{Deserialize, Serialize};

use crate::board::{GameState, InvariantViolation};

/// Storage key every saved game carries.
pub const STORAGE_KEY: &str = "kido-butai-storage";

/// Errors that can occur while saving or loading a game.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("malformed saved game: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage key mismatch: expected '{expected}', found '{found}'")]
    KeyMismatch { expected: &'static str, found: String },

    #[error("saved state is inconsistent: {0}")]
    Invalid(#[from] InvariantViolation),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Presentation preferences, carried along untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub muted: bool,
    pub volume: f32,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            muted: false,
            volume: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedGame {
    pub key: String,
    pub state: GameState,
    #[serde(default)]
    pub preferences: Preferences,
}

impl SavedGame {
    pub fn new(state: GameState, preferences: Preferences) -> Self {
        SavedGame {
            key: STORAGE_KEY.to_string(),
            state,
            preferences,
        }
    }
}

/// Encodes `state` and `preferences` as a saved-game record.
pub fn save_json(state: &GameState, preferences: &Preferences) -> Result<String, SnapshotError> {
    let saved = SavedGame::new(state.clone(), preferences.clone());
    Ok(serde_json::to_string(&saved)?)
}

/// Decodes and validates a saved-game record.
pub fn load_json(json: &str) -> Result<SavedGame, SnapshotError> {
    let saved: SavedGame = serde_json::from_str(json)?;
    if saved.key != STORAGE_KEY {
        return Err(SnapshotError::KeyMismatch {
            expected: STORAGE_KEY,
            found: saved.key,
        });
    }
    saved.state.validate()?;
    Ok(saved)
}

/// Writes a saved game to `path`.
pub fn save_file(
    path: &std::path::Path,
    state: &GameState,
    preferences: &Preferences,
) -> Result<(), SnapshotError> {
    std::fs::write(path, save_json(state, preferences)?)?;
    Ok(())
}

/// Reads a saved game from `path`.
pub fn load_file(path: &std::path::Path) -> Result<SavedGame, SnapshotError> {
    load_json(&std::fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Carrier, Location, UnitId};
    use crate::scenario;

    #[test]
    fn round_trip_preserves_everything() {
        let mut state = scenario::find(scenario::HIRYU_REVENGE).unwrap().build();
        let id = UnitId::from("HIRYU-F");
        state.carrier_mut(Carrier::Hiryu).occupy_cap_slot(id.clone());
        state.unit_mut(&id).unwrap().relocate(Location::Cap);
        let prefs = Preferences {
            muted: true,
            volume: 0.25,
        };

        let json = save_json(&state, &prefs).unwrap();
        assert!(json.contains("\"kido-butai-storage\""));
        let saved = load_json(&json).unwrap();
        assert_eq!(saved.state, state);
        assert_eq!(saved.preferences, prefs);
    }

    #[test]
    fn wrong_key_is_rejected() {
        let json = save_json(&GameState::new(), &Preferences::default())
            .unwrap()
            .replace("kido-butai-storage", "other-game");
        assert!(matches!(
            load_json(&json),
            Err(SnapshotError::KeyMismatch { .. })
        ));
    }

    #[test]
    fn inconsistent_state_is_rejected() {
        let mut state = GameState::new();
        state.carrier_mut(Carrier::Kaga).cap_slots[1] = Some(UnitId::from("KAGA-DB"));
        let json = save_json(&state, &Preferences::default()).unwrap();
        assert!(matches!(load_json(&json), Err(SnapshotError::Invalid(_))));
    }

    #[test]
    fn garbage_is_a_json_error() {
        assert!(matches!(load_json("{\"key\":"), Err(SnapshotError::Json(_))));
    }

    #[test]
    fn missing_preferences_default() {
        let json = save_json(&GameState::new(), &Preferences::default()).unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value.as_object_mut().unwrap().remove("preferences");
        let saved = load_json(&value.to_string()).unwrap();
        assert_eq!(saved.preferences, Preferences::default());
    }
}
