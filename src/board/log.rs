//! The game log shown to players.
//!
//! Entries are stored newest first and capped at [`LOG_CAPACITY`]. Each entry
//! is stamped with the game-clock label of the turn it was written in, which
//! keeps snapshots deterministic.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum number of retained log entries.
pub const LOG_CAPACITY: usize = 200;

/// Log entry category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogCategory {
    System,
    Combat,
    Recon,
    Movement,
    Historical,
}

impl LogCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            LogCategory::System => "SYSTEM",
            LogCategory::Combat => "COMBAT",
            LogCategory::Recon => "RECON",
            LogCategory::Movement => "MOVEMENT",
            LogCategory::Historical => "HISTORICAL",
        }
    }
}

impl fmt::Display for LogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    pub timestamp: String,
    pub message: String,
    pub category: LogCategory,
}

/// Bounded, newest-first sequence of log entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameLog {
    entries: VecDeque<LogEntry>,
    next_id: u64,
}

impl GameLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new entry and returns a copy of it.
    pub fn push(&mut self, timestamp: &str, message: impl Into<String>, category: LogCategory) -> LogEntry {
        let entry = LogEntry {
            id: self.next_id,
            timestamp: timestamp.to_string(),
            message: message.into(),
            category,
        };
        self.next_id += 1;
        self.entries.push_front(entry.clone());
        self.entries.truncate(LOG_CAPACITY);
        entry
    }

    /// Entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    /// Id the next entry will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Renumbers the entries, oldest first, starting at `start`.
    ///
    /// Used when a fresh log replaces an old one so entry ids keep
    /// increasing across resets.
    pub fn rebase(&mut self, start: u64) {
        let mut id = start;
        for entry in self.entries.iter_mut().rev() {
            entry.id = id;
            id += 1;
        }
        self.next_id = id;
    }
}
