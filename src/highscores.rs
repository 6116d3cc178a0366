//! Score records and the high score leaderboard
//!
//! Finished sessions are submitted as `ScoreRecord`s. The leaderboard keeps the
//! top 10 and is persisted to LocalStorage on the web.

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A finished session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub player_name: String,
    pub score: u64,
    /// Unix timestamp (ms)
    pub timestamp: f64,
}

/// Write target for finished sessions
pub trait ScoreSink {
    fn submit(&mut self, record: ScoreRecord);
}

/// Shared sink the host keeps a handle to
impl<S: ScoreSink> ScoreSink for std::rc::Rc<std::cell::RefCell<S>> {
    fn submit(&mut self, record: ScoreRecord) {
        self.borrow_mut().submit(record);
    }
}

/// Discards every record
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ScoreSink for NullSink {
    fn submit(&mut self, _record: ScoreRecord) {}
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<ScoreRecord>,
}

impl HighScores {
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "safe_crossing_highscores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Insert a record if it qualifies.
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify
    pub fn add(&mut self, record: ScoreRecord) -> Option<usize> {
        if !self.qualifies(record.score) {
            return None;
        }

        // Sorted descending; ties keep the earlier record first
        let pos = self.entries.iter().position(|e| record.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, record);
                i + 1
            }
            None => {
                self.entries.push(record);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Rebuild a leaderboard from its stored JSON.
    ///
    /// Stored boards are re-ranked through `add`, so hand-edited or older
    /// boards still come back sorted, capped and free of zero scores.
    /// Unreadable JSON yields an empty board.
    pub fn from_stored(json: &str) -> Self {
        let stored: HighScores = match serde_json::from_str(json) {
            Ok(stored) => stored,
            Err(e) => {
                log::warn!("Discarding unreadable crossing leaderboard: {}", e);
                return Self::new();
            }
        };
        let mut board = Self::new();
        for record in stored.entries {
            board.add(record);
        }
        board
    }

    #[cfg(target_arch = "wasm32")]
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }

    /// Load the leaderboard from LocalStorage
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = Self::storage().and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten());
        match stored {
            Some(json) => {
                let board = Self::from_stored(&json);
                log::info!("Crossing leaderboard restored ({} records)", board.entries.len());
                board
            }
            None => {
                log::info!("No crossing leaderboard stored yet");
                Self::new()
            }
        }
    }

    /// Write the leaderboard to LocalStorage
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let Some(storage) = Self::storage() else {
            log::warn!("LocalStorage unavailable, crossing leaderboard not saved");
            return;
        };
        match serde_json::to_string(self) {
            Ok(json) => {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("LocalStorage rejected the crossing leaderboard");
                }
            }
            Err(e) => log::warn!("Failed to encode crossing leaderboard: {}", e),
        }
    }

    /// Native builds keep the board in memory only
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {}
}

impl ScoreSink for HighScores {
    fn submit(&mut self, record: ScoreRecord) {
        let score = record.score;
        match self.add(record) {
            Some(rank) => {
                log::info!("Score {} entered the leaderboard at #{}", score, rank);
                self.save();
            }
            None => log::debug!("Score {} did not qualify", score),
        }
    }
}

/// Current wall-clock time in Unix milliseconds
#[cfg(target_arch = "wasm32")]
pub fn now_timestamp() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_timestamp() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0)
}
