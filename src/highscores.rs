//! High score leaderboard
//!
//! Persisted as JSON, tracks the top 10 winning scores.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::settings::StoreError;
use crate::sim::{Bonus, GameSession};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: i32,
    /// Whole seconds left when the run ended
    pub time_left: i32,
    pub bonus_found: bool,
}

impl HighScoreEntry {
    pub fn from_session(session: &GameSession) -> Self {
        Self {
            score: session.calculate_score(),
            time_left: session.clock().time_left(),
            bonus_found: session.bonus() == Bonus::Found,
        }
    }
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard. Zero and negative
    /// scores (clock ran out) never do.
    pub fn qualifies(&self, score: i32) -> bool {
        if score <= 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: i32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a new entry (if it qualifies).
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify.
    pub fn add(&mut self, entry: HighScoreEntry) -> Option<usize> {
        if !self.qualifies(entry.score) {
            return None;
        }

        let pos = self.entries.iter().position(|e| entry.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<i32> {
        self.entries.first().map(|e| e.score)
    }

    /// Load high scores from `path`, starting fresh if there are none
    pub fn load(path: &Path) -> Self {
        let loaded = fs::read_to_string(path)
            .map_err(StoreError::from)
            .and_then(|json| serde_json::from_str::<HighScores>(&json).map_err(StoreError::from));
        match loaded {
            Ok(scores) => {
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Err(e) => {
                log::info!("No high scores found, starting fresh ({})", e);
                Self::new()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(score: i32) -> HighScoreEntry {
        HighScoreEntry {
            score,
            time_left: score / 1000,
            bonus_found: false,
        }
    }

    #[test]
    fn test_non_positive_scores_never_qualify() {
        let scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert!(!scores.qualifies(-50_000));
        assert!(scores.qualifies(1));
    }

    #[test]
    fn test_ranked_insertion() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add(entry(5_000)), Some(1));
        assert_eq!(scores.add(entry(9_000)), Some(1));
        assert_eq!(scores.add(entry(7_000)), Some(2));
        assert_eq!(scores.top_score(), Some(9_000));
        assert_eq!(scores.potential_rank(6_000), Some(3));
    }

    #[test]
    fn test_table_is_capped() {
        let mut scores = HighScores::new();
        for i in 1..=MAX_HIGH_SCORES as i32 {
            scores.add(entry(i * 1_000));
        }
        assert!(!scores.qualifies(1_000));
        assert_eq!(scores.add(entry(500)), None);
        assert_eq!(scores.add(entry(50_000)), Some(1));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(2_000));
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!(
            "maze_escape_scores_{}.json",
            std::process::id()
        ));
        let mut scores = HighScores::new();
        scores.add(entry(42_000));
        scores.save(&path).unwrap();
        let loaded = HighScores::load(&path);
        let _ = fs::remove_file(&path);
        assert_eq!(loaded.entries, scores.entries);
    }
}
