//! High score leaderboard and session score keeping
//!
//! Persisted as JSON, tracks the top 10 scores.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::persistence;
use crate::sim::{GameOverReason, ScoreSink};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u64,
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Must beat the lowest entry, ties keep the older one
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if it didn't make it
    pub fn add_score(&mut self, name: &str, score: u64) -> Option<usize> {
        if self
            .entries
            .iter()
            .any(|e| e.name == name && e.score == score)
        {
            return None;
        }
        let rank = self.potential_rank(score)?;

        self.entries.insert(
            rank - 1,
            LeaderboardEntry {
                name: name.to_string(),
                score,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// The best `n` entries, best first
    pub fn top(&self, n: usize) -> &[LeaderboardEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// Load from a JSON file, empty when missing or unreadable
    pub fn load(path: &Path) -> Self {
        let mut scores: Leaderboard = persistence::load_json_or_default(path);
        // Hand-edited files may be unsorted or too long
        scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
        scores.entries.truncate(MAX_HIGH_SCORES);
        log::info!("Loaded {} high scores", scores.entries.len());
        scores
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        persistence::save_json(path, self)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

/// Session score keeper, usable directly as the tick's score sink
#[derive(Debug, Clone)]
pub struct ScoreKeeper {
    pub player_name: String,
    pub score: u64,
    /// Best of the leaderboard top score and this session
    pub high_score: u64,
    /// Highest level cleared this session
    pub levels_cleared: u32,
    pub leaderboard: Leaderboard,
    /// Rank earned at game over, if any
    pub final_rank: Option<usize>,
    path: Option<PathBuf>,
}

impl ScoreKeeper {
    /// Keeper with an in-memory leaderboard
    pub fn new(player_name: impl Into<String>, leaderboard: Leaderboard) -> Self {
        let high_score = leaderboard.top_score().unwrap_or(0);
        Self {
            player_name: player_name.into(),
            score: 0,
            high_score,
            levels_cleared: 0,
            leaderboard,
            final_rank: None,
            path: None,
        }
    }

    /// Keeper backed by a leaderboard file, saved on every game over
    pub fn with_file(player_name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut keeper = Self::new(player_name, Leaderboard::load(&path));
        keeper.path = Some(path);
        keeper
    }

    /// Clear the session score for a restart, keeping the leaderboard
    pub fn reset(&mut self) {
        self.score = 0;
        self.levels_cleared = 0;
        self.final_rank = None;
    }
}

impl ScoreSink for ScoreKeeper {
    fn add_points(&mut self, amount: u32) {
        self.score += u64::from(amount);
        self.high_score = self.high_score.max(self.score);
    }

    fn game_over(&mut self, reason: GameOverReason) {
        self.final_rank = self.leaderboard.add_score(&self.player_name, self.score);
        log::info!(
            "{} finished with {} points ({:?}), rank {:?}",
            self.player_name,
            self.score,
            reason,
            self.final_rank
        );
        if let Some(path) = &self.path {
            if let Err(e) = self.leaderboard.save(path) {
                log::warn!("Could not save high scores: {e}");
            }
        }
    }

    fn level_cleared(&mut self, level: u32) {
        self.levels_cleared = self.levels_cleared.max(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(scores: &[u64]) -> Leaderboard {
        let mut board = Leaderboard::new();
        for (i, &score) in scores.iter().enumerate() {
            board.add_score(&format!("p{i}"), score);
        }
        board
    }

    #[test]
    fn test_sorted_descending() {
        let board = board(&[300, 100, 500, 200]);
        let scores: Vec<u64> = board.entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![500, 300, 200, 100]);
        assert_eq!(board.top_score(), Some(500));
        assert_eq!(board.top(2).len(), 2);
        assert_eq!(board.top(50).len(), 4);
    }

    #[test]
    fn test_ties_keep_earlier_entry_first() {
        let mut board = board(&[200]);
        assert_eq!(board.add_score("late", 200), Some(2));
        assert_eq!(board.entries[0].name, "p0");
        assert_eq!(board.entries[1].name, "late");
    }

    #[test]
    fn test_duplicate_entry_rejected() {
        let mut board = Leaderboard::new();
        assert_eq!(board.add_score("ace", 400), Some(1));
        assert_eq!(board.add_score("ace", 400), None);
        assert_eq!(board.entries.len(), 1);
        // Same score, other player is fine
        assert_eq!(board.add_score("bob", 400), Some(2));
    }

    #[test]
    fn test_full_board_needs_strictly_better() {
        let scores: Vec<u64> = (1..=10).map(|i| i * 100).collect();
        let mut board = board(&scores);
        assert_eq!(board.entries.len(), MAX_HIGH_SCORES);
        assert!(!board.qualifies(100));
        assert_eq!(board.add_score("new", 100), None);
        assert_eq!(board.potential_rank(150), Some(10));
        assert_eq!(board.add_score("new", 1_100), Some(1));
        assert_eq!(board.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(board.entries.last().map(|e| e.score), Some(200));
    }

    #[test]
    fn test_zero_score_allowed_on_short_board() {
        let mut board = Leaderboard::new();
        assert_eq!(board.add_score("idle", 0), Some(1));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        let board = board(&[700, 300]);
        board.save(&path).unwrap();

        let loaded = Leaderboard::load(&path);
        assert_eq!(loaded.entries, board.entries);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Leaderboard::load(&dir.path().join("none.json")).is_empty());
    }

    #[test]
    fn test_keeper_records_game_over() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        board(&[250]).save(&path).unwrap();

        let mut keeper = ScoreKeeper::with_file("ace", &path);
        assert_eq!(keeper.high_score, 250);
        keeper.add_points(100);
        keeper.add_points(100);
        keeper.add_points(100);
        assert_eq!(keeper.high_score, 300);
        keeper.level_cleared(1);
        keeper.game_over(GameOverReason::Invaded);

        assert_eq!(keeper.final_rank, Some(1));
        assert_eq!(keeper.levels_cleared, 1);
        let stored = Leaderboard::load(&path);
        assert_eq!(stored.top_score(), Some(300));
        assert_eq!(stored.entries[0].name, "ace");
    }
}
