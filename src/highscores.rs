//! High score leaderboard
//!
//! Fed with finished sessions, tracks the top 10 scores. The host decides
//! where the serialized board is kept.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sim::Session;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Final score
    pub score: u64,
    /// Largest tile on the board
    pub max_tile: u32,
    /// Board edge the game was played on
    pub size: usize,
}

impl HighScoreEntry {
    /// Ordering key: score first, the bigger tile breaks ties
    fn rank_key(&self) -> (u64, u32) {
        (self.score, self.max_tile)
    }
}

/// High score leaderboard, best first. Equal scores are ordered by largest
/// tile; among full ties the earlier entry stays ahead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot (0-indexed) a result would take, if it makes the board
    fn slot(&self, score: u64, max_tile: u32) -> Option<usize> {
        if score == 0 {
            return None;
        }
        let slot = self
            .entries
            .partition_point(|e| e.rank_key() >= (score, max_tile));
        (slot < MAX_HIGH_SCORES).then_some(slot)
    }

    /// Whether a finished game with this score and best tile makes the board
    pub fn qualifies(&self, score: u64, max_tile: u32) -> bool {
        self.slot(score, max_tile).is_some()
    }

    /// 1-indexed rank the result would take, None if it misses the board
    pub fn potential_rank(&self, score: u64, max_tile: u32) -> Option<usize> {
        self.slot(score, max_tile).map(|slot| slot + 1)
    }

    /// Insert an entry, keeping at most `MAX_HIGH_SCORES`.
    /// Returns the 1-indexed rank, or None if it did not make the board.
    pub fn add_entry(&mut self, entry: HighScoreEntry) -> Option<usize> {
        let slot = self.slot(entry.score, entry.max_tile)?;
        self.entries.insert(slot, entry);
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(slot + 1)
    }

    /// Record a session's result. Sessions still in play are ignored.
    pub fn record(&mut self, session: &Session) -> Option<usize> {
        if session.is_running() {
            return None;
        }
        let rank = self.add_entry(HighScoreEntry {
            score: session.score(),
            max_tile: session.max_tile(),
            size: session.size(),
        });
        if let Some(rank) = rank {
            log::info!(
                "New high score #{rank}: {} (best tile {})",
                session.score(),
                session.max_tile()
            );
        }
        rank
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Largest tile across all recorded games
    pub fn best_tile(&self) -> Option<u32> {
        self.entries.iter().map(|e| e.max_tile).max()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a stored leaderboard, starting fresh if it cannot be read
    pub fn load_or_default(text: &str) -> Self {
        match serde_json::from_str::<HighScores>(text) {
            Ok(mut scores) => {
                scores.entries.sort_by_key(|e| std::cmp::Reverse(e.rank_key()));
                scores.entries.truncate(MAX_HIGH_SCORES);
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Err(err) => {
                log::warn!("No usable high scores ({err}), starting fresh");
                Self::new()
            }
        }
    }
}
