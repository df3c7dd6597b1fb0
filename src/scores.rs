//! Best-round leaderboard
//!
//! Session-local, tracks the ten best finished rounds. Blackbox penalties
//! score like golf, so entries sort ascending and a LOWER penalty ranks
//! higher.

use serde::{Deserialize, Serialize};

/// Maximum number of best rounds to keep
pub const MAX_BEST_SCORES: usize = 10;

/// A single finished-round entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestScoreEntry {
    /// Final penalty for the round
    pub penalty: u32,
    /// Hidden markers the player found
    pub found: usize,
    /// Hidden markers the round was dealt with
    pub marker_count: usize,
}

/// Best-round leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BestScores {
    pub entries: Vec<BestScoreEntry>,
}

impl BestScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a penalty qualifies for the leaderboard
    pub fn qualifies(&self, penalty: u32) -> bool {
        if self.entries.len() < MAX_BEST_SCORES {
            return true;
        }
        // Check if the penalty beats the worst kept entry
        self.entries
            .last()
            .map(|e| penalty < e.penalty)
            .unwrap_or(true)
    }

    /// Get the rank a penalty would achieve (1-indexed, None if it doesn't
    /// qualify)
    pub fn potential_rank(&self, penalty: u32) -> Option<usize> {
        if !self.qualifies(penalty) {
            return None;
        }
        let rank = self.entries.iter().position(|e| penalty < e.penalty);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a finished round (if it qualifies).
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify
    pub fn add_score(&mut self, penalty: u32, found: usize, marker_count: usize) -> Option<usize> {
        if !self.qualifies(penalty) {
            return None;
        }

        let entry = BestScoreEntry {
            penalty,
            found,
            marker_count,
        };

        // Find insertion point (sorted ascending by penalty; earlier rounds
        // win ties)
        let pos = self.entries.iter().position(|e| penalty < e.penalty);
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

        // Trim to max size
        self.entries.truncate(MAX_BEST_SCORES);

        Some(rank)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the best penalty so far (if any)
    pub fn best_penalty(&self) -> Option<u32> {
        self.entries.first().map(|e| e.penalty)
    }
}
