use alloc::{format, string::String, vec::Vec};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::*;

pub const LEADERBOARD_CAPACITY: usize = 50;

pub fn best_score_key(difficulty: Difficulty, mode: GameMode) -> String {
    format!("bestScore_{}_{}", difficulty.key(), mode.key())
}

/// Best finished game for one `(difficulty, mode)` pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestScoreRecord {
    pub moves: Count,
    pub time: Count,
    pub difficulty: Difficulty,
    pub mode: GameMode,
    pub score: Score,
    pub player_name: String,
    pub date: DateTime<Utc>,
}

impl BestScoreRecord {
    pub fn load(store: &impl KeyValueStore, difficulty: Difficulty, mode: GameMode) -> Option<Self> {
        load_json(store, &best_score_key(difficulty, mode))
    }

    pub fn save(&self, store: &mut impl KeyValueStore) {
        save_json(store, &best_score_key(self.difficulty, self.mode), self)
    }

    /// Whether `score` beats `current`, a missing record is always beaten.
    pub fn is_improved_by(current: Option<&Self>, score: Score) -> bool {
        current.is_none_or(|record| score > record.score)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub player_name: String,
    pub score: Score,
    pub moves: Count,
    pub time: Count,
    pub difficulty: Difficulty,
    pub mode: GameMode,
    pub date: DateTime<Utc>,
}

/// Best games over every difficulty and mode, highest score first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl StorageKey for Leaderboard {
    const KEY: &'static str = "leaderboard";
}

impl Leaderboard {
    /// Loads the stored board, re-sorting it in case it was edited by hand.
    pub fn load(store: &impl KeyValueStore) -> Self {
        let mut leaderboard = Self::load_or_default(store);
        leaderboard.normalize();
        leaderboard
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn top(&self, count: usize) -> &[LeaderboardEntry] {
        &self.entries[..count.min(self.entries.len())]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts `entry` and returns its rank, or `None` when it did not make
    /// the cut. Entries with equal scores keep their insertion order.
    pub fn insert(&mut self, entry: LeaderboardEntry) -> Option<u32> {
        let position = self
            .entries
            .iter()
            .position(|existing| existing.score < entry.score)
            .unwrap_or(self.entries.len());
        if position >= LEADERBOARD_CAPACITY {
            return None;
        }

        self.entries.insert(position, entry);
        self.entries.truncate(LEADERBOARD_CAPACITY);
        self.rerank();
        Some(position as u32 + 1)
    }

    fn normalize(&mut self) {
        // stable, so equal scores keep their stored order
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(LEADERBOARD_CAPACITY);
        self.rerank();
    }

    fn rerank(&mut self) {
        for (index, entry) in self.entries.iter_mut().enumerate() {
            entry.rank = index as u32 + 1;
        }
    }
}

/// Totals over every game won on this device.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Statistics {
    pub total_games: Count,
    pub total_wins: Count,
    pub total_moves: Count,
    pub total_time: Count,
    pub best_score: Score,
    pub average_score: f64,
    pub perfect_games: Count,
    pub hints_used: Count,
}

impl StorageKey for Statistics {
    const KEY: &'static str = "statistics";
}

impl Statistics {
    pub fn record_win(&mut self, metrics: &GameMetrics, score: Score) {
        self.total_games = self.total_games.saturating_add(1);
        self.total_moves = self.total_moves.saturating_add(metrics.moves);
        self.total_time = self.total_time.saturating_add(metrics.elapsed_secs);
        self.hints_used = self.hints_used.saturating_add(metrics.hints_used);
        self.total_wins = self.total_wins.saturating_add(1);
        self.best_score = self.best_score.max(score);
        self.average_score += (f64::from(score) - self.average_score) / f64::from(self.total_wins);
        if metrics.is_perfect() {
            self.perfect_games = self.perfect_games.saturating_add(1);
        }
    }

    /// Percentage of played games that were won.
    pub fn win_rate(&self) -> f64 {
        if self.total_games == 0 {
            0.0
        } else {
            f64::from(self.total_wins) * 100.0 / f64::from(self.total_games)
        }
    }

    pub fn average_moves(&self) -> f64 {
        if self.total_games == 0 {
            0.0
        } else {
            f64::from(self.total_moves) / f64::from(self.total_games)
        }
    }

    /// Whole seconds per played game.
    pub fn average_time(&self) -> Count {
        self.total_time.checked_div(self.total_games).unwrap_or(0)
    }
}
