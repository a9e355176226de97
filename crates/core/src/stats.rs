//! Stats module - aggregate score statistics per skill level
//!
//! The engine reports each finished game exactly once; the storage keeps a
//! small record (high score, running average, game count) keyed by skill
//! level. The record's backing store is injected through [`StatsStore`] so
//! the core stays free of I/O; the adapter crate provides a JSON file
//! store, tests use [`MemoryStore`].
//!
//! A report is ignored (and the stored record returned unchanged) when
//! training mode is on, the score is 0, or the same game id was already
//! reported.

use std::collections::HashMap;

use token_trap_types::Settings;

use crate::state::State;

/// Persisted aggregate values for one skill level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsValues {
    pub high_score: u32,
    pub average_score: f64,
    pub number_of_games: u32,
}

impl StatsValues {
    pub fn zero() -> Self {
        Self {
            high_score: 0,
            average_score: 0.0,
            number_of_games: 0,
        }
    }

    /// Fold one finished game into the aggregates
    pub fn updated_with(&self, score: u32) -> Self {
        let previous_total = f64::from(self.number_of_games) * self.average_score;
        let number_of_games = self.number_of_games + 1;
        Self {
            high_score: self.high_score.max(score),
            average_score: (previous_total + f64::from(score)) / f64::from(number_of_games),
            number_of_games,
        }
    }
}

/// Result of reporting a game to the storage
#[derive(Debug, Clone, PartialEq)]
pub struct Stats {
    pub values: StatsValues,
    pub is_new_high_score: bool,
    pub settings: Settings,
}

/// Keyed get/put backing for persisted stats records
pub trait StatsStore {
    fn load(&self, key: &str) -> Option<StatsValues>;
    fn save(&mut self, key: &str, values: &StatsValues);
}

/// Process-local store, used in tests and as the default backing
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, StatsValues>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatsStore for MemoryStore {
    fn load(&self, key: &str) -> Option<StatsValues> {
        self.entries.get(key).copied()
    }

    fn save(&mut self, key: &str, values: &StatsValues) {
        self.entries.insert(key.to_string(), *values);
    }
}

/// Reads and writes aggregate score statistics for one session
pub struct StatsStorage {
    settings: Settings,
    store: Box<dyn StatsStore + Send>,
    last_game_id: Option<u32>,
}

impl StatsStorage {
    pub fn new(settings: Settings, store: Box<dyn StatsStore + Send>) -> Self {
        Self {
            settings,
            store,
            last_game_id: None,
        }
    }

    pub fn in_memory(settings: Settings) -> Self {
        Self::new(settings, Box::new(MemoryStore::new()))
    }

    fn key(&self) -> String {
        format!("stats.{}", self.settings.skill_level.as_str())
    }

    /// Fold the finished game into the stored record and return the result
    ///
    /// When the report is ineligible the stored values come back untouched
    /// with `is_new_high_score` false.
    pub fn updated_stats(&mut self, state: &State) -> Stats {
        let key = self.key();
        let stored = self.store.load(&key).unwrap_or_else(StatsValues::zero);
        if !self.can_update(state) {
            return Stats {
                values: stored,
                is_new_high_score: false,
                settings: self.settings,
            };
        }
        self.last_game_id = Some(state.game_id);
        let stats = Stats {
            values: stored.updated_with(state.score),
            is_new_high_score: state.score > stored.high_score,
            settings: self.settings,
        };
        self.store.save(&key, &stats.values);
        stats
    }

    fn can_update(&self, state: &State) -> bool {
        !self.settings.is_training_mode
            && state.score > 0
            && self.last_game_id != Some(state.game_id)
    }
}
