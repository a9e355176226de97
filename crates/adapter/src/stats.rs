//! Persisted stats backing
//!
//! Stores one small JSON record per stats key (`stats.basic`,
//! `stats.expert`) under a directory chosen by the host. The core's
//! [`StatsStore`] contract is infallible (a storage hiccup must never take
//! the game down), so the trait impl degrades to "record missing" / "write
//! skipped"; the fallible `read`/`write` forms are there for hosts that
//! want the error.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use token_trap_core::{StatsStore, StatsValues};

/// On-disk shape of one stats record
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct StoredValues {
    high_score: u32,
    average_score: f64,
    number_of_games: u32,
}

impl From<StatsValues> for StoredValues {
    fn from(values: StatsValues) -> Self {
        Self {
            high_score: values.high_score,
            average_score: values.average_score,
            number_of_games: values.number_of_games,
        }
    }
}

impl From<StoredValues> for StatsValues {
    fn from(stored: StoredValues) -> Self {
        Self {
            high_score: stored.high_score,
            average_score: stored.average_score,
            number_of_games: stored.number_of_games,
        }
    }
}

/// JSON-file implementation of the core's keyed stats store
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open (and create if needed) the storage directory
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("create stats directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Read a record, `Ok(None)` when the key has never been written
    pub fn read(&self, key: &str) -> Result<Option<StatsValues>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("read stats record {}", path.display()))?;
        let stored: StoredValues = serde_json::from_str(&data)
            .with_context(|| format!("parse stats record {}", path.display()))?;
        Ok(Some(stored.into()))
    }

    pub fn write(&self, key: &str, values: &StatsValues) -> Result<()> {
        let path = self.path_for(key);
        let data = serde_json::to_string(&StoredValues::from(*values))?;
        fs::write(&path, data)
            .with_context(|| format!("write stats record {}", path.display()))
    }
}

impl StatsStore for JsonFileStore {
    fn load(&self, key: &str) -> Option<StatsValues> {
        self.read(key).ok().flatten()
    }

    fn save(&mut self, key: &str, values: &StatsValues) {
        let _ = self.write(key, values);
    }
}
