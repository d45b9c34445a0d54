//! Current level of every building.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LevelWriteError {
    #[error("building index {index} is out of range (count {count})")]
    OutOfRange { index: usize, count: usize },
}

/// Storage the upgrade service reads and writes building levels through.
pub trait LevelStore {
    fn building_count(&self) -> usize;

    fn level(&self, index: usize) -> Option<u32>;

    /// # Errors
    ///
    /// Returns [`LevelWriteError`] when the level cannot be stored.
    fn try_set_level(&mut self, index: usize, level: u32) -> Result<(), LevelWriteError>;
}

/// Per-building levels. The array only ever grows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VillageProgressState {
    levels: Vec<u32>,
}

impl VillageProgressState {
    /// All buildings start at level 0.
    #[must_use]
    pub fn new(building_count: usize) -> Self {
        Self {
            levels: vec![0; building_count],
        }
    }

    #[must_use]
    pub const fn from_levels(levels: Vec<u32>) -> Self {
        Self { levels }
    }

    #[must_use]
    pub fn levels(&self) -> &[u32] {
        &self.levels
    }

    #[must_use]
    pub fn level_or_default(&self, index: usize) -> u32 {
        self.levels.get(index).copied().unwrap_or(0)
    }

    /// Grow to at least `building_count` buildings; never shrinks.
    pub fn ensure_capacity(&mut self, building_count: usize) {
        if building_count > self.levels.len() {
            self.levels.resize(building_count, 0);
        }
    }
}

impl LevelStore for VillageProgressState {
    fn building_count(&self) -> usize {
        self.levels.len()
    }

    fn level(&self, index: usize) -> Option<u32> {
        self.levels.get(index).copied()
    }

    fn try_set_level(&mut self, index: usize, level: u32) -> Result<(), LevelWriteError> {
        let count = self.levels.len();
        let slot = self
            .levels
            .get_mut(index)
            .ok_or(LevelWriteError::OutOfRange { index, count })?;
        *slot = level;
        Ok(())
    }
}
