//! High score
//!
//! A single best score, persisted to the key/value store as a plain integer.

use serde::{Deserialize, Serialize};

use crate::consts::HIGH_SCORE_KEY;
use crate::platform::{KeyValueStore, StorageError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    pub fn new() -> Self {
        Self { best: 0 }
    }

    /// Check if a score beats the stored best
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best
    }

    /// Keep `score` if it beats the best. Returns true if it did.
    pub fn record(&mut self, score: u64) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        true
    }

    /// Load from storage; missing or malformed values start at zero
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get_item(HIGH_SCORE_KEY) {
            Ok(Some(raw)) => match raw.trim().parse::<u64>() {
                Ok(best) => {
                    log::info!("Loaded high score {best}");
                    Self { best }
                }
                Err(_) => {
                    log::warn!("Ignoring malformed high score {raw:?}");
                    Self::new()
                }
            },
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Could not read high score: {e}");
                Self::new()
            }
        }
    }

    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StorageError> {
        store.set_item(HIGH_SCORE_KEY, &self.best.to_string())?;
        log::info!("High score saved ({})", self.best);
        Ok(())
    }

    /// Game-over hook: record the run's score and persist only if improved
    pub fn submit(
        &mut self,
        score: u64,
        store: &mut impl KeyValueStore,
    ) -> Result<bool, StorageError> {
        if !self.record(score) {
            return Ok(false);
        }
        self.save(store)?;
        Ok(true)
    }
}
