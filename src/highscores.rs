//! Best-score tracking
//!
//! A single integer persisted to LocalStorage under a fixed key.

use crate::platform::storage::{self, KeyValueStore};

/// Best score seen so far, backed by a key-value store
pub struct HighScore {
    best: u64,
    storage: Box<dyn KeyValueStore>,
}

impl std::fmt::Debug for HighScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighScore").field("best", &self.best).finish()
    }
}

impl HighScore {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "moon_lander_high_score";

    /// Read the stored best score. Missing or unreadable values start at 0.
    pub fn load(storage: Box<dyn KeyValueStore>) -> Self {
        let best = match storage::load_json::<u64>(storage.as_ref(), Self::STORAGE_KEY) {
            Ok(Some(best)) => {
                log::info!("Loaded high score {}", best);
                best
            }
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                0
            }
            Err(e) => {
                log::warn!("Ignoring stored high score: {e}");
                0
            }
        };
        Self { best, storage }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Offer a score. Persists and returns true only when it strictly beats
    /// the current best.
    pub fn submit(&mut self, score: u64) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        match storage::save_json(self.storage.as_mut(), Self::STORAGE_KEY, &score) {
            Ok(()) => log::info!("New high score {} saved", score),
            Err(e) => log::warn!("High score {} not saved: {e}", score),
        }
        true
    }
}
