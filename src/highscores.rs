//! Best score
//!
//! A single number persisted to LocalStorage. Anything unreadable in storage
//! counts as zero.

use serde::{Deserialize, Serialize};

use crate::platform::storage;

/// The best score seen across sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HighScore {
    best: u64,
}

impl HighScore {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "sr_high";

    pub fn new(best: u64) -> Self {
        Self { best }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Record a finished run. Returns true if it set a new best.
    pub fn record(&mut self, score: u64) -> bool {
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }

    /// Decode a stored value. Missing, non-numeric, negative or
    /// non-finite values all read as zero.
    pub fn parse(raw: Option<&str>) -> Self {
        let best = raw
            .and_then(|s| serde_json::from_str::<f64>(s.trim()).ok())
            .filter(|v| v.is_finite() && *v > 0.0)
            .map(|v| v.floor() as u64)
            .unwrap_or(0);
        Self { best }
    }

    /// Load the best score from storage
    pub fn load() -> Self {
        let raw = storage::load(Self::STORAGE_KEY);
        let high = Self::parse(raw.as_deref());
        log::info!("High score: {}", high.best);
        high
    }

    /// Save the best score to storage
    pub fn save(&self) {
        if storage::store_json(Self::STORAGE_KEY, &self.best) {
            log::info!("High score saved ({})", self.best);
        }
    }
}
