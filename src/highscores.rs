//! Per-difficulty best scores and the attempt counter
//!
//! Persisted to LocalStorage on wasm. The simulation core never touches
//! this; it only emits score updates and the caller decides what to keep.

use serde::{Deserialize, Serialize};

use crate::sim::Difficulty;

/// Player-local score book: best per difficulty plus total attempts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BestScores {
    pub easy: Option<u64>,
    pub medium: Option<u64>,
    pub nightmare: Option<u64>,
    /// Runs started across all sessions, retries included
    pub attempts: u32,
}

impl BestScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "planet_dash_scores";

    pub fn new() -> Self {
        Self::default()
    }

    /// Best score recorded for a difficulty
    pub fn best_for(&self, difficulty: Difficulty) -> Option<u64> {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Nightmare => self.nightmare,
        }
    }

    /// Record a finished run's score. Returns true when it set a new best.
    pub fn record(&mut self, difficulty: Difficulty, score: u64) -> bool {
        let slot = match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Nightmare => &mut self.nightmare,
        };
        if slot.is_none_or(|best| score > best) {
            *slot = Some(score);
            return true;
        }
        false
    }

    /// Count a started run (first run and every retry)
    pub fn count_attempt(&mut self) {
        self.attempts = self.attempts.saturating_add(1);
    }

    /// Load from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(scores) = serde_json::from_str::<BestScores>(&json) {
                    log::info!("Loaded best scores ({} attempts)", scores.attempts);
                    return scores;
                }
            }
        }

        log::info!("No stored scores found, starting fresh");
        Self::new()
    }

    /// Save to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Best scores saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_the_max() {
        let mut scores = BestScores::new();
        assert!(scores.record(Difficulty::Medium, 100));
        assert!(!scores.record(Difficulty::Medium, 80));
        assert!(scores.record(Difficulty::Medium, 150));
        assert_eq!(scores.best_for(Difficulty::Medium), Some(150));
        // Other difficulties untouched
        assert_eq!(scores.best_for(Difficulty::Easy), None);
        assert_eq!(scores.best_for(Difficulty::Nightmare), None);
    }

    #[test]
    fn test_equal_score_is_not_a_new_best() {
        let mut scores = BestScores::new();
        scores.record(Difficulty::Nightmare, 300);
        assert!(!scores.record(Difficulty::Nightmare, 300));
    }

    #[test]
    fn test_attempts_accumulate() {
        let mut scores = BestScores::new();
        scores.count_attempt();
        scores.count_attempt();
        assert_eq!(scores.attempts, 2);
    }

    #[test]
    fn test_json_round_trip() {
        let mut scores = BestScores::new();
        scores.record(Difficulty::Easy, 42);
        scores.count_attempt();
        let json = serde_json::to_string(&scores).unwrap();
        let back: BestScores = serde_json::from_str(&json).unwrap();
        assert_eq!(back, scores);
    }
}
