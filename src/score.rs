//! Run scoring
//!
//! Derived from the run snapshot by the consuming layer; the simulation core
//! never sees these numbers. Persistence and best-score comparison stay with
//! the caller (see `highscores`).

use crate::sim::Difficulty;

/// Points per full scroll divisor traveled
pub const SCORE_UNIT: u64 = 10;
/// Distance units per score unit
pub const SCORE_DIVISOR: f32 = 100.0;
/// Flat bonus for touching the goal planet
pub const WIN_BONUS: u64 = 500;

/// Final score for one run
///
/// Base distance score plus collectible bonus plus the win bonus, all scaled
/// by the difficulty multiplier (x1/x2/x3).
pub fn run_score(scroll: f32, collected_points: u32, won: bool, difficulty: Difficulty) -> u64 {
    let distance_units = (scroll.max(0.0) / SCORE_DIVISOR).floor() as u64;
    let base = SCORE_UNIT * distance_units + collected_points as u64;
    let bonus = if won { WIN_BONUS } else { 0 };
    (base + bonus) * difficulty.score_multiplier()
}
