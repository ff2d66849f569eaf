//! Run lifecycle state machine
//!
//! Orchestrates one run from idle through flight to its single terminal
//! outcome, including score bookkeeping and the timed win sequence
//! (landed → transitioning → outro). The physics tick only raises events;
//! everything time-delayed or score-related happens here.

use serde::{Deserialize, Serialize};

use crate::score::run_score;
use crate::sim::{Difficulty, GoalHit};

/// Non-interactive cool-down after a crash, so a stray double-tap cannot
/// instantly restart the run
pub const GAME_OVER_COOLDOWN_SECS: f32 = 0.45;
/// How long the "you made it" card stays up after landing
pub const LANDED_DWELL_SECS: f32 = 1.6;
/// Duration of the full-screen outro transition
pub const TRANSITION_SECS: f32 = 2.4;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the first flap
    Idle,
    /// Active gameplay
    Flying,
    /// Crashed; awaiting an explicit reset (after the cool-down)
    GameOver,
    /// Touched the goal; resting on it while the win card shows
    Landed,
    /// Decorative full-screen transition is running
    Transitioning,
    /// Terminal; the reach-end signal has fired and the host tears us down
    Outro,
}

/// Score notification emitted on a terminal transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreUpdate {
    pub score: u64,
    pub difficulty: Difficulty,
    /// True when this run beat the stored best for its difficulty
    pub is_best: bool,
}

/// Drives phase transitions and consumes terminal payloads exactly once
#[derive(Debug, Clone)]
pub struct PhaseMachine {
    phase: Phase,
    difficulty: Difficulty,
    /// Best score for this difficulty, updated when a run beats it
    best: Option<u64>,
    final_score: Option<u64>,
    /// Seconds left on whichever timer the current phase runs
    timer: f32,
    /// Win payload, handed out once when the outro begins
    pending_goal: Option<GoalHit>,
}

impl PhaseMachine {
    pub fn new(difficulty: Difficulty, best: Option<u64>) -> Self {
        Self {
            phase: Phase::Idle,
            difficulty,
            best,
            final_score: None,
            timer: 0.0,
            pending_goal: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Final score of the finished run, if one finished
    pub fn final_score(&self) -> Option<u64> {
        self.final_score
    }

    /// Current best for this difficulty (includes the run just finished)
    pub fn best(&self) -> Option<u64> {
        self.best
    }

    /// The first flap was consumed: idle → flying
    pub fn note_started(&mut self) {
        if self.phase == Phase::Idle {
            self.phase = Phase::Flying;
        }
    }

    /// Physics reported a crash. Duplicates are absorbed silently.
    pub fn on_game_over(&mut self, scroll: f32, collected_points: u32) -> Option<ScoreUpdate> {
        if self.phase != Phase::Flying {
            return None;
        }
        self.phase = Phase::GameOver;
        self.timer = GAME_OVER_COOLDOWN_SECS;
        Some(self.settle_score(scroll, collected_points, false))
    }

    /// Physics reported goal contact. Duplicates are absorbed silently.
    pub fn on_goal_reached(&mut self, hit: GoalHit, collected_points: u32) -> Option<ScoreUpdate> {
        if self.phase != Phase::Flying {
            return None;
        }
        self.phase = Phase::Landed;
        self.timer = LANDED_DWELL_SECS;
        self.pending_goal = Some(hit);
        Some(self.settle_score(hit.scroll, collected_points, true))
    }

    /// Advance the phase timers. Returns the win payload exactly once, at
    /// the moment the transition finishes and the outro begins.
    pub fn step(&mut self, dt_secs: f32) -> Option<GoalHit> {
        match self.phase {
            Phase::GameOver => {
                self.timer = (self.timer - dt_secs).max(0.0);
                None
            }
            Phase::Landed => {
                self.timer -= dt_secs;
                if self.timer <= 0.0 {
                    self.phase = Phase::Transitioning;
                    self.timer = TRANSITION_SECS;
                }
                None
            }
            Phase::Transitioning => {
                self.timer -= dt_secs;
                if self.timer <= 0.0 {
                    self.phase = Phase::Outro;
                    self.timer = 0.0;
                    return self.pending_goal.take();
                }
                None
            }
            _ => None,
        }
    }

    /// Whether a reset request is currently honored
    ///
    /// Always, except during the post-crash cool-down window.
    pub fn can_retry(&self) -> bool {
        self.phase != Phase::GameOver || self.timer <= 0.0
    }

    /// Start over: cancel any pending dwell/transition timers and drop an
    /// unconsumed win payload so a stale callback cannot leak into the new run.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.timer = 0.0;
        self.final_score = None;
        self.pending_goal = None;
    }

    fn settle_score(&mut self, scroll: f32, collected_points: u32, won: bool) -> ScoreUpdate {
        let score = run_score(scroll, collected_points, won, self.difficulty);
        let is_best = self.best.is_none_or(|b| score > b);
        if is_best {
            self.best = Some(score);
        }
        self.final_score = Some(score);
        log::info!(
            "run finished: score={score} difficulty={} won={won} best={is_best}",
            self.difficulty.as_str()
        );
        ScoreUpdate {
            score,
            difficulty: self.difficulty,
            is_best,
        }
    }
}
