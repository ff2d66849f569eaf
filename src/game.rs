//! Engine facade: one live mini-game run
//!
//! Owns the tuned level, the run state and the phase machine, consumes the
//! single-writer flap flag, and exposes two snapshot outputs: an
//! authoritative per-tick one for collision-accurate consumers and a
//! throttled one for UI/render, which must never feed back into physics.

use crate::consts::*;
use crate::phase::{Phase, PhaseMachine, ScoreUpdate};
use crate::sim::level::base_party_level;
use crate::sim::tick::advance;
use crate::sim::{Difficulty, EdgeInsets, GoalHit, Level, RunState, Snapshot, TickEvent};

/// Viewport and player-box configuration, in logical units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameConfig {
    pub viewport_w: f32,
    pub viewport_h: f32,
    pub player_w: f32,
    pub player_h: f32,
    /// Collision forgiveness for transparent sprite padding
    pub insets: EdgeInsets,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            viewport_w: LOGICAL_WIDTH,
            viewport_h: LOGICAL_HEIGHT,
            player_w: PLAYER_WIDTH,
            player_h: PLAYER_HEIGHT,
            insets: EdgeInsets::default(),
        }
    }
}

/// Callback hooks into the surrounding screens
///
/// All optional; a hook left unset is simply skipped.
#[derive(Default)]
pub struct Hooks {
    /// The run crashed
    pub on_game_over: Option<Box<dyn FnMut()>>,
    /// The full win sequence completed; tear the mini-game down
    pub on_reach_end: Option<Box<dyn FnMut(GoalHit)>>,
    /// A collectible was picked up, carrying its point value
    pub on_collect: Option<Box<dyn FnMut(u32)>>,
    /// A run finished and produced a final score
    pub on_score_changed: Option<Box<dyn FnMut(ScoreUpdate)>>,
}

/// A single mini-game instance for one difficulty selection
pub struct FlightGame {
    level: Level,
    difficulty: Difficulty,
    config: GameConfig,
    state: RunState,
    machine: PhaseMachine,
    hooks: Hooks,
    /// Single-writer/single-reader input flag; repeated taps before a tick
    /// collapse to one flap
    flap_pending: bool,
    /// Throttled snapshot for the render/UI side
    published: Snapshot,
    /// Runs started, including retries
    attempts: u32,
}

impl FlightGame {
    /// Tune the base level for a difficulty and start a fresh run
    pub fn new(
        base: &Level,
        difficulty: Difficulty,
        best_score: Option<u64>,
        config: GameConfig,
        hooks: Hooks,
    ) -> Self {
        let level = difficulty.tune(base);
        let state = RunState::new(
            &level,
            config.viewport_w,
            config.viewport_h,
            config.player_w,
            config.player_h,
        );
        let published = state.snapshot(level.ground_y);
        log::info!(
            "new game: difficulty={} length={} planets={}",
            difficulty.as_str(),
            level.length,
            state.planets.len()
        );
        Self {
            level,
            difficulty,
            config,
            state,
            machine: PhaseMachine::new(difficulty, best_score),
            hooks,
            flap_pending: false,
            published,
            attempts: 1,
        }
    }

    /// Convenience constructor from the authored party level
    pub fn with_default_level(difficulty: Difficulty, best_score: Option<u64>) -> Self {
        Self::new(
            &base_party_level(),
            difficulty,
            best_score,
            GameConfig::default(),
            Hooks::default(),
        )
    }

    /// Queue a flap for the next tick (pointer-down / space / up / `w`)
    pub fn request_flap(&mut self) {
        self.flap_pending = true;
    }

    /// Drive one animation frame
    ///
    /// Consumes the pending flap, advances physics (a no-op once the run has
    /// latched), feeds terminal events to the phase machine and fires hooks.
    pub fn frame(&mut self, dt_secs: f32) {
        let flap = std::mem::take(&mut self.flap_pending);
        let events = advance(
            &mut self.state,
            &self.level,
            self.config.insets,
            dt_secs,
            flap,
        );
        if self.state.started {
            self.machine.note_started();
        }

        for event in &events {
            match *event {
                TickEvent::Collected { points, .. } => {
                    if let Some(hook) = self.hooks.on_collect.as_mut() {
                        hook(points);
                    }
                }
                TickEvent::GameOver => {
                    let collected = self.state.collected_points();
                    if let Some(update) = self.machine.on_game_over(self.state.scroll, collected) {
                        if let Some(hook) = self.hooks.on_score_changed.as_mut() {
                            hook(update);
                        }
                        if let Some(hook) = self.hooks.on_game_over.as_mut() {
                            hook();
                        }
                    }
                }
                TickEvent::GoalReached(hit) => {
                    // Rest the player on top of the goal planet for the win card
                    self.state.player.y =
                        hit.planet.pos.y - hit.planet.radius - self.state.player.height;
                    self.state.player.vel_y = 0.0;
                    let collected = self.state.collected_points();
                    if let Some(update) = self.machine.on_goal_reached(hit, collected) {
                        if let Some(hook) = self.hooks.on_score_changed.as_mut() {
                            hook(update);
                        }
                    }
                }
            }
        }

        // Dwell/transition timers; the win payload comes out exactly once
        if let Some(hit) = self.machine.step(dt_secs) {
            if let Some(hook) = self.hooks.on_reach_end.as_mut() {
                hook(hit);
            }
        }

        // Publish every Nth tick; terminal ticks publish immediately so the
        // UI never misses an outcome. Internal state stays fresh regardless.
        if self.state.frame % PUBLISH_INTERVAL == 0 || !events.is_empty() {
            self.published = self.state.snapshot(self.level.ground_y);
        }
    }

    /// Start a new run. Refused (returns false) during the post-crash
    /// cool-down; otherwise cancels any in-flight win sequence atomically.
    pub fn reset(&mut self) -> bool {
        if !self.machine.can_retry() {
            log::debug!("reset ignored during game-over cool-down");
            return false;
        }
        self.machine.reset();
        self.state
            .reset(&self.level, self.config.viewport_w, self.config.viewport_h);
        self.flap_pending = false;
        self.published = self.state.snapshot(self.level.ground_y);
        self.attempts += 1;
        log::info!("run reset (attempt {})", self.attempts);
        true
    }

    /// Always-fresh snapshot, updated every tick
    pub fn latest(&self) -> Snapshot {
        self.state.snapshot(self.level.ground_y)
    }

    /// Throttled snapshot for the render/UI side
    pub fn published(&self) -> &Snapshot {
        &self.published
    }

    /// The derived planet field (static for the life of a run)
    pub fn planets(&self) -> &[crate::sim::Planet] {
        &self.state.planets
    }

    /// Collectibles, including their collected flags
    pub fn collectibles(&self) -> &[crate::sim::Collectible] {
        &self.state.collectibles
    }

    pub fn phase(&self) -> Phase {
        self.machine.phase()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    /// Final score of the finished run, if any
    pub fn final_score(&self) -> Option<u64> {
        self.machine.final_score()
    }

    /// Best score for this difficulty, including the current session
    pub fn best_score(&self) -> Option<u64> {
        self.machine.best()
    }

    /// Runs started so far, retries included
    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::{GAME_OVER_COOLDOWN_SECS, LANDED_DWELL_SECS, TRANSITION_SECS};
    use std::cell::RefCell;
    use std::rc::Rc;

    const DT: f32 = 1.0 / 60.0;

    fn empty_level() -> Level {
        let mut level = base_party_level();
        level.length = 760.0;
        level.obstacles.clear();
        level.collectibles = None;
        level
    }

    fn drop_to_ground(game: &mut FlightGame) {
        game.request_flap();
        game.frame(DT);
        for _ in 0..2000 {
            if game.phase() == Phase::GameOver {
                return;
            }
            game.frame(DT);
        }
        panic!("run never crashed");
    }

    #[test]
    fn test_initial_snapshot_and_phase() {
        let game = FlightGame::with_default_level(Difficulty::Medium, None);
        assert_eq!(game.phase(), Phase::Idle);
        let snap = game.latest();
        assert_eq!(snap.scroll, 0.0);
        assert_eq!(snap.player.vel_y, 0.0);
        assert!(snap.goal_hit.is_none());
    }

    #[test]
    fn test_game_over_hooks_fire_once() {
        let over_count = Rc::new(RefCell::new(0u32));
        let scores = Rc::new(RefCell::new(Vec::new()));
        let hooks = Hooks {
            on_game_over: Some(Box::new({
                let c = over_count.clone();
                move || *c.borrow_mut() += 1
            })),
            on_score_changed: Some(Box::new({
                let s = scores.clone();
                move |u| s.borrow_mut().push(u)
            })),
            ..Default::default()
        };
        let mut game = FlightGame::new(
            &empty_level(),
            Difficulty::Medium,
            None,
            GameConfig::default(),
            hooks,
        );
        drop_to_ground(&mut game);
        // Keep ticking after the crash: nothing may re-fire
        for _ in 0..120 {
            game.frame(DT);
        }
        assert_eq!(*over_count.borrow(), 1);
        assert_eq!(scores.borrow().len(), 1);
        assert!(!scores.borrow()[0].is_best || game.best_score() == game.final_score());
    }

    #[test]
    fn test_win_sequence_reaches_end_once() {
        let reach = Rc::new(RefCell::new(Vec::new()));
        let hooks = Hooks {
            on_reach_end: Some(Box::new({
                let r = reach.clone();
                move |hit| r.borrow_mut().push(hit)
            })),
            ..Default::default()
        };
        let mut game = FlightGame::new(
            &empty_level(),
            Difficulty::Easy,
            None,
            GameConfig::default(),
            hooks,
        );
        let goal = *game.state.goal().unwrap();

        game.request_flap();
        game.frame(DT);
        for _ in 0..3000 {
            if game.phase() != Phase::Idle && game.phase() != Phase::Flying {
                break;
            }
            let center = game.state.player.y + game.state.player.height / 2.0;
            if center > goal.pos.y {
                game.request_flap();
            }
            game.frame(DT);
        }
        assert_eq!(game.phase(), Phase::Landed);
        // Player rests exactly on top of the goal planet
        assert_eq!(
            game.state.player.y,
            goal.pos.y - goal.radius - game.state.player.height
        );

        let total = LANDED_DWELL_SECS + TRANSITION_SECS + 1.0;
        let ticks = (total / DT) as u32;
        for _ in 0..ticks {
            game.frame(DT);
        }
        assert_eq!(game.phase(), Phase::Outro);
        assert_eq!(reach.borrow().len(), 1);
        assert_eq!(reach.borrow()[0].planet.id, goal.id);
        assert!(game.final_score().is_some());
    }

    #[test]
    fn test_reset_restores_initial_snapshot() {
        let mut game = FlightGame::with_default_level(Difficulty::Nightmare, None);
        let initial = game.latest();
        let initial_planets = game.planets().to_vec();

        drop_to_ground(&mut game);
        // Wait out the cool-down, then reset
        let ticks = (GAME_OVER_COOLDOWN_SECS / DT) as u32 + 2;
        for _ in 0..ticks {
            game.frame(DT);
        }
        assert!(game.reset());
        assert_eq!(game.latest(), initial);
        assert_eq!(game.planets(), &initial_planets[..]);
        assert_eq!(game.phase(), Phase::Idle);
        assert_eq!(game.attempts(), 2);
    }

    #[test]
    fn test_reset_refused_during_cooldown() {
        let mut game = FlightGame::with_default_level(Difficulty::Medium, None);
        drop_to_ground(&mut game);
        assert!(!game.reset(), "reset must be refused right after a crash");
        let ticks = (GAME_OVER_COOLDOWN_SECS / DT) as u32 + 2;
        for _ in 0..ticks {
            game.frame(DT);
        }
        assert!(game.reset());
    }

    #[test]
    fn test_reset_cancels_inflight_win_sequence() {
        let mut game = FlightGame::new(
            &empty_level(),
            Difficulty::Medium,
            None,
            GameConfig::default(),
            Hooks::default(),
        );
        let goal = *game.state.goal().unwrap();
        game.request_flap();
        game.frame(DT);
        for _ in 0..3000 {
            if game.phase() == Phase::Landed {
                break;
            }
            if game.state.player.y + game.state.player.height / 2.0 > goal.pos.y {
                game.request_flap();
            }
            game.frame(DT);
        }
        assert_eq!(game.phase(), Phase::Landed);

        assert!(game.reset());
        assert_eq!(game.phase(), Phase::Idle);
        // The stale dwell/transition timers must never complete
        for _ in 0..1000 {
            game.frame(DT);
        }
        assert_eq!(game.phase(), Phase::Idle);
    }

    #[test]
    fn test_published_snapshot_is_throttled() {
        let mut game = FlightGame::with_default_level(Difficulty::Medium, None);
        game.request_flap();
        game.frame(DT); // frame 1: starts the run, odd tick
        game.frame(DT); // frame 2: published refreshes

        let published_at_2 = game.published().clone();
        game.frame(DT); // frame 3: internal moves, published does not
        assert_eq!(*game.published(), published_at_2);
        assert_ne!(game.latest(), published_at_2);
        game.frame(DT); // frame 4: caught up again
        assert_eq!(*game.published(), game.latest());
    }

    #[test]
    fn test_flap_flag_consumed_by_next_frame() {
        let mut game = FlightGame::with_default_level(Difficulty::Medium, None);
        game.request_flap();
        game.request_flap(); // collapses into the same single flap
        game.frame(DT);
        assert!(!game.flap_pending);
        assert!(game.state.started);
        // No queued second flap: the next frame integrates gravity only
        let vel_before = game.state.player.vel_y;
        game.frame(DT);
        assert!(game.state.player.vel_y > vel_before);
    }
}
