//! Planet Dash - a side-scrolling "flappy" mini-game simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (level data, procedural builder, physics, collisions)
//! - `phase`: Run lifecycle state machine (idle → flying → game-over | landed → outro)
//! - `game`: Engine facade wiring input, ticking, hooks and snapshot publication
//! - `score`: Run scoring (kept outside the physics core)
//! - `highscores` / `settings`: Player-local persistence (LocalStorage on wasm)
//!
//! The world scrolls under a horizontally-fixed player; the player flaps to
//! stay between procedurally placed planets and wins by touching the goal
//! planet near the end of the level.

pub mod game;
pub mod highscores;
pub mod phase;
pub mod score;
pub mod settings;
pub mod sim;

pub use game::{FlightGame, GameConfig, Hooks};
pub use highscores::BestScores;
pub use phase::{Phase, PhaseMachine};
pub use settings::Prefs;
pub use sim::{Difficulty, Level, Snapshot};

/// Game tuning constants
///
/// All motion constants are tuned at an implicit 60 fps baseline; the tick
/// multiplies them by `dt * 60` so behavior is refresh-rate independent.
pub mod consts {
    /// Downward acceleration per baseline frame
    pub const GRAVITY: f32 = 0.28;
    /// Vertical velocity set (not added) by a flap
    pub const FLAP_VELOCITY: f32 = -3.2;
    /// Baseline simulation rate the constants are tuned for
    pub const BASELINE_FPS: f32 = 60.0;
    /// Maximum per-tick delta in seconds (backgrounded tabs produce huge gaps)
    pub const MAX_TICK_DT: f32 = 0.05;
    /// Global simulation speed scale
    pub const SIM_SPEED: f32 = 1.0;

    /// Logical viewport the simulation collides in (device pixels map onto this)
    pub const LOGICAL_WIDTH: f32 = 320.0;
    pub const LOGICAL_HEIGHT: f32 = 180.0;

    /// Player sprite box defaults
    pub const PLAYER_WIDTH: f32 = 20.0;
    pub const PLAYER_HEIGHT: f32 = 20.0;

    /// Forgiveness below the ground line before a crash registers
    pub const GROUND_MARGIN: f32 = 4.0;
    /// Forgiveness above the top edge before a crash registers
    pub const CEILING_MARGIN: f32 = 2.0;
    /// Clearance kept between derived planets and a gate's gap
    pub const GAP_MARGIN: f32 = 3.0;
    /// Broad-phase slack around the player's x-range
    pub const BROAD_PHASE_PAD: f32 = 10.0;

    /// Planet radii (before profile scaling)
    pub const PLANET_RADIUS_MIN: f32 = 9.0;
    pub const PLANET_RADIUS_MAX: f32 = 14.0;
    /// Large single-band planets
    pub const BAND_PLANET_RADIUS: f32 = 22.0;
    /// The goal planet is bigger than everything else
    pub const GOAL_RADIUS: f32 = 18.0;
    /// Goal sits this far before the level's end
    pub const GOAL_END_OFFSET: f32 = 100.0;

    /// Collision circle scale per planet kind (content-balance knobs)
    pub const HIT_SCALE_REGULAR: f32 = 0.78;
    pub const HIT_SCALE_SIDE: f32 = 0.72;
    pub const HIT_SCALE_GOAL: f32 = 1.15;
    /// How far past the player the goal may scroll before the run is lost
    pub const MISSED_GOAL_MARGIN: f32 = 24.0;

    /// Collectible placement
    pub const COLLECTIBLE_SPACING: f32 = 260.0;
    pub const COLLECTIBLE_START_X: f32 = 420.0;
    pub const COLLECTIBLE_RADIUS: f32 = 6.0;

    /// Published snapshot refresh interval in ticks (internal state updates every tick)
    pub const PUBLISH_INTERVAL: u64 = 2;
}

/// Initialize logging for the current platform
///
/// Browser builds log to the console; native builds go through `env_logger`
/// (respects `RUST_LOG`).
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::try_init();
}
