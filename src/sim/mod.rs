//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed 60 fps baseline, delta-scaled and clamped
//! - Seeded closed-form jitter only (no stateful RNG)
//! - Stable planet/collectible order (authoring order, goal last)
//! - No rendering or platform dependencies

pub mod builder;
pub mod collision;
pub mod level;
pub mod state;
pub mod tick;

pub use builder::{build_collectibles, build_planets, unit_hash};
pub use collision::{circle_box_overlap, EdgeInsets, Hitbox};
pub use level::{
    CollectiblePlan, Difficulty, GateSpec, Level, ObstacleSpec, PlanetProfile, SpeedCurve,
    base_party_level,
};
pub use state::{
    Collectible, GoalHit, Planet, PlanetKind, Player, RunOutcome, RunState, Snapshot, TickEvent,
};
pub use tick::advance;
