//! Run state and core simulation types
//!
//! Everything a single run owns: the player body, the derived planet field,
//! the collectible set and the terminal latch. The render side only ever
//! sees copies of this state (see `Snapshot`).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::builder::{build_collectibles, build_planets};
use super::level::Level;
use crate::consts::*;

/// Planet flavors, used for collision scaling and sprite selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanetKind {
    /// Derived from a gate or band spec
    Regular,
    /// Extra challenge planet near a gate's gap
    Side,
    /// Touching this one wins the run
    Goal,
}

impl PlanetKind {
    /// Collision circle scale relative to the visual radius
    pub fn hit_scale(&self) -> f32 {
        match self {
            PlanetKind::Regular => HIT_SCALE_REGULAR,
            PlanetKind::Side => HIT_SCALE_SIDE,
            PlanetKind::Goal => HIT_SCALE_GOAL,
        }
    }
}

/// A concrete circular collidable derived from an obstacle spec
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Planet {
    pub id: u32,
    /// Center, in world coordinates (x scrolls, y is screen space)
    pub pos: Vec2,
    pub radius: f32,
    /// Sprite variant index for the renderer
    pub variant: u8,
    pub kind: PlanetKind,
}

/// Vertical placement band for collectibles, sets the point value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleBand {
    High,
    Mid,
    Low,
}

impl CollectibleBand {
    pub fn points(&self) -> u32 {
        match self {
            CollectibleBand::High => 150,
            CollectibleBand::Mid => 100,
            CollectibleBand::Low => 50,
        }
    }
}

/// A pickup: spawned at run start, awarded at most once per run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub pos: Vec2,
    pub points: u32,
    pub band: CollectibleBand,
    /// Set the instant the player's hitbox first overlaps it
    pub collected: bool,
}

/// The player body. x is fixed in screen space; the world scrolls past it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub vel_y: f32,
}

/// Payload carried by a goal hit: which planet, and how far the run got
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalHit {
    pub planet: Planet,
    pub scroll: f32,
}

/// Terminal outcome of a run. Exactly one per run, latched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// Hit a planet, the ground or the ceiling (or let the goal scroll past)
    Crashed,
    /// Touched the goal planet
    Landed(GoalHit),
}

/// Events raised by a single `advance` call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickEvent {
    /// A collectible was picked up (at most once per id per run)
    Collected { id: u32, points: u32 },
    /// Terminal loss
    GameOver,
    /// Terminal win
    GoalReached(GoalHit),
}

/// Read-only copy of the run state for the render side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub player: Player,
    pub scroll: f32,
    pub ground_y: f32,
    pub goal_hit: Option<GoalHit>,
}

/// All mutable state owned by one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub player: Player,
    /// Distance traveled; monotone non-decreasing within a run
    pub scroll: f32,
    /// False until the first flap is consumed (no gravity before that)
    pub started: bool,
    /// One-way terminal latch
    pub outcome: Option<RunOutcome>,
    /// Tick counter, used only to throttle snapshot publication
    pub frame: u64,
    /// Derived planet field, authoring order, goal last
    pub planets: Vec<Planet>,
    pub collectibles: Vec<Collectible>,
}

impl RunState {
    /// Build the initial state for a level: player centered vertically,
    /// planet field and collectibles derived deterministically.
    pub fn new(level: &Level, viewport_w: f32, viewport_h: f32, player_w: f32, player_h: f32) -> Self {
        let player = Player {
            x: ((viewport_w - player_w) / 2.0).floor(),
            y: ((viewport_h - player_h) / 2.0).floor(),
            width: player_w,
            height: player_h,
            vel_y: 0.0,
        };
        Self {
            player,
            scroll: 0.0,
            started: false,
            outcome: None,
            frame: 0,
            planets: build_planets(level, viewport_w),
            collectibles: build_collectibles(level),
        }
    }

    /// Discard the run and start over. Fully regenerates the planet field
    /// and the collectible set; callable any number of times.
    pub fn reset(&mut self, level: &Level, viewport_w: f32, viewport_h: f32) {
        *self = Self::new(
            level,
            viewport_w,
            viewport_h,
            self.player.width,
            self.player.height,
        );
    }

    /// The goal planet (the builder always appends exactly one)
    pub fn goal(&self) -> Option<&Planet> {
        self.planets.iter().rfind(|p| p.kind == PlanetKind::Goal)
    }

    /// Sum of points awarded so far this run
    pub fn collected_points(&self) -> u32 {
        self.collectibles
            .iter()
            .filter(|c| c.collected)
            .map(|c| c.points)
            .sum()
    }

    /// Copy of the externally visible state
    pub fn snapshot(&self, ground_y: f32) -> Snapshot {
        Snapshot {
            player: self.player,
            scroll: self.scroll,
            ground_y,
            goal_hit: match self.outcome {
                Some(RunOutcome::Landed(hit)) => Some(hit),
                _ => None,
            },
        }
    }
}
