//! Level descriptors and difficulty tuning
//!
//! A `Level` is immutable per-run configuration: the sparse authoring format
//! (gate and band specs) plus world length, scroll speed and tuning knobs.
//! Difficulty selection never mutates a level in place; it derives a fresh
//! tuned copy from the base level.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// A vertical gap the player must fly through, flanked by solid regions
/// above and below. `gap_y` is the top of the gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GateSpec {
    pub x: f32,
    pub gap_y: f32,
    pub gap_height: f32,
    pub width: f32,
}

/// Sparse obstacle authoring format, expanded into planets by the builder
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ObstacleSpec {
    /// Pass-through corridor with solid top and bottom
    Gate(GateSpec),
    /// One large planet hugging the top band (forces the player under)
    Top { x: f32 },
    /// One large planet hugging the ground (forces the player over)
    Bottom { x: f32 },
    /// One large planet mid-band with jitter (forces a commit either way)
    Center { x: f32 },
}

impl ObstacleSpec {
    /// World x position of the spec's center
    pub fn x(&self) -> f32 {
        match *self {
            ObstacleSpec::Gate(g) => g.x + g.width / 2.0,
            ObstacleSpec::Top { x } | ObstacleSpec::Bottom { x } | ObstacleSpec::Center { x } => x,
        }
    }
}

/// Tuning knobs for the derived planet field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanetProfile {
    /// Scale applied to derived planet radii
    pub radius_scale: f32,
    /// Chance in [0,1] of extra side planets near each gate's gap
    pub side_density: f32,
}

impl Default for PlanetProfile {
    fn default() -> Self {
        Self {
            radius_scale: 1.0,
            side_density: 0.0,
        }
    }
}

/// Scroll-speed multiplier as a function of distance traveled
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum SpeedCurve {
    /// Constant speed for the whole run
    #[default]
    Flat,
    /// Speed grows linearly with scroll offset (escalating pressure)
    Escalating { rate_per_unit: f32 },
}

impl SpeedCurve {
    /// Multiplier at the given scroll offset (identity for `Flat`)
    pub fn multiplier(&self, scroll: f32) -> f32 {
        match *self {
            SpeedCurve::Flat => 1.0,
            SpeedCurve::Escalating { rate_per_unit } => 1.0 + scroll.max(0.0) * rate_per_unit,
        }
    }
}

/// Collectible generation plan: pickups at fixed spacing along the level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollectiblePlan {
    pub start_x: f32,
    pub spacing: f32,
}

impl Default for CollectiblePlan {
    fn default() -> Self {
        Self {
            start_x: COLLECTIBLE_START_X,
            spacing: COLLECTIBLE_SPACING,
        }
    }
}

/// Immutable per-run level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Total world length in distance units
    pub length: f32,
    /// Scroll speed in units per baseline frame
    pub scroll_speed: f32,
    /// Top of the ground strip
    pub ground_y: f32,
    /// Sparse obstacle specs, in authoring order
    pub obstacles: Vec<ObstacleSpec>,
    /// Collectible plan, if this level has pickups
    pub collectibles: Option<CollectiblePlan>,
    /// Planet field tuning
    pub profile: PlanetProfile,
    /// Scroll-speed escalation
    pub speed_curve: SpeedCurve,
}

/// Difficulty selection: a pure transform from the base level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Nightmare,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Nightmare];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Nightmare => "nightmare",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "nightmare" => Some(Difficulty::Nightmare),
            _ => None,
        }
    }

    /// Score multiplier shown on the difficulty cards (x1 / x2 / x3)
    pub fn score_multiplier(&self) -> u64 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Nightmare => 3,
        }
    }

    /// Derive a tuned level for this difficulty from a base level
    ///
    /// The base level is never mutated; each selection rewrites gaps, speed
    /// and the planet profile on a fresh copy.
    pub fn tune(&self, base: &Level) -> Level {
        let mut level = base.clone();
        match self {
            Difficulty::Easy => {
                level.scroll_speed = base.scroll_speed * 0.85;
                widen_gaps(&mut level.obstacles, 8.0);
                level.profile = PlanetProfile {
                    radius_scale: 0.9,
                    side_density: 0.0,
                };
                level.speed_curve = SpeedCurve::Flat;
            }
            Difficulty::Medium => {
                // The authored layout is the medium experience
            }
            Difficulty::Nightmare => {
                level.scroll_speed = base.scroll_speed * 1.25;
                widen_gaps(&mut level.obstacles, -6.0);
                level.profile = PlanetProfile {
                    radius_scale: 1.1,
                    side_density: 0.55,
                };
                // ~1.5% faster per 1000 units of distance traveled
                level.speed_curve = SpeedCurve::Escalating {
                    rate_per_unit: 0.000_015,
                };
            }
        }
        level
    }
}

/// Grow (or shrink, when negative) every gate gap, keeping it centered
fn widen_gaps(obstacles: &mut [ObstacleSpec], delta: f32) {
    for spec in obstacles {
        if let ObstacleSpec::Gate(gate) = spec {
            let grown = (gate.gap_height + delta).max(24.0);
            gate.gap_y = (gate.gap_y - (grown - gate.gap_height) / 2.0).max(GAP_MARGIN);
            gate.gap_height = grown;
        }
    }
}

/// The authored party level: 3200 units, uneven gaps, ground at 156
pub fn base_party_level() -> Level {
    let gate = |x, gap_y, gap_height, width| {
        ObstacleSpec::Gate(GateSpec {
            x,
            gap_y,
            gap_height,
            width,
        })
    };
    Level {
        length: 3200.0,
        scroll_speed: 1.8,
        ground_y: 156.0,
        obstacles: vec![
            gate(350.0, 50.0, 48.0, 44.0),
            gate(520.0, 75.0, 44.0, 40.0),
            gate(680.0, 30.0, 52.0, 46.0),
            gate(840.0, 90.0, 40.0, 42.0),
            gate(1000.0, 45.0, 50.0, 44.0),
            gate(1160.0, 70.0, 46.0, 40.0),
            gate(1320.0, 25.0, 54.0, 48.0),
            gate(1480.0, 85.0, 44.0, 42.0),
            gate(1640.0, 55.0, 48.0, 44.0),
            gate(1800.0, 65.0, 46.0, 40.0),
            gate(1960.0, 35.0, 52.0, 46.0),
            gate(2120.0, 80.0, 42.0, 42.0),
            gate(2280.0, 48.0, 50.0, 44.0),
            gate(2440.0, 72.0, 44.0, 40.0),
            gate(2600.0, 40.0, 52.0, 46.0),
        ],
        collectibles: Some(CollectiblePlan::default()),
        profile: PlanetProfile::default(),
        speed_curve: SpeedCurve::Flat,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tune_does_not_mutate_base() {
        let base = base_party_level();
        let copy = base.clone();
        let _ = Difficulty::Nightmare.tune(&base);
        let _ = Difficulty::Easy.tune(&base);
        assert_eq!(base, copy);
    }

    #[test]
    fn test_easy_widens_gaps_and_slows_scroll() {
        let base = base_party_level();
        let easy = Difficulty::Easy.tune(&base);
        assert!(easy.scroll_speed < base.scroll_speed);
        for (a, b) in easy.obstacles.iter().zip(&base.obstacles) {
            let (ObstacleSpec::Gate(ea), ObstacleSpec::Gate(ba)) = (a, b) else {
                continue;
            };
            assert!(ea.gap_height > ba.gap_height);
        }
    }

    #[test]
    fn test_nightmare_escalates_speed() {
        let base = base_party_level();
        let nightmare = Difficulty::Nightmare.tune(&base);
        let curve = nightmare.speed_curve;
        assert!(curve.multiplier(0.0) < curve.multiplier(2000.0));
        // Flat curve is the identity
        assert_eq!(SpeedCurve::Flat.multiplier(5000.0), 1.0);
    }

    #[test]
    fn test_score_multipliers() {
        assert_eq!(Difficulty::Easy.score_multiplier(), 1);
        assert_eq!(Difficulty::Medium.score_multiplier(), 2);
        assert_eq!(Difficulty::Nightmare.score_multiplier(), 3);
    }

    #[test]
    fn test_difficulty_round_trips_as_str() {
        for d in Difficulty::ALL {
            assert_eq!(Difficulty::from_str(d.as_str()), Some(d));
        }
        assert_eq!(Difficulty::from_str("impossible"), None);
    }
}
