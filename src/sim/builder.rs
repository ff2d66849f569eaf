//! Procedural planet and collectible builder
//!
//! Expands a level's sparse obstacle specs into the dense planet field the
//! tick collides against. Every placement decision flows through a pure
//! closed-form hash of an integer seed, so the same level and difficulty
//! always produce the same layout, element for element.

use glam::Vec2;

use super::level::{CollectiblePlan, Level, ObstacleSpec};
use super::state::{Collectible, CollectibleBand, Planet, PlanetKind};
use crate::consts::*;

/// Pure seeded pseudo-random function: integer seed → [0, 1)
///
/// Closed-form trigonometric hash, no hidden state. Referential transparency
/// is what makes the builder testable without mocking randomness.
#[inline]
pub fn unit_hash(seed: i64) -> f32 {
    let v = (seed as f32 * 12.9898 + 78.233).sin() * 43758.5453;
    v - v.floor()
}

/// Map a seed into [lo, hi)
#[inline]
fn jitter(seed: i64, lo: f32, hi: f32) -> f32 {
    lo + unit_hash(seed) * (hi - lo)
}

/// Seed for decision `salt` of spec `index`
#[inline]
fn spec_seed(index: usize, salt: i64) -> i64 {
    index as i64 * 31 + salt * 7919
}

/// Clamp a planet center into the legal vertical band
///
/// Keeps derived planets fully on screen and clear of the ground. This does
/// not guarantee a traversable path; gap sizing is a content contract.
#[inline]
fn clamp_band(y: f32, radius: f32, ground_y: f32) -> f32 {
    let lo = radius + GAP_MARGIN;
    let hi = ground_y - radius - GAP_MARGIN;
    if hi <= lo { (lo + hi) / 2.0 } else { y.clamp(lo, hi) }
}

/// Expand the level's obstacle specs into positioned planets
///
/// Output is ordered: spec-derived planets in authoring order, then exactly
/// one goal planet. Deterministic for identical inputs.
pub fn build_planets(level: &Level, viewport_w: f32) -> Vec<Planet> {
    let ground_y = level.ground_y;
    let scale = level.profile.radius_scale;
    let mut planets = Vec::with_capacity(level.obstacles.len() * 2 + 1);
    let mut next_id = 0u32;
    let mut push = |planets: &mut Vec<Planet>, pos: Vec2, radius: f32, variant: u8, kind: PlanetKind| {
        planets.push(Planet {
            id: next_id,
            pos,
            radius,
            variant,
            kind,
        });
        next_id += 1;
    };

    for (index, spec) in level.obstacles.iter().enumerate() {
        let variant = (unit_hash(spec_seed(index, 5)) * 4.0) as u8;
        match *spec {
            ObstacleSpec::Gate(gate) => {
                let center_x = gate.x + gate.width / 2.0;
                let gap_bottom = gate.gap_y + gate.gap_height;

                // Solid region above the gap
                let top_r = jitter(spec_seed(index, 1), PLANET_RADIUS_MIN, PLANET_RADIUS_MAX) * scale;
                let top_x = center_x + jitter(spec_seed(index, 2), -8.0, 8.0);
                let top_y = gate.gap_y - GAP_MARGIN - top_r - jitter(spec_seed(index, 3), 0.0, 10.0);
                push(
                    &mut planets,
                    Vec2::new(top_x, clamp_band(top_y, top_r, ground_y)),
                    top_r,
                    variant,
                    PlanetKind::Regular,
                );

                // Solid region below the gap, kept clear of the ground line
                let bot_r = jitter(spec_seed(index, 11), PLANET_RADIUS_MIN, PLANET_RADIUS_MAX) * scale;
                let bot_x = center_x + jitter(spec_seed(index, 12), -8.0, 8.0);
                let bot_y = gap_bottom + GAP_MARGIN + bot_r + jitter(spec_seed(index, 13), 0.0, 10.0);
                push(
                    &mut planets,
                    Vec2::new(bot_x, clamp_band(bot_y, bot_r, ground_y)),
                    bot_r,
                    variant,
                    PlanetKind::Regular,
                );

                // Extra side planets near the gap center, density permitting
                if unit_hash(spec_seed(index, 6)) < level.profile.side_density {
                    let count = if unit_hash(spec_seed(index, 7)) < 0.4 { 2 } else { 1 };
                    for side in 0..count {
                        let salt = 20 + side as i64;
                        let side_r = jitter(spec_seed(index, salt), 5.0, 8.0) * scale;
                        let dir = if side == 0 { 1.0 } else { -1.0 };
                        let side_x =
                            center_x + dir * (gate.width * 1.2 + jitter(spec_seed(index, salt + 4), 4.0, 18.0));
                        let side_y = gate.gap_y + gate.gap_height / 2.0
                            + jitter(spec_seed(index, salt + 8), -16.0, 16.0);
                        push(
                            &mut planets,
                            Vec2::new(side_x, clamp_band(side_y, side_r, ground_y)),
                            side_r,
                            variant,
                            PlanetKind::Side,
                        );
                    }
                }
            }
            ObstacleSpec::Top { x } => {
                let r = BAND_PLANET_RADIUS * scale;
                let y = r + GAP_MARGIN + jitter(spec_seed(index, 1), 0.0, 8.0);
                push(
                    &mut planets,
                    Vec2::new(x, clamp_band(y, r, ground_y)),
                    r,
                    variant,
                    PlanetKind::Regular,
                );
            }
            ObstacleSpec::Bottom { x } => {
                let r = BAND_PLANET_RADIUS * scale;
                let y = ground_y - r - GAP_MARGIN - jitter(spec_seed(index, 1), 0.0, 8.0);
                push(
                    &mut planets,
                    Vec2::new(x, clamp_band(y, r, ground_y)),
                    r,
                    variant,
                    PlanetKind::Regular,
                );
            }
            ObstacleSpec::Center { x } => {
                let r = BAND_PLANET_RADIUS * scale;
                let y = ground_y / 2.0 + jitter(spec_seed(index, 1), -12.0, 12.0);
                push(
                    &mut planets,
                    Vec2::new(x, clamp_band(y, r, ground_y)),
                    r,
                    variant,
                    PlanetKind::Regular,
                );
            }
        }
    }

    // The single goal planet, near the level end, mid-band
    let goal_index = level.obstacles.len();
    let goal_x = level.length - viewport_w / 2.0 - GOAL_END_OFFSET;
    let goal_y = ground_y * 0.45 + jitter(spec_seed(goal_index, 9), -6.0, 6.0);
    planets.push(Planet {
        id: next_id,
        pos: Vec2::new(goal_x, clamp_band(goal_y, GOAL_RADIUS, ground_y)),
        radius: GOAL_RADIUS,
        variant: (unit_hash(spec_seed(goal_index, 5)) * 4.0) as u8,
        kind: PlanetKind::Goal,
    });

    log::debug!(
        "built {} planets for level of length {}",
        planets.len(),
        level.length
    );
    planets
}

/// Generate collectibles at fixed spacing along the level length
///
/// Each pickup alternates between three vertical bands chosen by the seeded
/// scheme; the band sets its point value.
pub fn build_collectibles(level: &Level) -> Vec<Collectible> {
    let Some(CollectiblePlan { start_x, spacing }) = level.collectibles else {
        return Vec::new();
    };
    let end_x = level.length - 2.0 * GOAL_END_OFFSET;
    let mut out = Vec::new();
    let mut x = start_x;
    let mut id = 0u32;
    while x < end_x {
        let band = match (unit_hash(id as i64 * 31 + 5) * 3.0) as u32 {
            0 => CollectibleBand::High,
            1 => CollectibleBand::Mid,
            _ => CollectibleBand::Low,
        };
        let base_y = match band {
            CollectibleBand::High => level.ground_y * 0.25,
            CollectibleBand::Mid => level.ground_y * 0.5,
            CollectibleBand::Low => level.ground_y * 0.78,
        };
        let y = base_y + jitter(id as i64 * 31 + 6, -8.0, 8.0);
        out.push(Collectible {
            id,
            pos: Vec2::new(x, y.clamp(COLLECTIBLE_RADIUS, level.ground_y - COLLECTIBLE_RADIUS)),
            points: band.points(),
            band,
            collected: false,
        });
        id += 1;
        x += spacing;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::{base_party_level, Difficulty, GateSpec};
    use proptest::prelude::*;

    #[test]
    fn test_unit_hash_range_and_purity() {
        for seed in -500..500i64 {
            let a = unit_hash(seed);
            assert!((0.0..1.0).contains(&a), "hash out of range for seed {seed}");
            assert_eq!(a, unit_hash(seed));
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        let level = Difficulty::Nightmare.tune(&base_party_level());
        let a = build_planets(&level, LOGICAL_WIDTH);
        let b = build_planets(&level, LOGICAL_WIDTH);
        assert_eq!(a, b);
        assert_eq!(build_collectibles(&level), build_collectibles(&level));
    }

    #[test]
    fn test_exactly_one_goal_appended_last() {
        let level = base_party_level();
        let planets = build_planets(&level, LOGICAL_WIDTH);
        let goals: Vec<_> = planets.iter().filter(|p| p.kind == PlanetKind::Goal).collect();
        assert_eq!(goals.len(), 1);
        assert_eq!(planets.last().unwrap().kind, PlanetKind::Goal);
        assert!(goals[0].pos.x > level.length - LOGICAL_WIDTH - 2.0 * GOAL_END_OFFSET);
        assert!(goals[0].radius > PLANET_RADIUS_MAX);
    }

    #[test]
    fn test_planets_stay_in_legal_band() {
        for difficulty in Difficulty::ALL {
            let level = difficulty.tune(&base_party_level());
            for planet in build_planets(&level, LOGICAL_WIDTH) {
                assert!(
                    planet.pos.y >= planet.radius + GAP_MARGIN - 0.001,
                    "planet {} pokes above the screen",
                    planet.id
                );
                assert!(
                    planet.pos.y <= level.ground_y - planet.radius - GAP_MARGIN + 0.001,
                    "planet {} overlaps the ground",
                    planet.id
                );
            }
        }
    }

    #[test]
    fn test_identical_gates_get_distinct_jitter() {
        // Same geometry at index 0 and 1: jitter must differ per index while
        // radii stay inside the shared distribution bounds.
        let mut level = base_party_level();
        let gate = GateSpec {
            x: 400.0,
            gap_y: 60.0,
            gap_height: 48.0,
            width: 44.0,
        };
        level.obstacles = vec![
            crate::sim::ObstacleSpec::Gate(gate),
            crate::sim::ObstacleSpec::Gate(GateSpec { x: 400.0, ..gate }),
        ];
        let planets = build_planets(&level, LOGICAL_WIDTH);
        // planets[0..2] from index 0, planets[2..4] from index 1
        assert_ne!(planets[0].pos, planets[2].pos);
        assert_ne!(planets[1].pos, planets[3].pos);
        for p in &planets[..4] {
            assert!(p.radius >= PLANET_RADIUS_MIN && p.radius < PLANET_RADIUS_MAX);
        }
    }

    #[test]
    fn test_side_planets_follow_density() {
        let base = base_party_level();
        let none = build_planets(&base, LOGICAL_WIDTH);
        assert!(none.iter().all(|p| p.kind != PlanetKind::Side));

        let mut dense = base.clone();
        dense.profile.side_density = 1.0;
        let some = build_planets(&dense, LOGICAL_WIDTH);
        let sides = some.iter().filter(|p| p.kind == PlanetKind::Side).count();
        assert!(sides >= dense.obstacles.len(), "density 1.0 should add sides everywhere");
    }

    #[test]
    fn test_collectibles_spacing_and_values() {
        let level = base_party_level();
        let plan = level.collectibles.unwrap();
        let collectibles = build_collectibles(&level);
        assert!(!collectibles.is_empty());
        for (i, c) in collectibles.iter().enumerate() {
            assert_eq!(c.pos.x, plan.start_x + i as f32 * plan.spacing);
            assert_eq!(c.points, c.band.points());
            assert!(!c.collected);
        }
    }

    #[test]
    fn test_no_plan_no_collectibles() {
        let mut level = base_party_level();
        level.collectibles = None;
        assert!(build_collectibles(&level).is_empty());
    }

    proptest! {
        #[test]
        fn prop_gate_planets_always_clamped(
            x in 100.0f32..3000.0,
            gap_y in 0.0f32..150.0,
            gap_height in 10.0f32..80.0,
            width in 20.0f32..60.0,
        ) {
            let mut level = base_party_level();
            level.obstacles = vec![crate::sim::ObstacleSpec::Gate(GateSpec {
                x,
                gap_y,
                gap_height,
                width,
            })];
            for planet in build_planets(&level, LOGICAL_WIDTH) {
                prop_assert!(planet.pos.y >= planet.radius + GAP_MARGIN - 0.001);
                prop_assert!(planet.pos.y <= level.ground_y - planet.radius - GAP_MARGIN + 0.001);
            }
        }
    }
}
