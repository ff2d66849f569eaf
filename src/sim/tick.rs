//! Per-tick physics and collision step
//!
//! Advances one run deterministically. Motion constants are tuned at a 60 fps
//! baseline and scaled by the (clamped) frame delta, so the simulation is
//! refresh-rate independent. Once a terminal outcome latches, every further
//! call is a no-op until the run is reset.

use glam::Vec2;

use super::collision::{EdgeInsets, Hitbox, circle_box_overlap};
use super::level::Level;
use super::state::{GoalHit, Planet, PlanetKind, RunOutcome, RunState, TickEvent};
use crate::consts::*;

/// Advance the run by one frame
///
/// `flap` is the consumed-and-cleared input flag: rapid repeated taps before
/// a tick collapse to a single flap. Returns the events this tick raised;
/// terminal events stop all further integration for the tick and for the run.
pub fn advance(
    state: &mut RunState,
    level: &Level,
    insets: EdgeInsets,
    dt_secs: f32,
    flap: bool,
) -> Vec<TickEvent> {
    // Terminal latch: game-over and goal-hit are one-way until reset
    if state.outcome.is_some() {
        return Vec::new();
    }

    let clamped = dt_secs.min(MAX_TICK_DT).max(0.0);
    if dt_secs > MAX_TICK_DT {
        log::debug!("clamping frame delta {dt_secs:.3}s to {MAX_TICK_DT}s");
    }
    let step = clamped * BASELINE_FPS * SIM_SPEED;
    state.frame += 1;

    // Pre-start: the player hangs in place until the first flap
    if !state.started {
        if flap {
            state.started = true;
            state.player.vel_y = FLAP_VELOCITY;
        }
        return Vec::new();
    }

    // Flap overrides velocity outright; it is not additive
    if flap {
        state.player.vel_y = FLAP_VELOCITY;
    }
    state.player.vel_y += GRAVITY * step;
    state.player.y += state.player.vel_y * step;

    // Ground and ceiling, with a little forgiveness on each
    if state.player.y < -CEILING_MARGIN
        || state.player.y + state.player.height > level.ground_y + GROUND_MARGIN
    {
        state.outcome = Some(RunOutcome::Crashed);
        return vec![TickEvent::GameOver];
    }

    // World scroll; the curve only ever speeds it up, never reverses it
    state.scroll += level.scroll_speed * level.speed_curve.multiplier(state.scroll) * step;

    let hitbox = Hitbox::from_sprite(
        state.player.x,
        state.player.y,
        state.player.width,
        state.player.height,
        insets,
    );

    if let Some(planet) = first_planet_hit(state, &hitbox) {
        return if planet.kind == PlanetKind::Goal {
            let hit = GoalHit {
                planet,
                scroll: state.scroll,
            };
            state.outcome = Some(RunOutcome::Landed(hit));
            vec![TickEvent::GoalReached(hit)]
        } else {
            state.outcome = Some(RunOutcome::Crashed);
            vec![TickEvent::GameOver]
        };
    }

    // The run cannot succeed once the goal has scrolled past the player
    if let Some(goal) = state.goal().copied() {
        if goal.pos.x - state.scroll + goal.radius < hitbox.x - MISSED_GOAL_MARGIN {
            state.outcome = Some(RunOutcome::Crashed);
            return vec![TickEvent::GameOver];
        }
    }

    collect_pickups(state, &hitbox)
}

/// First planet whose collision circle overlaps the hitbox, if any
fn first_planet_hit(state: &RunState, hitbox: &Hitbox) -> Option<Planet> {
    let lo = hitbox.x - BROAD_PHASE_PAD;
    let hi = hitbox.x + hitbox.width + BROAD_PHASE_PAD;
    for planet in &state.planets {
        let screen_x = planet.pos.x - state.scroll;
        // Broad-phase: reject planets outside the player's x-range
        if screen_x + planet.radius < lo || screen_x - planet.radius > hi {
            continue;
        }
        let radius = planet.radius * planet.kind.hit_scale();
        if circle_box_overlap(Vec2::new(screen_x, planet.pos.y), radius, hitbox) {
            return Some(*planet);
        }
    }
    None
}

/// Award overlapped collectibles, each at most once per run
fn collect_pickups(state: &mut RunState, hitbox: &Hitbox) -> Vec<TickEvent> {
    let lo = hitbox.x - BROAD_PHASE_PAD;
    let hi = hitbox.x + hitbox.width + BROAD_PHASE_PAD;
    let scroll = state.scroll;
    let mut events = Vec::new();
    for c in &mut state.collectibles {
        if c.collected {
            continue;
        }
        let screen_x = c.pos.x - scroll;
        if screen_x + COLLECTIBLE_RADIUS < lo || screen_x - COLLECTIBLE_RADIUS > hi {
            continue;
        }
        if circle_box_overlap(Vec2::new(screen_x, c.pos.y), COLLECTIBLE_RADIUS, hitbox) {
            c.collected = true;
            events.push(TickEvent::Collected {
                id: c.id,
                points: c.points,
            });
        }
    }
    events
}
