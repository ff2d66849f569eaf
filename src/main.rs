//! Planet Dash headless demo
//!
//! Plays one autopilot run per difficulty and reports the outcome. The
//! browser front-end drives `FlightGame` the same way, one frame per
//! animation-frame callback; here the clock is synthetic.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::cell::RefCell;
    use std::rc::Rc;

    use planet_dash::phase::Phase;
    use planet_dash::sim::{base_party_level, Difficulty, ObstacleSpec, PlanetKind};
    use planet_dash::{BestScores, FlightGame, GameConfig, Hooks};

    const DT: f32 = 1.0 / 60.0;
    const MAX_TICKS: u32 = 60 * 180; // three simulated minutes, ample for any run

    #[derive(Debug, Default)]
    struct RunReport {
        collected: u32,
        pickups: u32,
        reached_end: bool,
    }

    /// Altitude the autopilot steers toward: the next gap center ahead,
    /// or the goal planet once the gates are behind us.
    fn target_altitude(game: &FlightGame, scroll: f32) -> f32 {
        let player_x = game.latest().player.x;
        let world_x = scroll + player_x;
        for spec in &game.level().obstacles {
            if let ObstacleSpec::Gate(gate) = spec {
                if gate.x + gate.width > world_x {
                    return gate.gap_y + gate.gap_height / 2.0;
                }
            }
        }
        game.planets()
            .iter()
            .rfind(|p| p.kind == PlanetKind::Goal)
            .map(|goal| goal.pos.y)
            .unwrap_or(game.level().ground_y / 2.0)
    }

    fn play(difficulty: Difficulty, scores: &mut BestScores) -> RunReport {
        let report = Rc::new(RefCell::new(RunReport::default()));
        let hooks = Hooks {
            on_collect: Some(Box::new({
                let report = report.clone();
                move |points| {
                    let mut r = report.borrow_mut();
                    r.collected += points;
                    r.pickups += 1;
                }
            })),
            on_reach_end: Some(Box::new({
                let report = report.clone();
                move |hit| {
                    report.borrow_mut().reached_end = true;
                    log::info!("reached the goal planet at scroll {:.0}", hit.scroll);
                }
            })),
            ..Default::default()
        };

        let mut game = FlightGame::new(
            &base_party_level(),
            difficulty,
            scores.best_for(difficulty),
            GameConfig::default(),
            hooks,
        );
        scores.count_attempt();

        game.request_flap();
        game.frame(DT);
        for _ in 0..MAX_TICKS {
            match game.phase() {
                Phase::GameOver | Phase::Outro => break,
                _ => {}
            }
            let snap = game.latest();
            let center = snap.player.y + snap.player.height / 2.0;
            if center > target_altitude(&game, snap.scroll) {
                game.request_flap();
            }
            game.frame(DT);
        }

        if let Some(score) = game.final_score() {
            if scores.record(difficulty, score) {
                log::info!("new best for {}: {}", difficulty.as_str(), score);
            }
        }

        let snap = game.latest();
        println!(
            "{:<10} phase={:?} scroll={:>6.0} score={:?} pickups={}",
            difficulty.as_str(),
            game.phase(),
            snap.scroll,
            game.final_score(),
            report.borrow().pickups,
        );
        if log::log_enabled!(log::Level::Debug) {
            if let Ok(json) = serde_json::to_string_pretty(&snap) {
                log::debug!("final snapshot:\n{json}");
            }
        }

        // The game owns the hook closures and their Rc clones
        drop(game);
        Rc::try_unwrap(report)
            .map(|cell| cell.into_inner())
            .unwrap_or_default()
    }

    pub fn run() {
        env_logger::init();
        log::info!("Planet Dash headless demo starting");

        let mut scores = BestScores::load();
        for difficulty in Difficulty::ALL {
            let report = play(difficulty, &mut scores);
            if report.reached_end {
                log::info!(
                    "{}: won with {} bonus points from {} pickups",
                    difficulty.as_str(),
                    report.collected,
                    report.pickups
                );
            }
        }
        scores.save();
        println!("attempts so far: {}", scores.attempts);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The wasm build is driven by the host page through the library API
}
