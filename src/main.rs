//! Fortwave entry point
//!
//! Headless driver: runs a demo session against the fixed-step
//! simulation with a small autopilot and logs the outcome. A rendering
//! front end drives the same [`tick`] with real player input; nothing
//! in the simulation knows the difference.

use fortwave::consts::SIM_DT;
use fortwave::sim::{GamePhase, TickInput, World, tick};
use fortwave::tuning::Tuning;

use glam::Vec2;

/// Demo length cap: ten minutes of simulated time
const MAX_TICKS: u64 = (600.0 / SIM_DT) as u64;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let seed = args
        .get(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0x5EED_F047);
    let tuning = match args.get(2) {
        Some(path) => match load_tuning(path) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::error!("failed to load tuning from {path}: {err}");
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };

    log::info!("fortwave demo session, seed {seed}");
    let mut world = World::new(seed, tuning);

    let mut ticks = 0u64;
    while world.phase != GamePhase::GameOver && ticks < MAX_TICKS {
        let input = autopilot(&world);
        tick(&mut world, &input);
        ticks += 1;

        if ticks % 600 == 0 {
            log::info!(
                "t={:.0}s score={} level={} kills={} health={:.0} enemies={}",
                ticks as f32 * SIM_DT,
                world.score,
                world.level,
                world.kill_count,
                world.fortress.health,
                world.enemies.len()
            );
        }
    }

    let outcome = if world.phase == GamePhase::GameOver {
        "fortress destroyed"
    } else {
        "time limit reached"
    };
    log::info!(
        "{outcome} after {:.0}s: score {} at level {} ({} kills)",
        ticks as f32 * SIM_DT,
        world.score,
        world.level,
        world.kill_count
    );
}

fn load_tuning(path: &str) -> Result<Tuning, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    Ok(Tuning::from_json(&text)?)
}

/// Minimal demo pilot: grab the nearest drop when one is on the field,
/// otherwise back away from the nearest enemy and let the turrets work.
fn autopilot(world: &World) -> TickInput {
    let mut input = TickInput::default();
    match world.phase {
        GamePhase::GameOver => {}
        GamePhase::WeaponSelect => {
            // Always overwrite the first slot; the demo has no taste
            input.select_slot = Some(0);
        }
        GamePhase::Playing => {
            let fortress = world.fortress.pos;
            let target_drop = world
                .drops
                .iter()
                .min_by(|a, b| {
                    a.pos
                        .distance(fortress)
                        .partial_cmp(&b.pos.distance(fortress))
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .map(|d| d.pos);
            let threat = world
                .enemies
                .iter()
                .min_by(|a, b| {
                    a.pos
                        .distance(fortress)
                        .partial_cmp(&b.pos.distance(fortress))
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .filter(|e| e.pos.distance(fortress) < 250.0)
                .map(|e| e.pos);

            if let Some(drop) = target_drop {
                steer(&mut input, drop - fortress);
            } else if let Some(enemy) = threat {
                steer(&mut input, fortress - enemy);
            }
        }
    }
    input
}

fn steer(input: &mut TickInput, dir: Vec2) {
    input.left = dir.x < -1.0;
    input.right = dir.x > 1.0;
    input.up = dir.y < -1.0;
    input.down = dir.y > 1.0;
}
