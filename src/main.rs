//! Headless runner: load a level, drive the simulation with a scripted
//! input (hold right, hop periodically) and log what happens. Useful for
//! smoke-testing level files without a renderer.

use std::fs;
use std::process::ExitCode;

use log::{error, info, warn};

use gloop::sim::{LevelData, TickEvent, TickInput, tick};
use gloop::{Phase, ScoreBoard};

const DT: f32 = 1.0 / 60.0;
const MAX_SECONDS: f32 = 120.0;

fn main() -> ExitCode {
    env_logger::init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: gloop <level.json>");
        return ExitCode::FAILURE;
    };

    let json = match fs::read_to_string(&path) {
        Ok(json) => json,
        Err(err) => {
            error!("cannot read {path}: {err}");
            return ExitCode::FAILURE;
        }
    };
    let mut world = match LevelData::from_json(&json).and_then(|level| level.build()) {
        Ok(world) => world,
        Err(err) => {
            error!("cannot load {path}: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut scores = ScoreBoard::new();
    let steps = (MAX_SECONDS / DT) as u32;
    for step in 0..steps {
        // Hold right, tap jump twice a second
        let input = TickInput {
            left: false,
            right: true,
            jump: step % 30 < 2,
        };
        match tick(&mut world, &input, DT) {
            Some(TickEvent::Won { elapsed, collected }) => {
                let stars = world.stars();
                scores.record(&world.level_name, elapsed, stars);
                info!("won in {elapsed:.2}s ({stars} stars, {collected} pickups)");
                break;
            }
            Some(TickEvent::Died(cause)) => {
                info!("died at {:.2}s: {cause:?}, respawning", world.elapsed);
                world.respawn();
            }
            Some(TickEvent::GoalCooldownActive) | None => {}
        }
    }

    if world.phase != Phase::Won {
        warn!("no completion within {MAX_SECONDS}s of scripted input");
    }
    info!("total stars: {}", scores.total_stars());
    ExitCode::SUCCESS
}
