//! Drift Arena headless runner
//!
//! Plays a scripted session with a simple autopilot and logs what happened.
//!
//! Usage: `drift-arena [settings.json] [seed]`

use drift_arena::consts::*;
use drift_arena::heading_vector;
use drift_arena::sim::{EntityKind, GameEvent, HitCause, TickInput, World, tick};
use drift_arena::Settings;

const DEFAULT_SEED: u64 = 0x0D21_F7A5;
/// Two minutes of play at the fixed step
const MAX_TICKS: u64 = 120 * 60;

fn main() {
    env_logger::init();
    log::info!("Drift Arena (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SEED);

    let mut world = match World::new(settings, seed) {
        Ok(world) => world,
        Err(e) => {
            log::error!("Cannot start: {}", e);
            std::process::exit(1);
        }
    };

    let mut kills = [0u32; 3];
    let mut pickups = 0u32;

    while world.time_ticks < MAX_TICKS && !world.is_game_over() {
        let input = autopilot(&world);
        tick(&mut world, &input, SIM_DT);

        for event in world.drain_events() {
            match event {
                GameEvent::AsteroidSplit { cause, .. } => {
                    let slot = match cause {
                        HitCause::Shot => 0,
                        HitCause::Bomb => 1,
                        HitCause::Shield => 2,
                    };
                    kills[slot] += 1;
                }
                GameEvent::PickupCollected { .. } => pickups += 1,
                _ => {}
            }
        }

        if world.time_ticks % (10 * 60) == 0 {
            log::info!(
                "t={}s score={} lives={} asteroids={}",
                world.time_ticks / 60,
                world.score,
                world.lives,
                world.registry.count(EntityKind::Asteroid)
            );
        }
    }

    println!("Seed:        {}", world.seed);
    println!("Survived:    {:.1}s", world.time_ticks as f32 * SIM_DT);
    println!("Score:       {}", world.score);
    println!("Lives left:  {}", world.lives);
    println!(
        "Kills:       {} shot, {} bomb, {} shield",
        kills[0], kills[1], kills[2]
    );
    println!("Power-ups:   {}", pickups);
}

/// Turn toward the nearest asteroid, shoot when roughly lined up, and bomb
/// anything that gets close.
fn autopilot(world: &World) -> TickInput {
    let Some(ship) = world.ship() else {
        return TickInput::default();
    };

    let nearest = world
        .registry
        .asteroids
        .iter()
        .map(|(_, rock)| rock.body.pos - ship.body.pos)
        .min_by(|a, b| {
            a.length_squared()
                .partial_cmp(&b.length_squared())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let Some(offset) = nearest else {
        // Nothing to shoot at: drift in a slow circle
        return TickInput {
            turn: 0.3,
            thrust: 0.2,
            ..Default::default()
        };
    };

    let distance = offset.length();
    let error = if distance > f32::EPSILON {
        heading_vector(ship.heading).angle_to(offset)
    } else {
        0.0
    };

    TickInput {
        turn: (error * 4.0).clamp(-1.0, 1.0),
        thrust: if distance > 300.0 { 0.4 } else { -0.3 },
        fire: error.abs() < 0.15,
        drop_bomb: distance < 120.0,
        select_weapon: None,
    }
}
