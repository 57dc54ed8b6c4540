//! Fixed timestep simulation tick
//!
//! One call advances every body, then resolves collisions in a fixed order:
//! bomb blasts, ship contact, shots, pickups. Hits found in a pass are
//! collected first and resolved afterwards, so fragments spawned by a pass are
//! never hit by that same pass.

use glam::Vec2;

use super::asteroid::Asteroid;
use super::body::Bounds;
use super::bomb::Bomb;
use super::fragment::{self, SplitOutcome};
use super::pickup::{self, Pickup};
use super::registry::{Entity, Handle, Registry};
use super::ship::Ship;
use super::state::{GameEvent, GamePhase, HitCause, World};
use super::weapons::{Shot, WeaponKind};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// -1..1, positive turns counter-clockwise
    pub turn: f32,
    /// -1..1, negative is (weaker) reverse thrust
    pub thrust: f32,
    pub fire: bool,
    pub drop_bomb: bool,
    /// Unlock and switch to a weapon
    pub select_weapon: Option<WeaponKind>,
}

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, input: &TickInput, dt: f32) {
    if world.phase == GamePhase::GameOver {
        return;
    }
    world.time_ticks += 1;

    let bounds = world.bounds();

    control_ship(world, input, dt, &bounds);

    if world.settings.spawn_asteroids {
        match world.field.update(dt, &world.settings, &mut world.rng) {
            Ok(Some(rock)) => {
                world.registry.spawn(rock);
            }
            Ok(None) => {}
            Err(e) => log::warn!("Skipped field spawn: {}", e),
        }
    }

    advance_bodies(&mut world.registry, dt, &bounds);

    detonate_bombs(world);
    ship_vs_asteroids(world);

    if world.phase == GamePhase::GameOver {
        world.registry.sweep();
        return;
    }

    shots_vs_asteroids(world);
    collect_pickups(world);

    world.registry.sweep();
}

/// Steering, motion, and anything the ship launches this tick
fn control_ship(world: &mut World, input: &TickInput, dt: f32, bounds: &Bounds) {
    let handle = world.player_handle();
    let Some(ship) = world.registry.get_mut::<Ship>(handle) else {
        return;
    };

    if let Some(kind) = input.select_weapon {
        ship.weapons.select(kind);
    }

    ship.turn(input.turn.clamp(-1.0, 1.0), dt);
    let axis = if input.thrust < 0.0 {
        input.thrust.max(-1.0) * -PLAYER_REVERSE_THRUST
    } else {
        input.thrust.min(1.0)
    };
    ship.thrust(axis, dt);
    ship.update(dt, bounds);

    let shots = if input.fire {
        ship.fire().unwrap_or_else(|e| {
            log::warn!("Weapon misfire: {}", e);
            Vec::new()
        })
    } else {
        Vec::new()
    };

    let bomb = if input.drop_bomb {
        ship.drop_bomb().unwrap_or_else(|e| {
            log::warn!("Bomb drop failed: {}", e);
            None
        })
    } else {
        None
    };

    for shot in shots {
        world.registry.spawn(shot);
    }
    if let Some(bomb) = bomb {
        world.registry.spawn(bomb);
    }
}

/// Integrate and wrap everything except the ship; expire timed entities
fn advance_bodies(registry: &mut Registry, dt: f32, bounds: &Bounds) {
    registry.for_each_alive::<Asteroid, _>(|slot| slot.entity.update(dt, bounds));

    registry.for_each_alive::<Shot, _>(|slot| {
        slot.entity.update(dt, bounds);
        if slot.entity.is_expired() {
            slot.kill();
        }
    });

    registry.for_each_alive::<Bomb, _>(|slot| slot.entity.update(dt, bounds));

    registry.for_each_alive::<Pickup, _>(|slot| {
        slot.entity.update(dt, bounds);
        if slot.entity.is_expired() {
            slot.kill();
        }
    });
}

/// Split an asteroid and credit the score
fn split_and_score(world: &mut World, handle: Handle, cause: HitCause) -> Option<SplitOutcome> {
    let policy = match world.settings.split_policy() {
        Ok(policy) => policy,
        Err(e) => {
            log::warn!("Cannot split asteroid {}: {}", handle.id(), e);
            return None;
        }
    };
    let outcome = fragment::split(&mut world.registry, handle, &policy, &mut world.rng)?;

    world.score += cause.score();
    world.events.push(GameEvent::AsteroidSplit {
        position: outcome.position,
        radius: outcome.radius,
        cause,
    });
    Some(outcome)
}

/// Exploded bombs split every asteroid inside their blast
fn detonate_bombs(world: &mut World) {
    let exploded: Vec<Handle> = world
        .registry
        .hazards
        .iter()
        .filter(|(_, bomb)| bomb.exploded)
        .map(|(h, _)| h)
        .collect();

    for handle in exploded {
        let Some(bomb) = world.registry.hazards.take(handle.id()) else {
            continue;
        };

        let caught: Vec<Handle> = world
            .registry
            .asteroids
            .iter()
            .filter(|(_, rock)| bomb.in_blast(rock.body.pos, rock.radius()))
            .map(|(h, _)| h)
            .collect();

        log::info!(
            "Bomb detonated at ({:.0}, {:.0}), {} asteroids caught",
            bomb.body.pos.x,
            bomb.body.pos.y,
            caught.len()
        );
        world.events.push(GameEvent::BombDetonated {
            position: bomb.body.pos,
        });

        for rock in caught {
            split_and_score(world, rock, HitCause::Bomb);
        }
    }
}

/// Hull contact: a shield smashes asteroids, otherwise the ship loses a life
fn ship_vs_asteroids(world: &mut World) {
    let Some(ship) = world.ship() else {
        return;
    };

    let touching: Vec<Handle> = world
        .registry
        .asteroids
        .iter()
        .filter(|(_, rock)| ship.hits(*rock))
        .map(|(h, _)| h)
        .collect();

    if touching.is_empty() {
        return;
    }
    let shielded = ship.is_shielded();
    let invulnerable = ship.is_invulnerable();

    if shielded {
        log::debug!("Shield destroyed {} asteroids", touching.len());
        for rock in touching {
            split_and_score(world, rock, HitCause::Shield);
        }
    } else if !invulnerable {
        player_hit(world);
    }
}

/// Lose a life, then respawn or end the run
fn player_hit(world: &mut World) {
    let center = world.bounds().center();
    let Some(position) = world.ship().map(|ship| ship.body.pos) else {
        return;
    };

    world.lives = world.lives.saturating_sub(1);
    world.events.push(GameEvent::PlayerHit { position });

    if world.lives == 0 {
        world.phase = GamePhase::GameOver;
        world.events.push(GameEvent::GameOver { score: world.score });
        log::info!("Game over! Final score: {}", world.score);
    } else {
        log::info!("Player hit at ({:.0}, {:.0}), {} lives left", position.x, position.y, world.lives);
        if let Some(ship) = world.ship_mut() {
            ship.respawn(center);
        }
    }
}

/// Each shot destroys at most one asteroid and each asteroid is split at most once
fn shots_vs_asteroids(world: &mut World) {
    let mut hits: Vec<Handle> = Vec::new();
    {
        let Registry {
            asteroids,
            projectiles,
            ..
        } = &mut world.registry;

        asteroids.for_each_alive(|rock| {
            if let Some(shot) = projectiles.find_alive_mut(|s| s.overlaps(&rock.entity)) {
                shot.kill();
                hits.push(rock.handle());
            }
        });
    }

    for handle in hits {
        let Some(outcome) = split_and_score(world, handle, HitCause::Shot) else {
            continue;
        };
        match pickup::maybe_spawn(outcome.position, world.settings.powerup_spawn_chance, &mut world.rng) {
            Ok(Some(powerup)) => {
                log::debug!("{} power-up dropped", powerup.kind.name());
                world.registry.spawn(powerup);
            }
            Ok(None) => {}
            Err(e) => log::warn!("Skipped power-up drop: {}", e),
        }
    }
}

/// Ship touches a pickup: apply it and score
fn collect_pickups(world: &mut World) {
    let Some(ship) = world.ship() else {
        return;
    };

    let collected: Vec<(Handle, Vec2)> = world
        .registry
        .pickups
        .iter()
        .filter(|(_, p)| ship.hits(*p))
        .map(|(h, p)| (h, p.position()))
        .collect();

    for (handle, position) in collected {
        let Some(pickup) = world.registry.pickups.take(handle.id()) else {
            continue;
        };
        let player = world.player_handle();
        if let Some(ship) = world.registry.get_mut::<Ship>(player) {
            ship.apply_pickup(pickup.kind, &mut world.rng);
        }

        world.score += SCORE_PICKUP;
        world.events.push(GameEvent::PickupCollected {
            kind: pickup.kind,
            position,
        });
        log::info!("Collected {} power-up", pickup.kind.name());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;
    use crate::sim::pickup::PickupKind;
    use crate::sim::registry::EntityKind;

    /// Quiet world: no spawner, no random drops
    fn quiet_world(seed: u64) -> World {
        let settings = Settings {
            spawn_asteroids: false,
            powerup_spawn_chance: 0.0,
            ..Default::default()
        };
        World::new(settings, seed).unwrap()
    }

    fn park_ship(world: &mut World, pos: Vec2) {
        world.ship_mut().unwrap().body.pos = pos;
    }

    fn rock(world: &mut World, pos: Vec2, radius: f32) -> Handle {
        world
            .registry
            .spawn(Asteroid::new(pos, Vec2::ZERO, radius).unwrap())
    }

    #[test]
    fn test_shot_splits_asteroid() {
        let mut world = quiet_world(1);
        park_ship(&mut world, Vec2::new(100.0, 100.0));

        let parent = rock(&mut world, Vec2::new(500.0, 300.0), 60.0);
        world
            .registry
            .spawn(Shot::new(Vec2::new(500.0, 300.0), Vec2::ZERO, 5.0, 1.0).unwrap());

        tick(&mut world, &TickInput::default(), SIM_DT);

        assert!(!world.registry.is_alive(parent));
        assert_eq!(world.registry.count(EntityKind::Projectile), 0);
        assert_eq!(world.registry.count(EntityKind::Asteroid), 2);
        for (_, a) in world.registry.asteroids.iter() {
            assert_eq!(a.radius(), 40.0);
            assert_eq!(a.body.pos, Vec2::new(500.0, 300.0));
        }
        assert_eq!(world.score, SCORE_SHOT_KILL);

        let events = world.drain_events();
        assert_eq!(
            events,
            vec![GameEvent::AsteroidSplit {
                position: Vec2::new(500.0, 300.0),
                radius: 60.0,
                cause: HitCause::Shot,
            }]
        );
    }

    #[test]
    fn test_asteroid_split_once_per_tick() {
        let mut world = quiet_world(1);
        park_ship(&mut world, Vec2::new(100.0, 100.0));
        rock(&mut world, Vec2::new(500.0, 300.0), 40.0);
        for _ in 0..3 {
            world
                .registry
                .spawn(Shot::new(Vec2::new(500.0, 300.0), Vec2::ZERO, 5.0, 1.0).unwrap());
        }

        tick(&mut world, &TickInput::default(), SIM_DT);

        // One shot consumed, the fragments are not hit until the next tick
        assert_eq!(world.score, SCORE_SHOT_KILL);
        assert_eq!(world.registry.count(EntityKind::Projectile), 2);
        assert_eq!(world.registry.count(EntityKind::Asteroid), 2);

        tick(&mut world, &TickInput::default(), SIM_DT);
        assert_eq!(world.score, 3 * SCORE_SHOT_KILL);
        assert_eq!(world.registry.count(EntityKind::Projectile), 0);
        assert_eq!(world.registry.count(EntityKind::Asteroid), 0);
    }

    #[test]
    fn test_fire_spawns_shots_with_cooldown() {
        let mut world = quiet_world(1);
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut world, &fire, SIM_DT);
        assert_eq!(world.registry.count(EntityKind::Projectile), 1);
        tick(&mut world, &fire, SIM_DT);
        assert_eq!(world.registry.count(EntityKind::Projectile), 1);

        let spread = TickInput {
            fire: true,
            select_weapon: Some(WeaponKind::Spread),
            ..Default::default()
        };
        tick(&mut world, &spread, SIM_DT);
        assert_eq!(world.registry.count(EntityKind::Projectile), 4);
    }

    #[test]
    fn test_player_hit_respawns_with_invulnerability() {
        let mut world = quiet_world(1);
        let center = world.bounds().center();
        park_ship(&mut world, Vec2::new(200.0, 200.0));
        rock(&mut world, Vec2::new(200.0, 200.0), 40.0);
        rock(&mut world, center, 20.0);

        tick(&mut world, &TickInput::default(), SIM_DT);
        assert_eq!(world.lives, STARTING_LIVES - 1);
        let ship = world.ship().unwrap();
        assert_eq!(ship.body.pos, center);
        assert!(ship.is_invulnerable());

        // Respawned on top of an asteroid, but invulnerable
        tick(&mut world, &TickInput::default(), SIM_DT);
        assert_eq!(world.lives, STARTING_LIVES - 1);
        assert!(
            world
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::PlayerHit { .. }))
        );
    }

    #[test]
    fn test_game_over_stops_ticking() {
        let settings = Settings {
            spawn_asteroids: false,
            starting_lives: 1,
            ..Default::default()
        };
        let mut world = World::new(settings, 5).unwrap();
        let center = world.bounds().center();
        rock(&mut world, center, 40.0);

        tick(&mut world, &TickInput::default(), SIM_DT);
        assert_eq!(world.lives, 0);
        assert!(world.is_game_over());
        assert!(world.events.contains(&GameEvent::GameOver { score: 0 }));

        let ticks = world.time_ticks;
        tick(&mut world, &TickInput::default(), SIM_DT);
        assert_eq!(world.time_ticks, ticks);

        world.restart().unwrap();
        assert_eq!(world.phase, GamePhase::Playing);
        assert_eq!(world.lives, 1);
        assert_eq!(world.registry.count(EntityKind::Asteroid), 0);
    }

    #[test]
    fn test_shield_smashes_asteroids() {
        let mut world = quiet_world(1);
        let center = world.bounds().center();
        world.ship_mut().unwrap().effects.apply(PickupKind::Shield);
        rock(&mut world, center, 40.0);

        tick(&mut world, &TickInput::default(), SIM_DT);
        assert_eq!(world.lives, STARTING_LIVES);
        assert_eq!(world.score, SCORE_SHIELD_KILL);
        assert_eq!(world.registry.count(EntityKind::Asteroid), 2);

        // The fragments are still touching and go next tick
        tick(&mut world, &TickInput::default(), SIM_DT);
        assert_eq!(world.score, 3 * SCORE_SHIELD_KILL);
        assert_eq!(world.registry.count(EntityKind::Asteroid), 0);
    }

    #[test]
    fn test_bomb_blast() {
        let mut world = quiet_world(1);
        let mut bomb = Bomb::new(Vec2::new(150.0, 150.0), Vec2::ZERO).unwrap();
        bomb.fuse = 0.01;
        world.registry.spawn(bomb);
        let near = rock(&mut world, Vec2::new(250.0, 150.0), 20.0);
        let far = rock(&mut world, Vec2::new(900.0, 550.0), 20.0);

        tick(&mut world, &TickInput::default(), SIM_DT);

        assert!(!world.registry.is_alive(near));
        assert!(world.registry.is_alive(far));
        assert_eq!(world.registry.count(EntityKind::Hazard), 0);
        assert_eq!(world.score, SCORE_BOMB_KILL);
        assert!(
            world
                .events
                .contains(&GameEvent::BombDetonated { position: Vec2::new(150.0, 150.0) })
        );
    }

    #[test]
    fn test_drop_bomb_input() {
        let mut world = quiet_world(1);
        let input = TickInput {
            drop_bomb: true,
            ..Default::default()
        };
        tick(&mut world, &input, SIM_DT);
        assert_eq!(world.registry.count(EntityKind::Hazard), 1);
        assert_eq!(world.ship().unwrap().bombs.bombs, BOMB_MAX_COUNT - 1);
    }

    #[test]
    fn test_pickup_collection() {
        let mut world = quiet_world(1);
        let center = world.bounds().center();
        world
            .registry
            .spawn(Pickup::new(center, PickupKind::Shield, 0.0).unwrap());

        tick(&mut world, &TickInput::default(), SIM_DT);

        assert_eq!(world.registry.count(EntityKind::Pickup), 0);
        assert_eq!(world.score, SCORE_PICKUP);
        assert!(world.ship().unwrap().is_shielded());
    }

    #[test]
    fn test_determinism() {
        // Two worlds with the same seed and inputs must stay identical
        let mut w1 = World::new(Settings::default(), 99999).unwrap();
        let mut w2 = World::new(Settings::default(), 99999).unwrap();

        let inputs = [
            TickInput {
                turn: 1.0,
                thrust: 1.0,
                fire: true,
                ..Default::default()
            },
            TickInput {
                thrust: -1.0,
                fire: true,
                drop_bomb: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for i in 0..900 {
            let input = &inputs[(i / 40) % inputs.len()];
            tick(&mut w1, input, SIM_DT);
            tick(&mut w2, input, SIM_DT);
        }

        assert_eq!(w1.time_ticks, w2.time_ticks);
        assert_eq!(w1.score, w2.score);
        assert_eq!(w1.lives, w2.lives);
        assert_eq!(w1.events, w2.events);
        assert!(w1.registry.count(EntityKind::Asteroid) > 0 || w1.score > 0);

        let rocks = |w: &World| -> Vec<(Vec2, f32)> {
            w.registry
                .asteroids
                .iter()
                .map(|(_, a)| (a.body.pos, a.radius()))
                .collect()
        };
        assert_eq!(rocks(&w1), rocks(&w2));
        assert_eq!(w1.ship().unwrap().body.pos, w2.ship().unwrap().body.pos);
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut w1 = World::new(Settings::default(), 1).unwrap();
        let mut w2 = World::new(Settings::default(), 2).unwrap();
        for _ in 0..120 {
            tick(&mut w1, &TickInput::default(), SIM_DT);
            tick(&mut w2, &TickInput::default(), SIM_DT);
        }
        let first = |w: &World| w.registry.asteroids.iter().next().map(|(_, a)| a.body.pos);
        assert_ne!(first(&w1), first(&w2));
    }
}
