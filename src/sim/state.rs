//! World state and core simulation types
//!
//! Everything a run needs to be replayed from its seed lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::Bounds;
use super::field::AsteroidField;
use super::pickup::PickupKind;
use super::registry::{Handle, Registry};
use super::ship::Ship;
use crate::consts::*;
use crate::{ConfigError, Settings};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Out of lives; ticks are ignored until restart
    GameOver,
}

/// What destroyed an asteroid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitCause {
    Shot,
    Bomb,
    Shield,
}

impl HitCause {
    /// Points awarded per asteroid
    pub fn score(&self) -> u64 {
        match self {
            HitCause::Shot => SCORE_SHOT_KILL,
            HitCause::Bomb => SCORE_BOMB_KILL,
            HitCause::Shield => SCORE_SHIELD_KILL,
        }
    }
}

/// Things that happened during a tick, for whoever draws or plays sounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    AsteroidSplit {
        position: Vec2,
        radius: f32,
        cause: HitCause,
    },
    PlayerHit {
        position: Vec2,
    },
    PickupCollected {
        kind: PickupKind,
        position: Vec2,
    },
    BombDetonated {
        position: Vec2,
    },
    GameOver {
        score: u64,
    },
}

/// Complete simulation state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct World {
    pub settings: Settings,
    pub registry: Registry,
    /// Run seed for reproducibility
    pub seed: u64,
    pub score: u64,
    pub lives: u8,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    /// World-level random stream (split angles, spawner, drops)
    pub(crate) rng: Pcg32,
    pub(crate) field: AsteroidField,
    player: Handle,
}

impl World {
    /// Create a world with the ship at the arena center
    pub fn new(settings: Settings, seed: u64) -> Result<Self, ConfigError> {
        settings.validate()?;

        let mut registry = Registry::new();
        let bounds = settings.bounds();
        let player = registry.spawn(Ship::new(bounds.center(), settings.bomb_max_count)?);

        log::info!(
            "World created: {}x{} arena, seed {}, {} lives",
            bounds.width,
            bounds.height,
            seed,
            settings.starting_lives
        );

        Ok(Self {
            lives: settings.starting_lives,
            settings,
            registry,
            seed,
            score: 0,
            phase: GamePhase::Playing,
            time_ticks: 0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            field: AsteroidField::new(),
            player,
        })
    }

    pub fn bounds(&self) -> Bounds {
        self.settings.bounds()
    }

    pub fn player_handle(&self) -> Handle {
        self.player
    }

    pub fn ship(&self) -> Option<&Ship> {
        self.registry.get(self.player)
    }

    pub fn ship_mut(&mut self) -> Option<&mut Ship> {
        self.registry.get_mut(self.player)
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Take the events accumulated so far
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Start over with the same settings and seed
    pub fn restart(&mut self) -> Result<(), ConfigError> {
        log::info!("Restarting run (seed {})", self.seed);
        *self = Self::new(self.settings.clone(), self.seed)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::registry::EntityKind;

    #[test]
    fn test_new_world_has_centered_ship() {
        let world = World::new(Settings::default(), 7).unwrap();
        let ship = world.ship().unwrap();
        assert_eq!(ship.body.pos, Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT / 2.0));
        assert_eq!(world.lives, STARTING_LIVES);
        assert_eq!(world.phase, GamePhase::Playing);
        assert_eq!(world.registry.count(EntityKind::Player), 1);
        assert_eq!(world.registry.count(EntityKind::Asteroid), 0);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = Settings {
            starting_lives: 0,
            ..Default::default()
        };
        assert!(matches!(World::new(settings, 1), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_drain_events() {
        let mut world = World::new(Settings::default(), 7).unwrap();
        world.events.push(GameEvent::BombDetonated { position: Vec2::ZERO });
        assert_eq!(world.drain_events().len(), 1);
        assert!(world.events.is_empty());
    }

    #[test]
    fn test_hit_cause_scores() {
        assert_eq!(HitCause::Shot.score(), 10);
        assert_eq!(HitCause::Bomb.score(), 15);
        assert_eq!(HitCause::Shield.score(), 5);
    }

    #[test]
    fn test_event_serializes() {
        let event = GameEvent::PickupCollected {
            kind: PickupKind::Speed,
            position: Vec2::new(1.0, 2.0),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("PickupCollected"));
        let back: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
