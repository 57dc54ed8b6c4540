//! Asteroid field spawner: a steady trickle of rocks from the arena edges

use glam::Vec2;
use rand::Rng;

use super::asteroid::Asteroid;
use super::geometry::GeometryError;
use crate::Settings;
use crate::consts::*;

/// Arena edge a new asteroid enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
    Bottom,
    Top,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Bottom, Edge::Top];

    /// Unit vector pointing into the arena
    pub fn inward(&self) -> Vec2 {
        match self {
            Edge::Left => Vec2::X,
            Edge::Right => Vec2::NEG_X,
            Edge::Bottom => Vec2::Y,
            Edge::Top => Vec2::NEG_Y,
        }
    }

    /// Spawn point just outside this edge. `t` in [0, 1] runs along the edge.
    /// The offset equals the radius so the wrap rule leaves it in place.
    pub fn spawn_point(&self, t: f32, radius: f32, width: f32, height: f32) -> Vec2 {
        match self {
            Edge::Left => Vec2::new(-radius, t * height),
            Edge::Right => Vec2::new(width + radius, t * height),
            Edge::Bottom => Vec2::new(t * width, -radius),
            Edge::Top => Vec2::new(t * width, height + radius),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AsteroidField {
    timer: f32,
}

impl AsteroidField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the spawn timer; yields a new asteroid each time it elapses
    pub fn update<R: Rng>(
        &mut self,
        dt: f32,
        settings: &Settings,
        rng: &mut R,
    ) -> Result<Option<Asteroid>, GeometryError> {
        self.timer += dt;
        if self.timer <= settings.asteroid_spawn_rate {
            return Ok(None);
        }
        self.timer = 0.0;

        let edge = Edge::ALL[rng.random_range(0..Edge::ALL.len())];
        let speed = rng.random_range(ASTEROID_SPAWN_SPEED_MIN..=ASTEROID_SPAWN_SPEED_MAX);
        let jitter = rng
            .random_range(-ASTEROID_SPAWN_ANGLE_JITTER..=ASTEROID_SPAWN_ANGLE_JITTER)
            .to_radians();
        let vel = Vec2::from_angle(jitter).rotate(edge.inward() * speed);

        let kind = rng.random_range(1..=settings.asteroid_kinds);
        let radius = settings.asteroid_min_radius * kind as f32;
        let pos = edge.spawn_point(
            rng.random_range(0.0..=1.0),
            radius,
            settings.arena_width,
            settings.arena_height,
        );

        Asteroid::new(pos, vel, radius).map(Some)
    }
}
