//! Asteroids: drifting, spinning rocks on a fixed size ladder
//!
//! Collision uses the bounding circle. The lumpy outline exists for renderers
//! and is derived from a per-asteroid PRNG stream seeded from the asteroid's
//! registry id, so the same rock always has the same silhouette.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::f32::consts::TAU;

use super::body::{Body, Bounds};
use super::geometry::GeometryError;
use super::registry::{Entity, EntityKind, Partition, Registry};
use crate::consts::*;
use crate::{normalize_angle, polar_to_cartesian};

/// Golden-ratio hash spreading sequential ids across the seed space
fn identity_seed(id: u64) -> u64 {
    id.wrapping_mul(2654435761) ^ 0x5DEE_CE66_D1CE_4E5B
}

#[derive(Debug, Clone)]
pub struct Asteroid {
    pub body: Body,
    /// Visual orientation (radians)
    pub angle: f32,
    /// Radians per second, signed
    spin: f32,
    shape_seed: u64,
}

impl Asteroid {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Result<Self, GeometryError> {
        Ok(Self {
            body: Body::new(pos, radius)?.with_velocity(vel),
            angle: 0.0,
            spin: 0.0,
            shape_seed: 0,
        })
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.body.radius()
    }

    pub fn spin(&self) -> f32 {
        self.spin
    }

    pub fn shape_seed(&self) -> u64 {
        self.shape_seed
    }

    /// Position on the size ladder (1 = smallest)
    pub fn size_class(&self, min_radius: f32) -> u32 {
        (self.radius() / min_radius).round().max(1.0) as u32
    }

    pub fn update(&mut self, dt: f32, bounds: &Bounds) {
        self.angle = normalize_angle(self.angle + self.spin * dt);
        self.body.advance(dt, bounds);
    }

    /// Lumpy world-space outline. Same seed, same shape, on every call.
    pub fn outline(&self) -> Vec<Vec2> {
        let mut rng = Pcg32::seed_from_u64(self.shape_seed);
        let radius = self.radius();

        (0..ASTEROID_VERTEX_COUNT)
            .map(|i| {
                let theta = self.angle + TAU * i as f32 / ASTEROID_VERTEX_COUNT as f32;
                let lump = rng.random_range(-ASTEROID_LUMP_VARIANCE..=ASTEROID_LUMP_VARIANCE);
                self.body.pos + polar_to_cartesian(radius * (1.0 + lump), theta)
            })
            .collect()
    }
}

impl Entity for Asteroid {
    const KIND: EntityKind = EntityKind::Asteroid;

    fn body(&self) -> &Body {
        &self.body
    }

    fn partition(registry: &Registry) -> &Partition<Self> {
        &registry.asteroids
    }

    fn partition_mut(registry: &mut Registry) -> &mut Partition<Self> {
        &mut registry.asteroids
    }

    fn on_spawn(&mut self, id: u64) {
        self.shape_seed = identity_seed(id);

        // Spin comes from a second stream so it doesn't shift the outline draws
        let mut rng = Pcg32::seed_from_u64(self.shape_seed.rotate_left(17));
        let speed = rng.random_range(ASTEROID_ROTATION_SPEED_MIN..=ASTEROID_ROTATION_SPEED_MAX);
        let direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        self.spin = speed.to_radians() * direction;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_is_deterministic_per_identity() {
        let mut reg = Registry::new();
        let a = reg.spawn(Asteroid::new(Vec2::new(100.0, 100.0), Vec2::ZERO, 40.0).unwrap());
        let rock = reg.get::<Asteroid>(a).unwrap();

        let first = rock.outline();
        assert_eq!(first.len(), ASTEROID_VERTEX_COUNT);
        assert_eq!(first, rock.outline());

        // A clone carries the same seed and therefore the same silhouette
        assert_eq!(rock.clone().outline(), first);
    }

    #[test]
    fn test_outline_within_lump_variance() {
        let mut reg = Registry::new();
        let a = reg.spawn(Asteroid::new(Vec2::new(300.0, 200.0), Vec2::ZERO, 60.0).unwrap());
        let rock = reg.get::<Asteroid>(a).unwrap();
        for v in rock.outline() {
            let d = v.distance(rock.body.pos);
            assert!(d >= 60.0 * (1.0 - ASTEROID_LUMP_VARIANCE) - 1e-3);
            assert!(d <= 60.0 * (1.0 + ASTEROID_LUMP_VARIANCE) + 1e-3);
        }
    }

    #[test]
    fn test_distinct_identities_get_distinct_shapes() {
        let mut reg = Registry::new();
        let a = reg.spawn(Asteroid::new(Vec2::ZERO, Vec2::ZERO, 40.0).unwrap());
        let b = reg.spawn(Asteroid::new(Vec2::ZERO, Vec2::ZERO, 40.0).unwrap());
        let ra = reg.get::<Asteroid>(a).unwrap();
        let rb = reg.get::<Asteroid>(b).unwrap();
        assert_ne!(ra.shape_seed(), rb.shape_seed());
        assert_ne!(ra.outline(), rb.outline());
    }

    #[test]
    fn test_spin_in_range() {
        let mut reg = Registry::new();
        for _ in 0..20 {
            let h = reg.spawn(Asteroid::new(Vec2::ZERO, Vec2::ZERO, 20.0).unwrap());
            let spin = reg.get::<Asteroid>(h).unwrap().spin().abs().to_degrees();
            assert!(spin >= ASTEROID_ROTATION_SPEED_MIN - 1e-3);
            assert!(spin <= ASTEROID_ROTATION_SPEED_MAX + 1e-3);
        }
    }

    #[test]
    fn test_update_moves_and_wraps() {
        let bounds = Bounds::new(ARENA_WIDTH, ARENA_HEIGHT);
        let mut rock = Asteroid::new(Vec2::new(ARENA_WIDTH + 19.0, 50.0), Vec2::new(120.0, 0.0), 20.0)
            .unwrap();
        rock.update(0.1, &bounds);
        assert_eq!(rock.body.pos.x, -20.0);
    }

    #[test]
    fn test_size_class() {
        let rock = Asteroid::new(Vec2::ZERO, Vec2::ZERO, 60.0).unwrap();
        assert_eq!(rock.size_class(ASTEROID_MIN_RADIUS), 3);
    }
}
