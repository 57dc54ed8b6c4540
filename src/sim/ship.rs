//! The player ship: triangular hull, thrust/friction movement, and the
//! weapon, bomb and power-up systems it carries.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::body::{Body, Bounds};
use super::bomb::{Bomb, BombInventory};
use super::geometry::{GeometryError, Polygon, Triangle, triangles_intersect};
use super::pickup::{ActiveEffects, PickupKind};
use super::registry::{Entity, EntityKind, Partition, Registry};
use super::weapons::{Shot, WeaponKind, WeaponManager};
use crate::consts::*;
use crate::{heading_vector, normalize_angle};

#[derive(Debug, Clone)]
pub struct Ship {
    pub body: Body,
    /// Radians; 0 points along +Y
    pub heading: f32,
    /// Seconds of post-respawn invulnerability left
    pub invulnerable: f32,
    pub thrusting: bool,
    pub weapons: WeaponManager,
    pub bombs: BombInventory,
    pub effects: ActiveEffects,
}

impl Ship {
    pub fn new(pos: Vec2, max_bombs: u32) -> Result<Self, GeometryError> {
        Ok(Self {
            body: Body::new(pos, PLAYER_RADIUS)?,
            heading: 0.0,
            invulnerable: 0.0,
            thrusting: false,
            weapons: WeaponManager::new(),
            bombs: BombInventory::new(max_bombs),
            effects: ActiveEffects::default(),
        })
    }

    /// Hull vertices: nose, then the two rear corners
    pub fn triangle(&self) -> Triangle {
        let r = self.body.radius();
        let forward = heading_vector(self.heading);
        let right = heading_vector(self.heading + std::f32::consts::FRAC_PI_2) * r / 1.5;
        let p = self.body.pos;
        [
            p + forward * r,
            p - forward * r - right,
            p - forward * r + right,
        ]
    }

    /// Hull as a validated polygon; fails if the ship's position went non-finite
    pub fn hull(&self) -> Result<Polygon, GeometryError> {
        Polygon::try_from(self.triangle())
    }

    /// Hull vs any entity's collision circle. A broken hull never hits.
    pub fn hits<E: Entity>(&self, other: &E) -> bool {
        let (center, radius) = other.collision_circle();
        match self.hull() {
            Ok(hull) => hull.intersects_circle(center, radius),
            Err(e) => {
                log::warn!("Ship hull invalid: {}", e);
                false
            }
        }
    }

    /// Hull vs another triangle
    pub fn hull_overlaps(&self, other: &Triangle) -> bool {
        triangles_intersect(&self.triangle(), other)
    }

    /// Rotate by `axis` (-1..1) of full turn speed
    pub fn turn(&mut self, axis: f32, dt: f32) {
        if axis != 0.0 {
            self.heading =
                normalize_angle(self.heading + axis * PLAYER_TURN_SPEED.to_radians() * dt);
        }
    }

    /// Accelerate along the heading; negative `axis` is reverse thrust
    pub fn thrust(&mut self, axis: f32, dt: f32) {
        self.thrusting = axis > 0.0;
        if axis == 0.0 {
            return;
        }

        let accel = if self.effects.has_speed_boost() {
            PLAYER_ACCELERATION * PLAYER_SPEED_BOOST_MULTIPLIER
        } else {
            PLAYER_ACCELERATION
        };
        self.body.vel += heading_vector(self.heading) * accel * dt * axis;
    }

    /// Timers, friction, then motion
    pub fn update(&mut self, dt: f32, bounds: &Bounds) {
        self.weapons.update(dt);
        self.bombs.update(dt);
        self.effects.update(dt);

        if self.invulnerable > 0.0 {
            self.invulnerable -= dt;
        }

        self.body.vel *= 1.0 - PLAYER_FRICTION * dt;
        self.body.advance(dt, bounds);
    }

    pub fn fire(&mut self) -> Result<Vec<Shot>, GeometryError> {
        self.weapons.fire(self.body.pos, self.heading)
    }

    pub fn drop_bomb(&mut self) -> Result<Option<Bomb>, GeometryError> {
        self.bombs.drop(self.body.pos, self.body.vel, self.heading)
    }

    pub fn is_shielded(&self) -> bool {
        self.effects.has_shield()
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable > 0.0
    }

    /// Grant a collected power-up. Weapon pickups hand out a random upgrade
    /// for the pickup's duration.
    pub fn apply_pickup<R: Rng>(&mut self, kind: PickupKind, rng: &mut R) {
        self.effects.apply(kind);
        if kind == PickupKind::Weapon {
            if let Some(&weapon) = WeaponKind::UPGRADES.choose(rng) {
                self.weapons.set_temporary(weapon, kind.duration());
            }
        }
    }

    /// Back to `pos` at rest, invulnerable, bombs refilled
    pub fn respawn(&mut self, pos: Vec2) {
        self.body.pos = pos;
        self.body.vel = Vec2::ZERO;
        self.heading = 0.0;
        self.invulnerable = PLAYER_RESPAWN_INVULNERABILITY;
        self.bombs.reset();
    }
}

impl Entity for Ship {
    const KIND: EntityKind = EntityKind::Player;

    fn body(&self) -> &Body {
        &self.body
    }

    fn partition(registry: &Registry) -> &Partition<Self> {
        &registry.player
    }

    fn partition_mut(registry: &mut Registry) -> &mut Partition<Self> {
        &mut registry.player
    }
}
