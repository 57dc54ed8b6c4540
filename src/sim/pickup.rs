//! Power-up pickups and the timed effects they grant

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::body::{Body, Bounds};
use super::geometry::GeometryError;
use super::registry::{Entity, EntityKind, Partition, Registry};
use crate::consts::*;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    Shield,
    Speed,
    Weapon,
}

impl PickupKind {
    pub fn name(&self) -> &'static str {
        match self {
            PickupKind::Shield => "Shield",
            PickupKind::Speed => "Speed",
            PickupKind::Weapon => "Weapon",
        }
    }

    /// Effect duration in seconds
    pub fn duration(&self) -> f32 {
        match self {
            PickupKind::Shield => 5.0,
            PickupKind::Speed => 8.0,
            PickupKind::Weapon => 10.0,
        }
    }

    /// Weighted draw: shield and speed 40% each, weapon 20%
    pub fn roll<R: Rng>(rng: &mut R) -> Self {
        let r: f32 = rng.random();
        if r < 0.4 {
            PickupKind::Shield
        } else if r < 0.8 {
            PickupKind::Speed
        } else {
            PickupKind::Weapon
        }
    }
}

/// A floating pickup. The body is the drift anchor; the collision center bobs
/// vertically around it.
#[derive(Debug, Clone)]
pub struct Pickup {
    pub anchor: Body,
    pub kind: PickupKind,
    /// Bob phase (radians)
    pub phase: f32,
    /// Seconds until despawn
    pub lifetime: f32,
}

impl Pickup {
    pub fn new(pos: Vec2, kind: PickupKind, phase: f32) -> Result<Self, GeometryError> {
        Ok(Self {
            anchor: Body::new(pos, POWERUP_RADIUS)?,
            kind,
            phase,
            lifetime: POWERUP_LIFETIME,
        })
    }

    /// Current (bobbing) center
    pub fn position(&self) -> Vec2 {
        self.anchor.pos + Vec2::new(0.0, self.phase.sin() * POWERUP_FLOAT_AMPLITUDE)
    }

    pub fn update(&mut self, dt: f32, bounds: &Bounds) {
        self.phase = (self.phase + dt * POWERUP_FLOAT_SPEED) % TAU;
        self.anchor.advance(dt, bounds);
        self.lifetime -= dt;
    }

    pub fn is_expired(&self) -> bool {
        self.lifetime <= 0.0
    }
}

impl Entity for Pickup {
    const KIND: EntityKind = EntityKind::Pickup;

    fn body(&self) -> &Body {
        &self.anchor
    }

    fn partition(registry: &Registry) -> &Partition<Self> {
        &registry.pickups
    }

    fn partition_mut(registry: &mut Registry) -> &mut Partition<Self> {
        &mut registry.pickups
    }

    fn collision_circle(&self) -> (Vec2, f32) {
        (self.position(), self.anchor.radius())
    }
}

/// Roll for a drop where an asteroid died. Returns a slowly drifting pickup
/// with probability `chance`.
pub fn maybe_spawn<R: Rng>(
    pos: Vec2,
    chance: f32,
    rng: &mut R,
) -> Result<Option<Pickup>, GeometryError> {
    let roll: f32 = rng.random();
    if roll >= chance {
        return Ok(None);
    }

    let kind = PickupKind::roll(rng);
    let drift = Vec2::new(
        rng.random_range(-POWERUP_DRIFT_SPEED..=POWERUP_DRIFT_SPEED),
        rng.random_range(-POWERUP_DRIFT_SPEED..=POWERUP_DRIFT_SPEED),
    );
    let phase = rng.random_range(0.0..TAU);

    let mut pickup = Pickup::new(pos, kind, phase)?;
    pickup.anchor.vel = drift;
    Ok(Some(pickup))
}

/// Remaining seconds of each timed effect on the ship
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub shield: f32,
    pub speed: f32,
}

impl ActiveEffects {
    /// Apply or refresh an effect. Weapon pickups are tracked by the weapon manager.
    pub fn apply(&mut self, kind: PickupKind) {
        match kind {
            PickupKind::Shield => self.shield = kind.duration(),
            PickupKind::Speed => self.speed = kind.duration(),
            PickupKind::Weapon => {}
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.shield = (self.shield - dt).max(0.0);
        self.speed = (self.speed - dt).max(0.0);
    }

    pub fn has_shield(&self) -> bool {
        self.shield > 0.0
    }

    pub fn has_speed_boost(&self) -> bool {
        self.speed > 0.0
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
