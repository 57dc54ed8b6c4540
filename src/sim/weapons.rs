//! Weapons and the projectiles they fire
//!
//! Weapon stats are a fixed table; construction of shots (speed, spread, size)
//! happens here so the registry only ever receives finished entities.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Body, Bounds};
use super::geometry::GeometryError;
use super::registry::{Entity, EntityKind, Partition, Registry};
use crate::consts::*;
use crate::heading_vector;

/// Weapon types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    Standard,
    Spread,
    Rapid,
    Laser,
}

/// Static weapon stats
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponStats {
    pub name: &'static str,
    /// Seconds between volleys
    pub cooldown: f32,
    pub shot_speed: f32,
    pub shot_count: u32,
    /// Degrees between adjacent shots in a volley
    pub spread_angle: f32,
    pub damage: f32,
    pub shot_radius: f32,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 4] = [
        WeaponKind::Standard,
        WeaponKind::Spread,
        WeaponKind::Rapid,
        WeaponKind::Laser,
    ];

    /// Weapons a Weapon pickup can grant
    pub const UPGRADES: [WeaponKind; 3] = [WeaponKind::Spread, WeaponKind::Rapid, WeaponKind::Laser];

    pub fn stats(&self) -> WeaponStats {
        match self {
            WeaponKind::Standard => WeaponStats {
                name: "Standard",
                cooldown: 0.3,
                shot_speed: 500.0,
                shot_count: 1,
                spread_angle: 0.0,
                damage: 1.0,
                shot_radius: SHOT_RADIUS,
            },
            WeaponKind::Spread => WeaponStats {
                name: "Spread",
                cooldown: 0.5,
                shot_speed: 450.0,
                shot_count: 3,
                spread_angle: 15.0,
                damage: 1.0,
                shot_radius: SHOT_RADIUS,
            },
            WeaponKind::Rapid => WeaponStats {
                name: "Rapid",
                cooldown: 0.1,
                shot_speed: 600.0,
                shot_count: 1,
                spread_angle: 0.0,
                damage: 0.5,
                shot_radius: SHOT_RADIUS,
            },
            WeaponKind::Laser => WeaponStats {
                name: "Laser",
                cooldown: 0.05,
                shot_speed: 800.0,
                shot_count: 1,
                spread_angle: 0.0,
                damage: 0.3,
                shot_radius: 2.0,
            },
        }
    }

    fn index(&self) -> usize {
        match self {
            WeaponKind::Standard => 0,
            WeaponKind::Spread => 1,
            WeaponKind::Rapid => 2,
            WeaponKind::Laser => 3,
        }
    }
}

/// A projectile
#[derive(Debug, Clone)]
pub struct Shot {
    pub body: Body,
    pub damage: f32,
    /// Seconds until despawn
    pub lifetime: f32,
}

impl Shot {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32, damage: f32) -> Result<Self, GeometryError> {
        Ok(Self {
            body: Body::new(pos, radius)?.with_velocity(vel),
            damage,
            lifetime: SHOT_LIFETIME,
        })
    }

    pub fn update(&mut self, dt: f32, bounds: &Bounds) {
        self.body.advance(dt, bounds);
        self.lifetime -= dt;
    }

    pub fn is_expired(&self) -> bool {
        self.lifetime <= 0.0
    }
}

impl Entity for Shot {
    const KIND: EntityKind = EntityKind::Projectile;

    fn body(&self) -> &Body {
        &self.body
    }

    fn partition(registry: &Registry) -> &Partition<Self> {
        &registry.projectiles
    }

    fn partition_mut(registry: &mut Registry) -> &mut Partition<Self> {
        &mut registry.projectiles
    }
}

/// One weapon and its cooldown
#[derive(Debug, Clone)]
pub struct Weapon {
    pub kind: WeaponKind,
    cooldown_timer: f32,
}

impl Weapon {
    pub fn new(kind: WeaponKind) -> Self {
        Self {
            kind,
            cooldown_timer: 0.0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        if self.cooldown_timer > 0.0 {
            self.cooldown_timer -= dt;
        }
    }

    pub fn can_fire(&self) -> bool {
        self.cooldown_timer <= 0.0
    }

    /// Fire a volley fanned symmetrically about `heading`. Empty while cooling down.
    pub fn fire(&mut self, pos: Vec2, heading: f32) -> Result<Vec<Shot>, GeometryError> {
        if !self.can_fire() {
            return Ok(Vec::new());
        }

        let stats = self.kind.stats();
        let total_spread = stats.spread_angle * (stats.shot_count - 1) as f32;
        let start = -total_spread / 2.0;

        let shots = (0..stats.shot_count)
            .map(|i| {
                let offset = (start + stats.spread_angle * i as f32).to_radians();
                let dir = heading_vector(heading + offset);
                Shot::new(pos, dir * stats.shot_speed, stats.shot_radius, stats.damage)
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.cooldown_timer = stats.cooldown;
        Ok(shots)
    }
}

/// The ship's weapon inventory
#[derive(Debug, Clone)]
pub struct WeaponManager {
    available: Vec<WeaponKind>,
    current: usize,
    weapons: [Weapon; 4],
    temporary: Option<WeaponKind>,
    temporary_timer: f32,
}

impl Default for WeaponManager {
    fn default() -> Self {
        Self::new()
    }
}

impl WeaponManager {
    /// Starts with only the standard weapon unlocked
    pub fn new() -> Self {
        Self {
            available: vec![WeaponKind::Standard],
            current: 0,
            weapons: WeaponKind::ALL.map(Weapon::new),
            temporary: None,
            temporary_timer: 0.0,
        }
    }

    /// Active weapon (a temporary override wins)
    pub fn current_kind(&self) -> WeaponKind {
        self.temporary.unwrap_or(self.available[self.current])
    }

    pub fn available(&self) -> &[WeaponKind] {
        &self.available
    }

    pub fn temporary(&self) -> Option<(WeaponKind, f32)> {
        self.temporary.map(|k| (k, self.temporary_timer))
    }

    pub fn update(&mut self, dt: f32) {
        for weapon in &mut self.weapons {
            weapon.update(dt);
        }

        if self.temporary_timer > 0.0 {
            self.temporary_timer -= dt;
            if self.temporary_timer <= 0.0 {
                self.temporary = None;
            }
        }
    }

    /// Switch by index into the available list
    pub fn switch(&mut self, index: usize) -> bool {
        if index < self.available.len() {
            self.current = index;
            true
        } else {
            false
        }
    }

    pub fn cycle(&mut self, forward: bool) {
        let n = self.available.len();
        if n > 1 {
            self.current = if forward {
                (self.current + 1) % n
            } else {
                (self.current + n - 1) % n
            };
        }
    }

    pub fn unlock(&mut self, kind: WeaponKind) {
        if !self.available.contains(&kind) {
            self.available.push(kind);
        }
    }

    /// Unlock and switch to `kind`
    pub fn select(&mut self, kind: WeaponKind) {
        self.unlock(kind);
        if let Some(index) = self.available.iter().position(|&k| k == kind) {
            self.switch(index);
        }
    }

    pub fn set_temporary(&mut self, kind: WeaponKind, duration: f32) {
        self.temporary = Some(kind);
        self.temporary_timer = duration;
    }

    pub fn can_fire(&self) -> bool {
        self.weapons[self.current_kind().index()].can_fire()
    }

    pub fn fire(&mut self, pos: Vec2, heading: f32) -> Result<Vec<Shot>, GeometryError> {
        let index = self.current_kind().index();
        self.weapons[index].fire(pos, heading)
    }
}
