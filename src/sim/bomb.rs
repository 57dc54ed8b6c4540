//! Droppable bombs with a fuse and a blast radius

use glam::Vec2;

use super::body::{Body, Bounds};
use super::geometry::{GeometryError, circle_intersects_circle};
use super::registry::{Entity, EntityKind, Partition, Registry};
use crate::consts::*;
use crate::heading_vector;

/// A bomb coasting to a stop while its fuse burns
#[derive(Debug, Clone)]
pub struct Bomb {
    pub body: Body,
    /// Seconds until detonation
    pub fuse: f32,
    pub exploded: bool,
}

impl Bomb {
    pub fn new(pos: Vec2, vel: Vec2) -> Result<Self, GeometryError> {
        Ok(Self {
            body: Body::new(pos, BOMB_RADIUS)?.with_velocity(vel),
            fuse: BOMB_FUSE_TIME,
            exploded: false,
        })
    }

    pub fn update(&mut self, dt: f32, bounds: &Bounds) {
        // Momentum bleeds off before integration
        self.body.vel *= 1.0 - BOMB_DRAG * dt;
        self.body.advance(dt, bounds);

        self.fuse -= dt;
        if self.fuse <= 0.0 {
            self.exploded = true;
        }
    }

    /// In the final flashing window before detonation
    pub fn is_detonating(&self) -> bool {
        self.fuse <= BOMB_DETONATING_WINDOW
    }

    pub fn blast_radius(&self) -> f32 {
        BOMB_EXPLOSION_RADIUS
    }

    /// Whether a circle at `pos` with `radius` is caught in the blast
    pub fn in_blast(&self, pos: Vec2, radius: f32) -> bool {
        circle_intersects_circle(self.body.pos, self.blast_radius(), pos, radius)
    }
}

impl Entity for Bomb {
    const KIND: EntityKind = EntityKind::Hazard;

    fn body(&self) -> &Body {
        &self.body
    }

    fn partition(registry: &Registry) -> &Partition<Self> {
        &registry.hazards
    }

    fn partition_mut(registry: &mut Registry) -> &mut Partition<Self> {
        &mut registry.hazards
    }
}

/// The ship's bomb supply
#[derive(Debug, Clone)]
pub struct BombInventory {
    pub max_bombs: u32,
    pub bombs: u32,
    drop_cooldown: f32,
}

impl BombInventory {
    pub fn new(max_bombs: u32) -> Self {
        Self {
            max_bombs,
            bombs: max_bombs,
            drop_cooldown: 0.0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        if self.drop_cooldown > 0.0 {
            self.drop_cooldown -= dt;
        }
    }

    pub fn can_drop(&self) -> bool {
        self.bombs > 0 && self.drop_cooldown <= 0.0
    }

    /// Drop a bomb behind the ship. It keeps half the ship's momentum plus a
    /// small push backwards.
    pub fn drop(
        &mut self,
        pos: Vec2,
        ship_vel: Vec2,
        heading: f32,
    ) -> Result<Option<Bomb>, GeometryError> {
        if !self.can_drop() {
            return Ok(None);
        }

        let backward = -heading_vector(heading);
        let bomb = Bomb::new(pos, ship_vel * 0.5 + backward * BOMB_DROP_SPEED)?;

        self.bombs -= 1;
        self.drop_cooldown = BOMB_DROP_COOLDOWN;
        Ok(Some(bomb))
    }

    pub fn add_bomb(&mut self) {
        self.bombs = (self.bombs + 1).min(self.max_bombs);
    }

    /// Refill for a new life
    pub fn reset(&mut self) {
        self.bombs = self.max_bombs;
        self.drop_cooldown = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuse_and_detonation() {
        let bounds = Bounds::new(ARENA_WIDTH, ARENA_HEIGHT);
        let mut bomb = Bomb::new(Vec2::new(100.0, 100.0), Vec2::new(50.0, 0.0)).unwrap();

        bomb.update(1.0, &bounds);
        assert!(!bomb.exploded);
        assert!(!bomb.is_detonating());
        // Drag applied before integration
        assert!((bomb.body.vel.x - 25.0).abs() < 1e-4);
        assert!((bomb.body.pos.x - 125.0).abs() < 1e-4);

        bomb.update(0.85, &bounds);
        assert!(bomb.is_detonating());
        assert!(!bomb.exploded);

        bomb.update(0.2, &bounds);
        assert!(bomb.exploded);
    }

    #[test]
    fn test_blast_is_boundary_inclusive() {
        let bomb = Bomb::new(Vec2::ZERO, Vec2::ZERO).unwrap();
        assert!(bomb.in_blast(Vec2::new(170.0, 0.0), 20.0));
        assert!(!bomb.in_blast(Vec2::new(170.5, 0.0), 20.0));
    }

    #[test]
    fn test_inventory_drop_and_cooldown() {
        let mut inv = BombInventory::new(3);
        let bomb = inv.drop(Vec2::ZERO, Vec2::new(100.0, 0.0), 0.0).unwrap().unwrap();
        // Half the ship's velocity, pushed opposite the heading (+Y)
        assert!((bomb.body.vel - Vec2::new(50.0, -50.0)).length() < 1e-4);
        assert_eq!(inv.bombs, 2);

        assert!(inv.drop(Vec2::ZERO, Vec2::ZERO, 0.0).unwrap().is_none());
        inv.update(0.5);
        assert!(inv.drop(Vec2::ZERO, Vec2::ZERO, 0.0).unwrap().is_some());
    }

    #[test]
    fn test_inventory_runs_out_and_refills() {
        let mut inv = BombInventory::new(2);
        for _ in 0..2 {
            assert!(inv.drop(Vec2::ZERO, Vec2::ZERO, 0.0).unwrap().is_some());
            inv.update(1.0);
        }
        assert!(!inv.can_drop());
        inv.add_bomb();
        inv.add_bomb();
        inv.add_bomb();
        assert_eq!(inv.bombs, 2);
        inv.bombs = 0;
        inv.reset();
        assert_eq!(inv.bombs, 2);
    }
}
