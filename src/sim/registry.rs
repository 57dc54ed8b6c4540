//! Entity registry: owned, kind-partitioned storage for live bodies
//!
//! Entities join the registry only through an explicit `spawn`. Ids are
//! allocated from one monotonically increasing counter and never reused, so a
//! stale handle can never alias a newer entity. Each partition keeps insertion
//! order for deterministic iteration.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::asteroid::Asteroid;
use super::body::Body;
use super::bomb::Bomb;
use super::geometry::circle_intersects_circle;
use super::pickup::Pickup;
use super::ship::Ship;
use super::weapons::Shot;

/// Registry partitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Asteroid,
    Projectile,
    Hazard,
    Pickup,
    Player,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Asteroid,
        EntityKind::Projectile,
        EntityKind::Hazard,
        EntityKind::Pickup,
        EntityKind::Player,
    ];
}

/// Opaque reference to a spawned entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    kind: EntityKind,
    id: u64,
}

impl Handle {
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Something that lives in exactly one registry partition
pub trait Entity: Sized {
    const KIND: EntityKind;

    fn body(&self) -> &Body;

    fn partition(registry: &Registry) -> &Partition<Self>;

    fn partition_mut(registry: &mut Registry) -> &mut Partition<Self>;

    /// Called once with the freshly allocated id, before insertion
    fn on_spawn(&mut self, _id: u64) {}

    /// Circle used for overlap tests (center, radius)
    fn collision_circle(&self) -> (Vec2, f32) {
        let body = self.body();
        (body.pos, body.radius())
    }

    /// Circle-circle overlap against another entity
    fn overlaps<E: Entity>(&self, other: &E) -> bool {
        let (c1, r1) = self.collision_circle();
        let (c2, r2) = other.collision_circle();
        circle_intersects_circle(c1, r1, c2, r2)
    }
}

/// A partition entry
#[derive(Debug, Clone)]
pub struct Slot<T> {
    id: u64,
    alive: bool,
    pub entity: T,
}

impl<T: Entity> Slot<T> {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn handle(&self) -> Handle {
        Handle {
            kind: T::KIND,
            id: self.id,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Mark dead. The entry is skipped from now on and removed by the next sweep.
    pub fn kill(&mut self) {
        self.alive = false;
    }
}

/// All live entities of one kind, in insertion order
#[derive(Debug, Clone)]
pub struct Partition<T> {
    slots: Vec<Slot<T>>,
}

impl<T> Default for Partition<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T: Entity> Partition<T> {
    fn insert(&mut self, id: u64, entity: T) {
        self.slots.push(Slot {
            id,
            alive: true,
            entity,
        });
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.slots.iter().position(|s| s.id == id && s.alive)
    }

    pub fn get(&self, id: u64) -> Option<&T> {
        self.position(id).map(|i| &self.slots[i].entity)
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut T> {
        self.position(id).map(|i| &mut self.slots[i].entity)
    }

    /// Remove a live entity and hand it back
    pub fn take(&mut self, id: u64) -> Option<T> {
        self.position(id).map(|i| self.slots.remove(i).entity)
    }

    /// Kill and remove. Returns false for an unknown or already-dead id.
    pub fn kill(&mut self, id: u64) -> bool {
        self.take(id).is_some()
    }

    /// Visit every alive entry present when the pass starts.
    ///
    /// Entries killed by `f` are not visited again, and dead entries are
    /// compacted once the pass ends.
    pub fn for_each_alive<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Slot<T>),
    {
        let n = self.slots.len();
        for i in 0..n {
            let slot = &mut self.slots[i];
            if slot.alive {
                f(slot);
            }
        }
        self.sweep();
    }

    /// First alive entry matching `pred`
    pub fn find_alive_mut<P>(&mut self, mut pred: P) -> Option<&mut Slot<T>>
    where
        P: FnMut(&T) -> bool,
    {
        self.slots
            .iter_mut()
            .find(|slot| slot.alive && pred(&slot.entity))
    }

    /// Alive entities with their handles
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> {
        self.slots
            .iter()
            .filter(|s| s.alive)
            .map(|s| (s.handle(), &s.entity))
    }

    /// Snapshot of alive handles
    pub fn handles(&self) -> Vec<Handle> {
        self.iter().map(|(h, _)| h).collect()
    }

    /// Drop dead entries; returns how many were removed
    pub fn sweep(&mut self) -> usize {
        let before = self.slots.len();
        self.slots.retain(|s| s.alive);
        before - self.slots.len()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.alive).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-wide set of partitions, one per entity kind
#[derive(Debug, Clone)]
pub struct Registry {
    pub asteroids: Partition<Asteroid>,
    pub projectiles: Partition<Shot>,
    pub hazards: Partition<Bomb>,
    pub pickups: Partition<Pickup>,
    pub player: Partition<Ship>,
    next_id: u64,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            asteroids: Partition::default(),
            projectiles: Partition::default(),
            hazards: Partition::default(),
            pickups: Partition::default(),
            player: Partition::default(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Insert an entity into its kind's partition
    pub fn spawn<T: Entity>(&mut self, mut entity: T) -> Handle {
        let id = self.next_entity_id();
        entity.on_spawn(id);
        T::partition_mut(self).insert(id, entity);
        Handle { kind: T::KIND, id }
    }

    pub fn get<T: Entity>(&self, handle: Handle) -> Option<&T> {
        if handle.kind != T::KIND {
            return None;
        }
        T::partition(self).get(handle.id)
    }

    pub fn get_mut<T: Entity>(&mut self, handle: Handle) -> Option<&mut T> {
        if handle.kind != T::KIND {
            return None;
        }
        T::partition_mut(self).get_mut(handle.id)
    }

    pub fn is_alive(&self, handle: Handle) -> bool {
        match handle.kind {
            EntityKind::Asteroid => self.asteroids.get(handle.id).is_some(),
            EntityKind::Projectile => self.projectiles.get(handle.id).is_some(),
            EntityKind::Hazard => self.hazards.get(handle.id).is_some(),
            EntityKind::Pickup => self.pickups.get(handle.id).is_some(),
            EntityKind::Player => self.player.get(handle.id).is_some(),
        }
    }

    /// Kill and remove. Idempotent: a stale handle is a no-op returning false.
    pub fn kill(&mut self, handle: Handle) -> bool {
        match handle.kind {
            EntityKind::Asteroid => self.asteroids.kill(handle.id),
            EntityKind::Projectile => self.projectiles.kill(handle.id),
            EntityKind::Hazard => self.hazards.kill(handle.id),
            EntityKind::Pickup => self.pickups.kill(handle.id),
            EntityKind::Player => self.player.kill(handle.id),
        }
    }

    pub fn for_each_alive<T, F>(&mut self, f: F)
    where
        T: Entity,
        F: FnMut(&mut Slot<T>),
    {
        T::partition_mut(self).for_each_alive(f);
    }

    /// Remove every entity of `kind`, or of every kind when `None`
    pub fn clear(&mut self, kind: Option<EntityKind>) {
        match kind {
            Some(EntityKind::Asteroid) => self.asteroids.clear(),
            Some(EntityKind::Projectile) => self.projectiles.clear(),
            Some(EntityKind::Hazard) => self.hazards.clear(),
            Some(EntityKind::Pickup) => self.pickups.clear(),
            Some(EntityKind::Player) => self.player.clear(),
            None => {
                for kind in EntityKind::ALL {
                    self.clear(Some(kind));
                }
            }
        }
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Asteroid => self.asteroids.len(),
            EntityKind::Projectile => self.projectiles.len(),
            EntityKind::Hazard => self.hazards.len(),
            EntityKind::Pickup => self.pickups.len(),
            EntityKind::Player => self.player.len(),
        }
    }

    /// Compact dead entries in every partition
    pub fn sweep(&mut self) {
        self.asteroids.sweep();
        self.projectiles.sweep();
        self.hazards.sweep();
        self.pickups.sweep();
        self.player.sweep();
    }
}
