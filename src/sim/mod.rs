//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (world stream plus per-entity identity streams)
//! - Stable iteration order (registry insertion order)
//! - No rendering, input or platform dependencies

pub mod asteroid;
pub mod body;
pub mod bomb;
pub mod field;
pub mod fragment;
pub mod geometry;
pub mod pickup;
pub mod registry;
pub mod ship;
pub mod state;
pub mod tick;
pub mod weapons;

pub use asteroid::Asteroid;
pub use body::{Body, Bounds};
pub use bomb::{Bomb, BombInventory};
pub use field::{AsteroidField, Edge};
pub use fragment::{SplitOutcome, SplitPolicy, split, split_with_angle};
pub use geometry::{
    GeometryError, Polygon, Triangle, circle_intersects_circle, circle_intersects_polygon,
    closest_point_on_segment, point_in_polygon, triangles_intersect,
};
pub use pickup::{ActiveEffects, Pickup, PickupKind};
pub use registry::{Entity, EntityKind, Handle, Partition, Registry, Slot};
pub use ship::Ship;
pub use state::{GameEvent, GamePhase, HitCause, World};
pub use tick::{TickInput, tick};
pub use weapons::{Shot, Weapon, WeaponKind, WeaponManager, WeaponStats};
