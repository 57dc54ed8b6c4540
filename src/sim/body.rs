//! Kinematic body: the position/velocity/radius state every moving entity shares
//!
//! Integration and the toroidal wrap transform live here. Drag, lifetimes and
//! other per-kind behaviour belong to the owning entity, not to the body.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::GeometryError;

/// Arena extents consumed by the wrap transform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Center of the arena (player spawn point)
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// True if `pos` lies within the wrap margin `[-r, W+r] × [-r, H+r]`
    pub fn contains_with_margin(&self, pos: Vec2, margin: f32) -> bool {
        pos.x >= -margin
            && pos.x <= self.width + margin
            && pos.y >= -margin
            && pos.y <= self.height + margin
    }
}

/// The minimal simulable state shared by every movable entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    radius: f32,
}

impl Body {
    /// Create a body at rest. Rejects negative or non-finite radii.
    pub fn new(pos: Vec2, radius: f32) -> Result<Self, GeometryError> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(GeometryError::InvalidRadius(radius));
        }
        if !pos.is_finite() {
            return Err(GeometryError::NonFiniteVertex(pos));
        }
        Ok(Self {
            pos,
            vel: Vec2::ZERO,
            radius,
        })
    }

    /// Builder-style velocity
    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    /// Bounding radius (fixed at creation)
    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// position += velocity * dt
    #[inline]
    pub fn integrate(&mut self, dt: f32) {
        debug_assert!(dt >= 0.0, "negative timestep");
        self.pos += self.vel * dt;
    }

    /// Toroidal wrap: a body that leaves one edge by more than its radius
    /// reappears fully off-screen on the opposite edge.
    pub fn wrap(&mut self, bounds: &Bounds) {
        let r = self.radius;

        if self.pos.x < -r {
            self.pos.x = bounds.width + r;
        } else if self.pos.x > bounds.width + r {
            self.pos.x = -r;
        }

        if self.pos.y < -r {
            self.pos.y = bounds.height + r;
        } else if self.pos.y > bounds.height + r {
            self.pos.y = -r;
        }
    }

    /// Integrate then wrap, the standard per-tick motion step
    #[inline]
    pub fn advance(&mut self, dt: f32, bounds: &Bounds) {
        self.integrate(dt);
        self.wrap(bounds);
    }
}
