//! Asteroid fragmentation
//!
//! A hit asteroid is removed from the registry and, if it is larger than the
//! minimum threshold, replaced by two smaller children flying apart at ±θ from
//! the parent's heading. Parent removal and child insertion happen within one
//! call, so no pass ever observes a half-split asteroid.

use glam::Vec2;
use rand::Rng;

use super::asteroid::Asteroid;
use super::geometry::GeometryError;
use super::registry::{EntityKind, Handle, Registry};
use crate::consts::*;

/// Split tuning. Only constructible in a valid state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitPolicy {
    min_radius: f32,
    radius_step: f32,
    /// Split angle range (degrees)
    angle_min: f32,
    angle_max: f32,
}

impl Default for SplitPolicy {
    fn default() -> Self {
        Self {
            min_radius: ASTEROID_MIN_RADIUS,
            radius_step: ASTEROID_MIN_RADIUS,
            angle_min: ASTEROID_SPLIT_ANGLE_MIN,
            angle_max: ASTEROID_SPLIT_ANGLE_MAX,
        }
    }
}

impl SplitPolicy {
    pub fn new(
        min_radius: f32,
        radius_step: f32,
        angle_min: f32,
        angle_max: f32,
    ) -> Result<Self, GeometryError> {
        if !(min_radius.is_finite() && min_radius > 0.0) {
            return Err(GeometryError::InvalidRadius(min_radius));
        }
        if !(radius_step.is_finite() && radius_step > 0.0) {
            return Err(GeometryError::InvalidSplitStep(radius_step));
        }
        if !(angle_min.is_finite() && angle_max.is_finite() && angle_min <= angle_max) {
            return Err(GeometryError::InvalidAngleRange(angle_min, angle_max));
        }
        Ok(Self {
            min_radius,
            radius_step,
            angle_min,
            angle_max,
        })
    }

    /// At or below this radius a hit destroys the asteroid outright
    pub fn min_radius(&self) -> f32 {
        self.min_radius
    }

    /// Radius lost per split
    pub fn radius_step(&self) -> f32 {
        self.radius_step
    }

    /// Split angle range in degrees
    pub fn angle_range(&self) -> (f32, f32) {
        (self.angle_min, self.angle_max)
    }

    pub fn is_terminal(&self, radius: f32) -> bool {
        radius <= self.min_radius
    }

    /// Radius of each child; never below the threshold
    pub fn child_radius(&self, radius: f32) -> f32 {
        (radius - self.radius_step).max(self.min_radius)
    }
}

/// What a split left behind
#[derive(Debug, Clone, PartialEq)]
pub struct SplitOutcome {
    /// Parent position just before removal
    pub position: Vec2,
    /// Parent radius just before removal
    pub radius: f32,
    /// Half-angle between the children (radians); 0 for a terminal hit
    pub angle: f32,
    pub children: Vec<Handle>,
}

impl SplitOutcome {
    pub fn is_terminal(&self) -> bool {
        self.children.is_empty()
    }
}

/// Split the asteroid behind `handle`, drawing θ from the policy range.
///
/// Returns `None` if the handle is stale. The angle is only drawn when the
/// asteroid actually breaks into children.
pub fn split<R: Rng>(
    registry: &mut Registry,
    handle: Handle,
    policy: &SplitPolicy,
    rng: &mut R,
) -> Option<SplitOutcome> {
    let radius = registry.get::<Asteroid>(handle)?.radius();
    let angle = if policy.is_terminal(radius) {
        0.0
    } else {
        rng.random_range(policy.angle_min..=policy.angle_max).to_radians()
    };
    split_with_angle(registry, handle, policy, angle)
}

/// Split with a caller-chosen half-angle (radians)
pub fn split_with_angle(
    registry: &mut Registry,
    handle: Handle,
    policy: &SplitPolicy,
    angle: f32,
) -> Option<SplitOutcome> {
    if handle.kind() != EntityKind::Asteroid {
        return None;
    }
    let parent = registry.asteroids.take(handle.id())?;
    let position = parent.body.pos;
    let radius = parent.radius();

    if policy.is_terminal(radius) {
        log::debug!("Asteroid {} destroyed at r={}", handle.id(), radius);
        return Some(SplitOutcome {
            position,
            radius,
            angle: 0.0,
            children: Vec::new(),
        });
    }

    let child_radius = policy.child_radius(radius);
    let mut children = Vec::with_capacity(2);
    for theta in [angle, -angle] {
        let vel = Vec2::from_angle(theta).rotate(parent.body.vel);
        match Asteroid::new(position, vel, child_radius) {
            Ok(child) => children.push(registry.spawn(child)),
            Err(e) => log::warn!("Dropping fragment of asteroid {}: {}", handle.id(), e),
        }
    }

    log::debug!(
        "Asteroid {} split at ({:.1}, {:.1}) r={} into {} x r={}",
        handle.id(),
        position.x,
        position.y,
        radius,
        children.len(),
        child_radius
    );

    Some(SplitOutcome {
        position,
        radius,
        angle,
        children,
    })
}
