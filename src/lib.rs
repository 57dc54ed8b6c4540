//! Drift Arena - A toroidal asteroid-field arcade simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, collision geometry, entity registry,
//!   fragmentation, per-tick update)
//! - `settings`: Data-driven arena configuration

pub mod settings;
pub mod sim;

pub use settings::{ConfigError, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 1080.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Player ship
    pub const PLAYER_RADIUS: f32 = 20.0;
    /// Degrees per second
    pub const PLAYER_TURN_SPEED: f32 = 300.0;
    /// Forward acceleration (pixels/s²)
    pub const PLAYER_ACCELERATION: f32 = 500.0;
    /// Drag coefficient applied as `vel *= 1 - friction * dt`
    pub const PLAYER_FRICTION: f32 = 0.5;
    /// Reverse thrust is weaker than forward thrust
    pub const PLAYER_REVERSE_THRUST: f32 = -0.5;
    pub const PLAYER_SPEED_BOOST_MULTIPLIER: f32 = 1.8;
    /// Invulnerability after a respawn (seconds)
    pub const PLAYER_RESPAWN_INVULNERABILITY: f32 = 3.0;

    /// Asteroids
    pub const ASTEROID_MIN_RADIUS: f32 = 20.0;
    pub const ASTEROID_KINDS: u32 = 3;
    pub const ASTEROID_SPAWN_RATE_SECONDS: f32 = 0.8;
    pub const ASTEROID_SPAWN_SPEED_MIN: f32 = 40.0;
    pub const ASTEROID_SPAWN_SPEED_MAX: f32 = 100.0;
    /// Max heading deviation from the edge normal at spawn (degrees)
    pub const ASTEROID_SPAWN_ANGLE_JITTER: f32 = 30.0;
    /// Split angle range (degrees)
    pub const ASTEROID_SPLIT_ANGLE_MIN: f32 = 20.0;
    pub const ASTEROID_SPLIT_ANGLE_MAX: f32 = 50.0;
    pub const ASTEROID_VERTEX_COUNT: usize = 10;
    pub const ASTEROID_LUMP_VARIANCE: f32 = 0.3;
    /// Spin range (degrees per second)
    pub const ASTEROID_ROTATION_SPEED_MIN: f32 = 20.0;
    pub const ASTEROID_ROTATION_SPEED_MAX: f32 = 80.0;

    /// Shots
    pub const SHOT_RADIUS: f32 = 5.0;
    pub const SHOT_LIFETIME: f32 = 3.0;

    /// Bombs
    pub const BOMB_RADIUS: f32 = 12.0;
    pub const BOMB_FUSE_TIME: f32 = 2.0;
    pub const BOMB_DETONATING_WINDOW: f32 = 0.2;
    pub const BOMB_EXPLOSION_RADIUS: f32 = 150.0;
    pub const BOMB_MAX_COUNT: u32 = 3;
    pub const BOMB_DROP_SPEED: f32 = 50.0;
    pub const BOMB_DROP_COOLDOWN: f32 = 0.5;
    pub const BOMB_DRAG: f32 = 0.5;

    /// Power-ups
    pub const POWERUP_SPAWN_CHANCE: f32 = 0.25;
    pub const POWERUP_RADIUS: f32 = 15.0;
    /// Bob phase speed (radians per second)
    pub const POWERUP_FLOAT_SPEED: f32 = 1.5;
    pub const POWERUP_FLOAT_AMPLITUDE: f32 = 5.0;
    pub const POWERUP_DRIFT_SPEED: f32 = 20.0;
    pub const POWERUP_LIFETIME: f32 = 15.0;

    /// Scoring
    pub const SCORE_SHOT_KILL: u64 = 10;
    pub const SCORE_BOMB_KILL: u64 = 15;
    pub const SCORE_SHIELD_KILL: u64 = 5;
    pub const SCORE_PICKUP: u64 = 25;

    pub const STARTING_LIVES: u8 = 3;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Unit vector the ship's nose points along for a heading (radians).
///
/// Heading 0 faces +Y; positive headings turn counter-clockwise.
#[inline]
pub fn heading_vector(heading: f32) -> Vec2 {
    Vec2::from_angle(heading).rotate(Vec2::Y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_normalize_angle() {
        // 3π lands on the ±π seam; either sign is the same angle
        assert!((normalize_angle(3.0 * PI).abs() - PI).abs() < 1e-5);
        assert!((normalize_angle(5.0 * FRAC_PI_2) - FRAC_PI_2).abs() < 1e-5);
        assert!((normalize_angle(-FRAC_PI_2) + FRAC_PI_2).abs() < 1e-6);
        let a = normalize_angle(-7.0);
        assert!((-PI..PI).contains(&a));
    }

    #[test]
    fn test_heading_vector() {
        assert!((heading_vector(0.0) - Vec2::Y).length() < 1e-6);
        // Quarter turn counter-clockwise from +Y is -X
        assert!((heading_vector(FRAC_PI_2) - Vec2::NEG_X).length() < 1e-6);
    }
}
