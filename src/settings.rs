//! Arena configuration
//!
//! Everything a run can tune lives here and round-trips through JSON. Missing
//! fields fall back to the defaults in `consts`, so a settings file only needs
//! the values it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::body::Bounds;
use crate::sim::fragment::SplitPolicy;
use crate::sim::geometry::GeometryError;

/// Error type for loading and validating settings
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error while reading the settings file
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed JSON or a field of the wrong type
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// Well-formed but out of range
    #[error("invalid setting: {0}")]
    Invalid(String),
    /// The arena could not be populated with these values
    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),
}

/// Tunable arena settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,

    // === Asteroids ===
    /// Smallest asteroid radius; also the radius lost per split
    pub asteroid_min_radius: f32,
    /// Number of rungs on the size ladder
    pub asteroid_kinds: u32,
    /// Seconds between field spawns
    pub asteroid_spawn_rate: f32,
    /// Split angle range (degrees)
    pub split_angle_min: f32,
    pub split_angle_max: f32,
    /// Whether the edge spawner runs at all
    pub spawn_asteroids: bool,

    // === Player ===
    pub starting_lives: u8,
    pub bomb_max_count: u32,

    // === Power-ups ===
    /// Drop probability per destroyed asteroid (0.0 - 1.0)
    pub powerup_spawn_chance: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,

            asteroid_min_radius: ASTEROID_MIN_RADIUS,
            asteroid_kinds: ASTEROID_KINDS,
            asteroid_spawn_rate: ASTEROID_SPAWN_RATE_SECONDS,
            split_angle_min: ASTEROID_SPLIT_ANGLE_MIN,
            split_angle_max: ASTEROID_SPLIT_ANGLE_MAX,
            spawn_asteroids: true,

            starting_lives: STARTING_LIVES,
            bomb_max_count: BOMB_MAX_COUNT,

            powerup_spawn_chance: POWERUP_SPAWN_CHANCE,
        }
    }
}

impl Settings {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.arena_width, self.arena_height)
    }

    pub fn split_policy(&self) -> Result<SplitPolicy, GeometryError> {
        SplitPolicy::new(
            self.asteroid_min_radius,
            self.asteroid_min_radius,
            self.split_angle_min,
            self.split_angle_max,
        )
    }

    /// Largest radius on the ladder
    pub fn asteroid_max_radius(&self) -> f32 {
        self.asteroid_min_radius * self.asteroid_kinds as f32
    }

    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(name: &str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")))
            }
        }

        positive("arena_width", self.arena_width)?;
        positive("arena_height", self.arena_height)?;
        positive("asteroid_min_radius", self.asteroid_min_radius)?;
        positive("asteroid_spawn_rate", self.asteroid_spawn_rate)?;

        if self.asteroid_kinds == 0 {
            return Err(ConfigError::Invalid("asteroid_kinds must be at least 1".into()));
        }
        if !(self.split_angle_min.is_finite()
            && self.split_angle_max.is_finite()
            && 0.0 <= self.split_angle_min
            && self.split_angle_min <= self.split_angle_max)
        {
            return Err(ConfigError::Invalid(format!(
                "split angle range {}..{} is not ordered",
                self.split_angle_min, self.split_angle_max
            )));
        }
        self.split_policy()?;
        if self.starting_lives == 0 {
            return Err(ConfigError::Invalid("starting_lives must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.powerup_spawn_chance) {
            return Err(ConfigError::Invalid(format!(
                "powerup_spawn_chance must be in [0, 1], got {}",
                self.powerup_spawn_chance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.asteroid_max_radius(), 60.0);
        assert_eq!(settings.bounds().center().x, ARENA_WIDTH / 2.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "arena_width": 800.0, "starting_lives": 5 }"#).unwrap();
        assert_eq!(settings.arena_width, 800.0);
        assert_eq!(settings.starting_lives, 5);
        assert_eq!(settings.arena_height, ARENA_HEIGHT);
        assert_eq!(settings.asteroid_kinds, ASTEROID_KINDS);
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = Settings::default();
        settings.powerup_spawn_chance = 0.5;
        settings.spawn_asteroids = false;
        let parsed = Settings::from_json(&settings.to_json().unwrap()).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Settings::from_json(r#"{ "arena_width": -1.0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "split_angle_min": 60.0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "powerup_spawn_chance": 1.5 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "asteroid_kinds": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Settings::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file_and_fallback() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("drift-arena-settings-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "asteroid_spawn_rate": 2.0 }"#).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.asteroid_spawn_rate, 2.0);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(Settings::load(&path), Err(ConfigError::Io(_))));
        assert_eq!(Settings::load_or_default(&path), Settings::default());
    }

    #[test]
    fn test_split_policy_follows_ladder() {
        let mut settings = Settings::default();
        settings.asteroid_min_radius = 15.0;
        let policy = settings.split_policy().unwrap();
        assert_eq!(policy.min_radius(), 15.0);
        assert_eq!(policy.radius_step(), 15.0);
        assert_eq!(policy.angle_range().1, ASTEROID_SPLIT_ANGLE_MAX);
        assert_eq!(policy.child_radius(30.0), 15.0);
        assert_eq!(policy.child_radius(20.0), 15.0);
    }
}
