//! Tunable parameters.
//!
//! Every field has a default matching the shipped game feel, so a config
//! document only needs to list what it overrides:
//!
//! ```
//! use skirmish_core::config::SimulationConfig;
//!
//! let config = SimulationConfig::from_json_str(r#"{ "locomotion": { "dash_force": 60.0 } }"#)
//!     .unwrap();
//! assert!((config.locomotion.dash_force - 60.0).abs() < f32::EPSILON);
//! assert!((config.locomotion.lock_radius - 5.0).abs() < f32::EPSILON);
//! ```

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::lock::TieBreak;
use crate::presenter::Rgba;

/// Default fixed physics timestep (50 Hz).
pub const DEFAULT_FIXED_DT: f32 = 1.0 / 50.0;

/// Locomotion controller parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Force applied along the input direction while free.
    pub move_force: f32,
    /// Lock-on radius; candidates must be strictly closer.
    pub lock_radius: f32,
    /// Force applied toward the dash target while dashing.
    pub dash_force: f32,
    /// Rule for equal-distance lock candidates.
    pub tie_break: TieBreak,
    /// Camera follow anchor, relative to the actor.
    pub camera_follow_offset: Vec3,
    /// Camera look-at anchor, relative to the actor.
    pub camera_look_at_offset: Vec3,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            move_force: 3.0,
            lock_radius: 5.0,
            dash_force: 40.0,
            tie_break: TieBreak::FirstEncountered,
            camera_follow_offset: Vec3::new(0.0, 1.5, 0.0),
            camera_look_at_offset: Vec3::new(0.0, 1.0, 0.0),
        }
    }
}

impl LocomotionConfig {
    /// Checks that forces and radius are usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("locomotion.move_force", self.move_force)?;
        non_negative("locomotion.dash_force", self.dash_force)?;
        positive("locomotion.lock_radius", self.lock_radius)?;
        Ok(())
    }
}

/// Crosshair presenter parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrosshairConfig {
    /// Color while nothing is locked (transparent hides the sprite).
    pub idle_color: Rgba,
    /// Color while locked on.
    pub lock_color: Rgba,
    /// Screen position shown while nothing is locked.
    pub rest_position: Vec2,
}

impl Default for CrosshairConfig {
    fn default() -> Self {
        Self {
            idle_color: Rgba::TRANSPARENT,
            lock_color: Rgba::RED,
            rest_position: Vec2::ZERO,
        }
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Physics timestep in seconds.
    pub fixed_dt: f32,
    /// Defaults for every attached controller.
    pub locomotion: LocomotionConfig,
    /// Crosshair presentation.
    pub crosshair: CrosshairConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fixed_dt: DEFAULT_FIXED_DT,
            locomotion: LocomotionConfig::default(),
            crosshair: CrosshairConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Parses and validates a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("fixed_dt", self.fixed_dt)?;
        self.locomotion.validate()
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            value,
            reason: "must be finite and non-negative",
        })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            value,
            reason: "must be finite and positive",
        })
    }
}
