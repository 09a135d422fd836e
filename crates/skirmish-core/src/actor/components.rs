//! Physical state components.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Default body mass in kilograms.
pub const DEFAULT_MASS: f32 = 1.0;

/// Default bounding sphere radius in meters.
pub const DEFAULT_RADIUS: f32 = 0.5;

/// Physical state of an actor's body.
///
/// Position, velocity and facing are written by the physics phase only. The
/// locomotion core reads them and proposes forces and facing changes through
/// [`Command`](crate::output::Command)s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyState {
    /// World position of the body center.
    pub position: Vec3,
    /// Linear velocity in meters per second.
    pub velocity: Vec3,
    /// Unit vector the body is facing.
    pub facing: Vec3,
    /// Mass in kilograms (must be positive).
    pub mass: f32,
    /// Radius of the bounding sphere used for contacts.
    pub radius: f32,
}

impl Default for BodyState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            facing: Vec3::NEG_Z,
            mass: DEFAULT_MASS,
            radius: DEFAULT_RADIUS,
        }
    }
}

impl BodyState {
    /// Creates a resting body at `position` with default mass and radius.
    #[must_use]
    pub fn at_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Returns a copy with the given radius.
    #[must_use]
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Returns a copy with the given mass.
    #[must_use]
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Returns `true` if the bounding spheres of `self` and `other` intersect.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        let reach = self.radius + other.radius;
        self.position.distance_squared(other.position) < reach * reach
    }
}
