//! Camera orientation and screen projection.
//!
//! Conventions follow glam's right-handed frame: `+Y` is up, a camera with
//! identity orientation looks down `-Z` with `+X` to its right. Screen
//! coordinates are pixels with the origin at the bottom-left corner.

use glam::{Mat4, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// View provider consumed by the controller and the crosshair presenter.
pub trait ViewProvider: Send + Sync {
    /// World-space orientation of the viewing camera.
    fn orientation(&self) -> Quat;

    /// Projects a world position to screen pixels.
    ///
    /// Returns `None` when the point is behind the camera.
    fn world_to_screen(&self, world: Vec3) -> Option<Vec2>;
}

/// Drops the vertical component of `v`.
#[must_use]
pub fn planar(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Turns raw axis input into a ground-plane direction relative to the camera.
///
/// The input is built in camera space (`horizontal` along the camera's right,
/// `vertical` along its forward), rotated into world space, then flattened.
/// The result is not normalized: a camera pitched toward the ground yields a
/// shorter forward component, and normalizing is left to the force step.
#[must_use]
pub fn planar_direction(horizontal: f32, vertical: f32, orientation: Quat) -> Vec3 {
    let local = Vec3::X * horizontal + Vec3::NEG_Z * vertical;
    planar(orientation * local)
}

/// Simple perspective camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerspectiveCamera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Camera orientation in world space.
    pub orientation: Quat,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Viewport size in pixels.
    pub viewport: Vec2,
    /// Near clip distance.
    pub near: f32,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            fov_y: 60f32.to_radians(),
            viewport: Vec2::new(1920.0, 1080.0),
            near: 0.1,
        }
    }
}

impl PerspectiveCamera {
    /// Camera at `position` looking at `target` with `+Y` up.
    #[must_use]
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let view = Mat4::look_at_rh(position, target, Vec3::Y);
        let (_, rotation, _) = view.inverse().to_scale_rotation_translation();
        Self {
            position,
            orientation: rotation,
            ..Self::default()
        }
    }

    fn view_projection(&self) -> Mat4 {
        let aspect = self.viewport.x / self.viewport.y;
        let projection = Mat4::perspective_infinite_rh(self.fov_y, aspect, self.near);
        let view = Mat4::from_rotation_translation(self.orientation, self.position).inverse();
        projection * view
    }
}

impl ViewProvider for PerspectiveCamera {
    fn orientation(&self) -> Quat {
        self.orientation
    }

    fn world_to_screen(&self, world: Vec3) -> Option<Vec2> {
        let clip = self.view_projection() * world.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.x,
            (ndc.y + 1.0) * 0.5 * self.viewport.y,
        ))
    }
}
