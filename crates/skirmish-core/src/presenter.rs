//! Crosshair indicator.
//!
//! The presenter holds no state of its own. Each frame it looks at the lock
//! target's world position (if any) and produces a [`CrosshairFrame`] for the
//! UI layer to draw.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::CrosshairConfig;
use crate::view::ViewProvider;

/// Linear RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// Opaque red.
    pub const RED: Self = Self::new(1.0, 0.0, 0.0, 1.0);

    /// Creates a color from channels.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// What the crosshair should look like this frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrosshairFrame {
    /// Whether the lock-on style is active.
    pub engaged: bool,
    /// Sprite color.
    pub color: Rgba,
    /// Screen position in pixels.
    pub position: Vec2,
}

/// Two-state crosshair presenter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CrosshairPresenter {
    config: CrosshairConfig,
}

impl CrosshairPresenter {
    /// Creates a presenter.
    #[must_use]
    pub const fn new(config: CrosshairConfig) -> Self {
        Self { config }
    }

    /// Builds the frame for the given lock target position.
    ///
    /// A locked target that projects behind the camera keeps the engaged
    /// color but sits at the rest position.
    #[must_use]
    pub fn present(&self, lock_target: Option<Vec3>, view: &dyn ViewProvider) -> CrosshairFrame {
        match lock_target {
            Some(world) => CrosshairFrame {
                engaged: true,
                color: self.config.lock_color,
                position: view
                    .world_to_screen(world)
                    .unwrap_or(self.config.rest_position),
            },
            None => CrosshairFrame {
                engaged: false,
                color: self.config.idle_color,
                position: self.config.rest_position,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::PerspectiveCamera;

    fn presenter() -> CrosshairPresenter {
        CrosshairPresenter::new(CrosshairConfig {
            rest_position: Vec2::new(10.0, 10.0),
            ..CrosshairConfig::default()
        })
    }

    #[test]
    fn unlocked_is_idle_at_rest() {
        let frame = presenter().present(None, &PerspectiveCamera::default());
        assert!(!frame.engaged);
        assert_eq!(frame.color, Rgba::TRANSPARENT);
        assert_eq!(frame.position, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn locked_overlays_target() {
        let camera = PerspectiveCamera::default();
        let frame = presenter().present(Some(Vec3::new(0.0, 0.0, -5.0)), &camera);
        assert!(frame.engaged);
        assert_eq!(frame.color, Rgba::RED);
        assert!(frame.position.abs_diff_eq(camera.viewport * 0.5, 1e-3));
    }

    #[test]
    fn locked_behind_camera_stays_engaged_at_rest() {
        let frame =
            presenter().present(Some(Vec3::new(0.0, 0.0, 5.0)), &PerspectiveCamera::default());
        assert!(frame.engaged);
        assert_eq!(frame.position, Vec2::new(10.0, 10.0));
    }
}
