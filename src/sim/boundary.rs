//! Playable rectangle derived from the camera frustum
//!
//! The rectangle is recomputed whenever it is needed because the viewport
//! aspect can change between any two frames.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Host viewport size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width over height; a collapsed viewport reports 1.0
    pub fn aspect(&self) -> f32 {
        if self.width > 0.0 && self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}

/// Symmetric rectangle `[-x_limit, x_limit] × [-y_limit, y_limit]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x_limit: f32,
    pub y_limit: f32,
}

impl Bounds {
    /// Compute the playable rectangle for a perspective camera
    ///
    /// Limits never go negative: a viewport too small for the padding
    /// collapses the rectangle onto the center line.
    pub fn from_camera(fov_deg: f32, camera_distance: f32, aspect: f32, padding: Vec2) -> Self {
        let frustum_height = 2.0 * camera_distance * (fov_deg * std::f32::consts::PI / 360.0).tan();
        let frustum_width = frustum_height * aspect;
        Self {
            x_limit: (frustum_width / 2.0 - padding.x).max(0.0),
            y_limit: (frustum_height / 2.0 - padding.y).max(0.0),
        }
    }

    /// Playable rectangle for the configured camera and current viewport
    pub fn for_viewport(tuning: &Tuning, viewport: &Viewport) -> Self {
        Self::from_camera(
            tuning.camera_fov_deg,
            tuning.camera_z,
            viewport.aspect(),
            Vec2::new(tuning.padding_x, tuning.padding_y),
        )
    }

    pub fn contains(&self, pos: Vec3) -> bool {
        pos.x.abs() <= self.x_limit && pos.y.abs() <= self.y_limit
    }

    /// Clamp the lateral coordinates into the rectangle; depth is untouched
    pub fn clamp(&self, pos: Vec3) -> Vec3 {
        Vec3::new(
            pos.x.clamp(-self.x_limit, self.x_limit),
            pos.y.clamp(-self.y_limit, self.y_limit),
            pos.z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_camera_limits() {
        let bounds = Bounds::from_camera(75.0, 10.0, 16.0 / 9.0, Vec2::new(6.0, 5.0));
        // frustum height = 20 * tan(37.5°) ≈ 15.347
        assert!((bounds.y_limit - (7.6733 - 5.0)).abs() < 1e-3);
        assert!((bounds.x_limit - (7.6733 * 16.0 / 9.0 - 6.0)).abs() < 1e-3);
    }

    #[test]
    fn test_tiny_viewport_collapses_to_center() {
        let bounds = Bounds::from_camera(75.0, 10.0, 0.2, Vec2::new(6.0, 5.0));
        assert_eq!(bounds.x_limit, 0.0);
        assert_eq!(bounds.clamp(Vec3::new(3.0, 0.0, 1.0)).x, 0.0);
    }

    #[test]
    fn test_clamp_keeps_depth() {
        let bounds = Bounds { x_limit: 2.0, y_limit: 1.0 };
        let clamped = bounds.clamp(Vec3::new(-9.0, 9.0, -42.0));
        assert_eq!(clamped, Vec3::new(-2.0, 1.0, -42.0));
    }

    #[test]
    fn test_degenerate_viewport_aspect() {
        assert_eq!(Viewport::new(0.0, 720.0).aspect(), 1.0);
        assert_eq!(Viewport::new(800.0, 400.0).aspect(), 2.0);
    }

    proptest! {
        #[test]
        fn clamped_position_is_inside(
            x in -1000.0f32..1000.0,
            y in -1000.0f32..1000.0,
            width in 1.0f32..4000.0,
            height in 1.0f32..4000.0,
        ) {
            let bounds = Bounds::for_viewport(&Tuning::default(), &Viewport::new(width, height));
            let clamped = bounds.clamp(Vec3::new(x, y, 5.0));
            prop_assert!(bounds.contains(clamped));
            prop_assert!(-bounds.x_limit <= clamped.x && clamped.x <= bounds.x_limit);
            prop_assert!(-bounds.y_limit <= clamped.y && clamped.y <= bounds.y_limit);
        }
    }
}
