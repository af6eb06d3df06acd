//! Projection settings and symmetric view frustum parameters.

use glam::{Mat4, Quat};
use serde::{Deserialize, Serialize};

/// Projection parameters shared by both eye cameras.
///
/// A single instance acts as the source of truth; the stereo camera driver
/// copies it onto both eyes every frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSettings {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Aspect ratio (width / height).
    pub aspect_ratio: f32,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 48.0,
            near: 0.1,
            far: 100.0,
            aspect_ratio: 1216.0 / 768.0,
        }
    }
}

impl ProjectionSettings {
    /// Vertical field of view in radians.
    #[must_use]
    pub fn fov_radians(&self) -> f32 {
        self.fov_degrees.to_radians()
    }

    /// Sets the field of view in degrees.
    #[must_use]
    pub fn with_fov_degrees(mut self, degrees: f32) -> Self {
        self.fov_degrees = degrees;
        self
    }

    /// Sets the clip planes.
    #[must_use]
    pub fn with_clip_planes(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    /// Sets the aspect ratio.
    #[must_use]
    pub fn with_aspect_ratio(mut self, aspect_ratio: f32) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Returns a copy with every value clamped into a usable range.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        let near = if self.near.is_finite() { self.near.max(0.001) } else { 0.1 };
        let far = if self.far.is_finite() { self.far.max(near + 0.1) } else { near + 100.0 };
        let fov_degrees = if self.fov_degrees.is_finite() {
            self.fov_degrees.clamp(1.0, 179.0)
        } else {
            48.0
        };
        let aspect_ratio = if self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0 {
            self.aspect_ratio
        } else {
            1.0
        };
        Self {
            fov_degrees,
            near,
            far,
            aspect_ratio,
        }
    }

    /// Right-handed perspective projection matrix.
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        let s = self.sanitized();
        Mat4::perspective_rh(s.fov_radians(), s.aspect_ratio, s.near, s.far)
    }

    /// Symmetric frustum half-extents at unit distance.
    #[must_use]
    pub fn frustum(&self) -> Frustum {
        Frustum::from_fov(self.fov_radians(), self.aspect_ratio)
    }
}

/// Symmetric view frustum half-extents at unit distance from the eye.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frustum {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl Frustum {
    /// Builds the frustum from a vertical field of view (radians) and aspect.
    #[must_use]
    pub fn from_fov(fov_y: f32, aspect_ratio: f32) -> Self {
        let top = (fov_y * 0.5).tan();
        let bottom = -top;
        Self {
            left: bottom * aspect_ratio,
            right: top * aspect_ratio,
            bottom,
            top,
        }
    }

    /// Total width at unit distance.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Total height at unit distance.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }
}

/// Converts a rotation into the device's opposite-handed convention.
///
/// Negates the vector part and preserves `w`.
#[must_use]
pub fn flip_handedness(rotation: Quat) -> Quat {
    Quat::from_xyzw(-rotation.x, -rotation.y, -rotation.z, rotation.w)
}
