//! Cameras placed at head and eye poses.

use glam::{Mat4, Quat, Vec3};

use stereoscope_core::{Frustum, Pose, ProjectionSettings, ViewportRect};

/// A perspective camera positioned by a world-space pose.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Camera orientation in world space. Looks down local -Z.
    pub rotation: Quat,
    /// Vertical field of view in radians.
    pub fov: f32,
    /// Aspect ratio (width / height).
    pub aspect_ratio: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Normalized viewport within the output surface.
    pub viewport: ViewportRect,
    /// Whether this camera renders.
    pub enabled: bool,
}

impl Camera {
    /// Creates a new camera with default settings.
    #[must_use]
    pub fn new(aspect_ratio: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            fov: 48f32.to_radians(),
            aspect_ratio,
            near: 0.1,
            far: 100.0,
            viewport: ViewportRect::FULL,
            enabled: true,
        }
    }

    /// Creates a camera from projection settings.
    #[must_use]
    pub fn from_projection(settings: &ProjectionSettings) -> Self {
        let mut camera = Self::new(1.0);
        camera.apply_projection(settings);
        camera
    }

    /// Copies FOV, clip planes and aspect ratio from projection settings.
    pub fn apply_projection(&mut self, settings: &ProjectionSettings) {
        let s = settings.sanitized();
        self.fov = s.fov_radians();
        self.near = s.near;
        self.far = s.far;
        self.aspect_ratio = s.aspect_ratio;
    }

    /// Copies FOV, clip planes and aspect ratio from another camera verbatim.
    pub fn copy_projection_from(&mut self, other: &Camera) {
        self.fov = other.fov;
        self.near = other.near;
        self.far = other.far;
        self.aspect_ratio = other.aspect_ratio;
    }

    /// Returns this camera's projection settings.
    #[must_use]
    pub fn projection_settings(&self) -> ProjectionSettings {
        ProjectionSettings {
            fov_degrees: self.fov.to_degrees(),
            near: self.near,
            far: self.far,
            aspect_ratio: self.aspect_ratio,
        }
    }

    /// Places the camera at a world-space pose.
    pub fn set_pose(&mut self, pose: &Pose) {
        self.position = pose.position;
        self.rotation = pose.rotation;
    }

    /// Returns the camera's world-space pose.
    #[must_use]
    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.rotation)
    }

    /// Returns the view matrix.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    /// Returns the projection matrix.
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect_ratio, self.near, self.far)
    }

    /// Returns the combined view-projection matrix.
    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Returns the symmetric frustum half-extents at unit distance.
    #[must_use]
    pub fn frustum(&self) -> Frustum {
        Frustum::from_fov(self.fov, self.aspect_ratio)
    }

    /// Returns the camera's forward direction.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Returns FOV in degrees.
    #[must_use]
    pub fn fov_degrees(&self) -> f32 {
        self.fov.to_degrees()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(1216.0 / 768.0)
    }
}

/// Camera uniforms for GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
#[allow(clippy::pub_underscore_fields)]
pub struct CameraUniforms {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub view_proj: [[f32; 4]; 4],
    pub inv_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 3],
    pub _padding: f32,
}

impl Default for CameraUniforms {
    fn default() -> Self {
        Self {
            view: Mat4::IDENTITY.to_cols_array_2d(),
            proj: Mat4::IDENTITY.to_cols_array_2d(),
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            inv_proj: Mat4::IDENTITY.to_cols_array_2d(),
            camera_pos: [0.0; 3],
            _padding: 0.0,
        }
    }
}

impl From<&Camera> for CameraUniforms {
    fn from(camera: &Camera) -> Self {
        let view = camera.view_matrix();
        let proj = camera.projection_matrix();
        Self {
            view: view.to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
            view_proj: (proj * view).to_cols_array_2d(),
            inv_proj: proj.inverse().to_cols_array_2d(),
            camera_pos: camera.position.to_array(),
            _padding: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_defaults() {
        let camera = Camera::default();
        assert!((camera.fov_degrees() - 48.0).abs() < 1e-4);
        assert!(camera.enabled);
        assert!(camera.viewport.is_full());
    }

    #[test]
    fn test_view_matrix_moves_camera_to_origin() {
        let mut camera = Camera::new(1.0);
        camera.set_pose(&Pose::new(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_rotation_y(0.7),
        ));
        let eye_in_view = camera.view_matrix().transform_point3(camera.position);
        assert!(eye_in_view.abs_diff_eq(Vec3::ZERO, 1e-5));
        let ahead = camera.position + camera.forward();
        let ahead_in_view = camera.view_matrix().transform_point3(ahead);
        assert!(ahead_in_view.abs_diff_eq(Vec3::NEG_Z, 1e-5));
    }

    #[test]
    fn test_projection_roundtrip() {
        let settings = ProjectionSettings::default().with_fov_degrees(60.0);
        let camera = Camera::from_projection(&settings);
        let back = camera.projection_settings();
        assert!((back.fov_degrees - 60.0).abs() < 1e-4);
        assert_eq!(back.near, settings.near);
        assert_eq!(back.far, settings.far);
    }

    #[test]
    fn test_apply_projection_clamps_degenerate_values() {
        let mut camera = Camera::new(1.0);
        camera.apply_projection(&ProjectionSettings {
            fov_degrees: 0.0,
            near: -1.0,
            far: f32::NAN,
            aspect_ratio: 0.0,
        });
        assert!((camera.fov_degrees() - 1.0).abs() < 1e-4);
        assert!(camera.near > 0.0 && camera.far > camera.near);
        assert_eq!(camera.aspect_ratio, 1.0);
        assert!(camera.projection_matrix().is_finite());
    }

    #[test]
    fn test_uniforms_from_camera() {
        let mut camera = Camera::new(1.5);
        camera.position = Vec3::new(0.0, 0.5, -0.5);
        let uniforms = CameraUniforms::from(&camera);
        assert_eq!(uniforms.camera_pos, [0.0, 0.5, -0.5]);
        let proj = Mat4::from_cols_array_2d(&uniforms.proj);
        assert!(proj.w_axis.z != 0.0);
    }
}
