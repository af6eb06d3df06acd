//! Configuration options for the stereo pipeline.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::composer::DEFAULT_IPD_METERS;
use crate::content_scale::ContentScale;
use crate::error::{Result, StereoError};
use crate::pose::Pose;
use crate::presenter::FALLBACK_DISPLAY_SIZE;
use crate::projection::ProjectionSettings;
use crate::viewport::MirrorMode;

/// Fallback viewer position in board meters.
pub const DEFAULT_FALLBACK_POSITION: Vec3 = Vec3::new(0.0, 0.5, -0.5);

/// Fallback viewer rotation as XYZ Euler angles in degrees.
pub const DEFAULT_FALLBACK_EULER_DEGREES: Vec3 = Vec3::new(-45.0, 0.0, 0.0);

/// Pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StereoOptions {
    /// Projection settings copied onto both eye cameras.
    pub projection: ProjectionSettings,

    /// What the on-screen mirror shows.
    pub mirror_mode: MirrorMode,

    /// Viewer pose used whenever tracking is unavailable.
    pub fallback_pose: Pose,

    /// Inter-pupillary distance in meters.
    pub ipd_meters: f32,

    /// Display resolution used when the device cannot be queried.
    pub fallback_display_size: (u32, u32),

    /// Whether eye textures are sRGB.
    pub srgb: bool,

    /// Content scale.
    pub content_scale: ContentScale,

    /// Eye target clear color (linear RGB).
    pub clear_color: Vec3,
}

impl Default for StereoOptions {
    fn default() -> Self {
        Self {
            projection: ProjectionSettings::default(),
            mirror_mode: MirrorMode::LeftEye,
            fallback_pose: Pose::from_euler_degrees(
                DEFAULT_FALLBACK_POSITION,
                DEFAULT_FALLBACK_EULER_DEGREES,
            ),
            ipd_meters: DEFAULT_IPD_METERS,
            fallback_display_size: FALLBACK_DISPLAY_SIZE,
            srgb: true,
            content_scale: ContentScale::default(),
            clear_color: Vec3::ZERO,
        }
    }
}

impl StereoOptions {
    /// Creates options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the mirror mode.
    #[must_use]
    pub fn with_mirror_mode(mut self, mode: MirrorMode) -> Self {
        self.mirror_mode = mode;
        self
    }

    /// Sets the projection settings.
    #[must_use]
    pub fn with_projection(mut self, projection: ProjectionSettings) -> Self {
        self.projection = projection;
        self
    }

    /// Sets the fallback viewer pose.
    #[must_use]
    pub fn with_fallback_pose(mut self, pose: Pose) -> Self {
        self.fallback_pose = pose;
        self
    }

    /// Sets the content scale.
    #[must_use]
    pub fn with_content_scale(mut self, content_scale: ContentScale) -> Self {
        self.content_scale = content_scale;
        self
    }

    /// Sets the IPD in meters.
    #[must_use]
    pub fn with_ipd_meters(mut self, ipd: f32) -> Self {
        self.ipd_meters = ipd;
        self
    }

    /// Sets the fallback display size.
    #[must_use]
    pub fn with_fallback_display_size(mut self, width: u32, height: u32) -> Self {
        self.fallback_display_size = (width, height);
        self
    }

    /// Checks values that would otherwise be clamped at runtime.
    pub fn validate(&self) -> Result<()> {
        if !self.content_scale.is_valid() {
            return Err(StereoError::InvalidScale(self.content_scale.ratio));
        }
        let p = &self.projection;
        if !(p.fov_degrees > 0.0 && p.fov_degrees < 180.0) {
            return Err(StereoError::Config(format!(
                "field of view {} must be in (0, 180) degrees",
                p.fov_degrees
            )));
        }
        if !(p.near > 0.0 && p.far > p.near) {
            return Err(StereoError::Config(format!(
                "clip planes near={} far={} must satisfy 0 < near < far",
                p.near, p.far
            )));
        }
        if !(self.ipd_meters.is_finite() && self.ipd_meters >= 0.0) {
            return Err(StereoError::Config(format!(
                "IPD {} must be non-negative",
                self.ipd_meters
            )));
        }
        if self.fallback_display_size.0 < 2 || self.fallback_display_size.1 == 0 {
            return Err(StereoError::Config(format!(
                "fallback display size {:?} is too small",
                self.fallback_display_size
            )));
        }
        if !self.fallback_pose.is_usable() {
            return Err(StereoError::Config(format!(
                "fallback pose {:?} is not finite or has a zero rotation",
                self.fallback_pose
            )));
        }
        Ok(())
    }

    /// Returns a copy that is safe to run frames with.
    ///
    /// Projection values are clamped. An unusable fallback pose reverts to
    /// the default fallback pose and an invalid IPD to
    /// [`DEFAULT_IPD_METERS`], each with a warning.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.projection = self.projection.sanitized();
        if !self.fallback_pose.is_usable() {
            let default = Self::default().fallback_pose;
            log::warn!(
                "Fallback pose {:?} is unusable; using {:?}",
                self.fallback_pose,
                default
            );
            self.fallback_pose = default;
        }
        if !(self.ipd_meters.is_finite() && self.ipd_meters >= 0.0) {
            log::warn!(
                "IPD {} is invalid; using {DEFAULT_IPD_METERS}",
                self.ipd_meters
            );
            self.ipd_meters = DEFAULT_IPD_METERS;
        }
        self
    }

    /// Parses and validates options from JSON. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Reads and validates options from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serializes the options to pretty JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
