//! Stereo camera driver: keeps the two eye cameras in sync with a single
//! source-of-truth camera and places them at the composed eye poses.

use stereoscope_core::{Eye, MirrorMode, StereoError, StereoPoses};

use crate::camera::Camera;

/// How the frame is rendered after the driver update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Eye cameras disabled; the source camera renders a mono view.
    Mono,
    /// Eyes render and go to the device; no on-screen mirror.
    StereoHeadsetOnly,
    /// Eyes render, go to the device, and are mirrored on screen.
    StereoMirrored,
}

impl RenderMode {
    /// Returns whether the eye cameras render this frame.
    #[must_use]
    pub fn is_stereo(self) -> bool {
        !matches!(self, RenderMode::Mono)
    }
}

/// Change in device availability since the previous update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityChange {
    Unchanged,
    Connected,
    Disconnected,
}

/// Result of a driver update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverUpdate {
    /// Cameras were updated.
    Updated {
        mode: RenderMode,
        availability: AvailabilityChange,
    },
    /// No source camera was assigned; nothing was written.
    Skipped,
}

/// Owns the two eye cameras.
#[derive(Debug, Clone)]
pub struct StereoCameraDriver {
    eyes: [Camera; 2],
    was_available: Option<bool>,
    missing_source_reported: bool,
}

impl Default for StereoCameraDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl StereoCameraDriver {
    /// Creates a driver with both eye cameras disabled.
    #[must_use]
    pub fn new() -> Self {
        let mut eye = Camera::default();
        eye.enabled = false;
        Self {
            eyes: [eye.clone(), eye],
            was_available: None,
            missing_source_reported: false,
        }
    }

    /// Returns both eye cameras, left first.
    #[must_use]
    pub fn eyes(&self) -> &[Camera; 2] {
        &self.eyes
    }

    /// Returns one eye camera.
    #[must_use]
    pub fn eye(&self, eye: Eye) -> &Camera {
        &self.eyes[eye.index()]
    }

    /// Updates the source camera and both eye cameras for this frame.
    ///
    /// The source camera is placed at the head pose. When it is `None` the
    /// update is skipped entirely and nothing is written.
    pub fn update(
        &mut self,
        source: Option<&mut Camera>,
        poses: &StereoPoses,
        available: bool,
        mirror_mode: MirrorMode,
    ) -> DriverUpdate {
        let Some(source) = source else {
            if !self.missing_source_reported {
                log::warn!("{}; skipping stereo camera update", StereoError::MissingCamera);
                self.missing_source_reported = true;
            }
            return DriverUpdate::Skipped;
        };
        self.missing_source_reported = false;

        let availability = match (self.was_available, available) {
            (Some(false) | None, true) => AvailabilityChange::Connected,
            (Some(true), false) => AvailabilityChange::Disconnected,
            _ => AvailabilityChange::Unchanged,
        };
        match availability {
            AvailabilityChange::Connected => log::info!("Glasses available; enabling stereo rendering"),
            AvailabilityChange::Disconnected => {
                log::info!("Glasses unavailable; falling back to mono rendering");
            }
            AvailabilityChange::Unchanged => {}
        }
        self.was_available = Some(available);

        source.set_pose(&poses.head);

        let mode = match (available, mirror_mode) {
            (false, _) => RenderMode::Mono,
            (true, MirrorMode::None) => RenderMode::StereoHeadsetOnly,
            (true, _) => RenderMode::StereoMirrored,
        };

        for eye in Eye::BOTH {
            let camera = &mut self.eyes[eye.index()];
            camera.copy_projection_from(source);
            camera.set_pose(poses.eye(eye));
            camera.enabled = mode.is_stereo();
        }

        DriverUpdate::Updated { mode, availability }
    }
}
