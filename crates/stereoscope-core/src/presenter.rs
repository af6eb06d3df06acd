//! Device presenter interface and the per-frame submission packet.

use glam::{Quat, Vec3};

use crate::composer::Composition;
use crate::error::{StereoError, SubmitError};
use crate::pose::Eye;
use crate::projection::{flip_handedness, Frustum};

/// Display resolution used when the device cannot be queried.
pub const FALLBACK_DISPLAY_SIZE: (u32, u32) = (2432, 768);

/// Opaque reference to a GPU texture, passed to the device layer as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeHandle(pub u64);

impl NativeHandle {
    /// The null handle.
    pub const NULL: NativeHandle = NativeHandle(0);

    /// Returns whether this is the null handle.
    #[must_use]
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// Everything the device needs to display one stereo frame.
///
/// Eye poses are relative to the board frame, in the device's handedness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSubmission {
    pub left_texture: NativeHandle,
    pub right_texture: NativeHandle,
    pub texture_width: u32,
    pub texture_height: u32,
    pub is_srgb: bool,
    pub frustum: Frustum,
    pub left_rotation: Quat,
    pub left_position: Vec3,
    pub right_rotation: Quat,
    pub right_position: Vec3,
}

impl FrameSubmission {
    /// Builds a submission from this frame's composition and eye textures.
    #[must_use]
    pub fn from_composition(
        composition: &Composition,
        textures: [NativeHandle; 2],
        texture_size: (u32, u32),
        is_srgb: bool,
        frustum: Frustum,
    ) -> Self {
        let left = composition.eye_in_board(Eye::Left);
        let right = composition.eye_in_board(Eye::Right);
        Self {
            left_texture: textures[Eye::Left.index()],
            right_texture: textures[Eye::Right.index()],
            texture_width: texture_size.0,
            texture_height: texture_size.1,
            is_srgb,
            frustum,
            left_rotation: flip_handedness(left.rotation),
            left_position: left.position,
            right_rotation: flip_handedness(right.rotation),
            right_position: right.position,
        }
    }

    /// Returns whether both texture handles are non-null.
    #[must_use]
    pub fn has_textures(&self) -> bool {
        !self.left_texture.is_null() && !self.right_texture.is_null()
    }
}

/// The external display subsystem frames are handed to.
pub trait DevicePresenter {
    /// Submits one stereo frame. Must not block waiting on hardware.
    fn submit_frame(&mut self, frame: &FrameSubmission) -> Result<(), SubmitError>;

    /// Queries the full display resolution (both eyes side by side).
    fn query_display_dimensions(&mut self) -> Result<(u32, u32), StereoError>;
}

impl<T: DevicePresenter + ?Sized> DevicePresenter for Box<T> {
    fn submit_frame(&mut self, frame: &FrameSubmission) -> Result<(), SubmitError> {
        (**self).submit_frame(frame)
    }

    fn query_display_dimensions(&mut self) -> Result<(u32, u32), StereoError> {
        (**self).query_display_dimensions()
    }
}

/// Queries display dimensions once, using `fallback` when the query fails
/// or reports a size too small to split into two eyes.
pub fn display_dimensions_or_fallback<P: DevicePresenter + ?Sized>(
    presenter: &mut P,
    fallback: (u32, u32),
) -> (u32, u32) {
    match presenter.query_display_dimensions() {
        Ok((w, h)) if w >= 2 && h >= 1 => (w, h),
        Ok((w, h)) => {
            log::warn!(
                "Display reported unusable size {w}x{h}, using {}x{}",
                fallback.0,
                fallback.1
            );
            fallback
        }
        Err(e) => {
            log::warn!("Display query failed ({e}), using {}x{}", fallback.0, fallback.1);
            fallback
        }
    }
}

/// Per-eye target size for a full display size: half the width, full height.
#[must_use]
pub fn eye_target_size(display: (u32, u32)) -> (u32, u32) {
    ((display.0 / 2).max(1), display.1.max(1))
}

/// A presenter that accepts every frame and reports the fallback size.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPresenter;

impl DevicePresenter for NullPresenter {
    fn submit_frame(&mut self, _frame: &FrameSubmission) -> Result<(), SubmitError> {
        Ok(())
    }

    fn query_display_dimensions(&mut self) -> Result<(u32, u32), StereoError> {
        Ok(FALLBACK_DISPLAY_SIZE)
    }
}
