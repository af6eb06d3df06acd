//! Core abstractions for stereoscope-rs.
//!
//! This crate holds the GPU-independent half of the stereo pipeline:
//! - Length units and [`ContentScale`]
//! - Board, viewer and eye poses, and the [`ReferenceFrameComposer`]
//! - Projection settings, frustum parameters and handedness conversion
//! - Mirror modes and letterbox/pillarbox viewport math
//! - The [`TrackingProvider`] and [`DevicePresenter`] collaborator traits
//! - Configuration options and errors

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Pixel sizes are converted to f32 for aspect ratios
#![allow(clippy::cast_precision_loss)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod composer;
pub mod content_scale;
pub mod error;
pub mod options;
pub mod pose;
pub mod presenter;
pub mod projection;
pub mod tracking;
pub mod units;
pub mod viewport;

pub use composer::{
    board_to_world, world_to_board, world_to_board_scale, Composition, ReferenceFrameComposer,
    DEFAULT_IPD_METERS,
};
pub use content_scale::{clamp_scale, ContentScale, SCALE_EPSILON};
pub use error::{Result, StereoError, SubmitError, TrackingError};
pub use options::StereoOptions;
pub use pose::{BoardPose, Eye, Pose, StereoPoses, ViewerPose};
pub use presenter::{
    display_dimensions_or_fallback, eye_target_size, DevicePresenter, FrameSubmission,
    NativeHandle, NullPresenter, FALLBACK_DISPLAY_SIZE,
};
pub use projection::{flip_handedness, Frustum, ProjectionSettings};
pub use tracking::{NullTracker, TrackingProvider, TrackingSample, ViewerSource};
pub use units::{from_meters, to_meters, LengthUnit};
pub use viewport::{fit_viewport, mirror_offset, mirror_viewport, MirrorMode, ViewportRect};

// Re-export glam types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
