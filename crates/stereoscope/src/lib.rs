//! stereoscope-rs: head-tracked stereoscopic rendering.
//!
//! A viewer wearing tracked glasses looks at content anchored to a physical
//! board. Every frame the pipeline reads the head pose, composes world-space
//! head and eye poses relative to the board, renders both eyes into offscreen
//! targets, optionally mirrors them on screen, and submits the eye textures
//! with board-relative poses to the display device.
//!
//! # Quick Start
//!
//! ```no_run
//! use stereoscope::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let options = StereoOptions::default().with_mirror_mode(MirrorMode::Stereoscopic);
//!     let mut presenter = NullPresenter;
//!     let (w, h) = query_eye_size(&mut presenter, &options);
//!     let engine = pollster::block_on(StereoEngine::new_headless(w, h, options.srgb))
//!         .map_err(|e| StereoError::Render(e.to_string()))?;
//!
//!     let mut pipeline =
//!         StereoPipeline::new(options, GpuBackend::new(engine), NullTracker, presenter);
//!     let board = BoardPose::IDENTITY;
//!     let report = pipeline.tick(Some(&board));
//!     println!("{:?}", report.outcome);
//!     Ok(())
//! }
//! ```
//!
//! # Collaborators
//!
//! - [`TrackingProvider`] supplies availability and the head pose.
//! - [`DevicePresenter`] receives each [`FrameSubmission`].
//! - [`StereoBackend`] renders; [`GpuBackend`] is the wgpu implementation.
//! - [`EyeRenderer`] draws host content into each eye.

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Pixel sizes are converted to f32 for aspect ratios
#![allow(clippy::cast_precision_loss)]

pub mod backend;
mod headless;
mod init;
pub mod mock;
pub mod pipeline;

pub use backend::{GpuBackend, StereoBackend};
pub use headless::{render_headless_frames, render_headless_to_file};
pub use init::init_logging;
pub use mock::{MockTracker, RecordingPresenter, TrackingStep};
pub use pipeline::{query_eye_size, FrameOutcome, FrameReport, PipelineStats, StereoPipeline};

// Re-export core types
pub use stereoscope_core::{
    BoardPose, ContentScale, DevicePresenter, Eye, FrameSubmission, Frustum, LengthUnit,
    MirrorMode, NativeHandle, NullPresenter, NullTracker, Pose, ProjectionSettings, Result,
    StereoError, StereoOptions, SubmitError, TrackingError, TrackingProvider, ViewerPose,
    ViewerSource, ViewportRect,
};

// Re-export render types
pub use stereoscope_render::{
    AvailabilityChange, Camera, ClearOnly, EyeRenderer, MirrorImage, RenderContext, RenderError,
    RenderMode, StereoEngine,
};

// Re-export glam types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
