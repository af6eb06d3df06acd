//! Rendering backend for stereoscope-rs.
//!
//! This crate provides the wgpu side of the stereo pipeline:
//! - Eye render targets with a Created/NotCreated state machine
//! - The stereo camera driver and camera uniforms
//! - Mirror viewport handling and GPU mirror compositing
//! - A headless engine and mirror capture to PNG/JPEG

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Pixel sizes are converted to f32 for aspect ratios
#![allow(clippy::cast_precision_loss)]

pub mod camera;
pub mod compositor;
pub mod engine;
pub mod error;
pub mod render_target;
pub mod screenshot;
pub mod stereo_camera;

pub use camera::{Camera, CameraUniforms};
pub use compositor::MirrorCompositor;
pub use engine::{
    eye_color_format, ClearOnly, EyeRenderer, GpuEyeTarget, MirrorImage, RenderContext,
    StereoEngine, EYE_DEPTH_FORMAT,
};
pub use error::{RenderError, RenderResult};
pub use render_target::{EyeTarget, StereoTargets, TargetState};
pub use screenshot::{save_image, save_to_buffer, ScreenshotError};
pub use stereo_camera::{AvailabilityChange, DriverUpdate, RenderMode, StereoCameraDriver};
