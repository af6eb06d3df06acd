//! Headless rendering API for stereoscope-rs.
//!
//! Runs the pipeline on a headless GPU device without a window, tracking
//! hardware or display. Useful for integration tests and for previewing the
//! mirror image a configuration produces.

use pollster::FutureExt;

use stereoscope_core::{NullPresenter, Result, StereoError, StereoOptions};
use stereoscope_render::{MirrorImage, StereoEngine};

use crate::backend::GpuBackend;
use crate::mock::MockTracker;
use crate::pipeline::{query_eye_size, StereoPipeline};

/// Renders `frames` pipeline ticks and returns the last mirror image.
///
/// Creates a headless GPU context, presents to a [`NullPresenter`], and
/// reports the viewer as connected at the options' fallback pose. At least
/// one frame is always rendered.
///
/// # Errors
/// Fails if the options are invalid, no GPU adapter is available, or the
/// mirror mode is [`MirrorMode::None`](stereoscope_core::MirrorMode::None).
///
/// # Example
/// ```no_run
/// use stereoscope::*;
///
/// let image = render_headless_frames(&StereoOptions::default(), 1).unwrap();
/// assert_eq!((image.width, image.height), (1216, 768));
/// ```
pub fn render_headless_frames(options: &StereoOptions, frames: u32) -> Result<MirrorImage> {
    options.validate()?;
    let mut presenter = NullPresenter;
    let (eye_width, eye_height) = query_eye_size(&mut presenter, options);

    let engine = StereoEngine::new_headless(eye_width, eye_height, options.srgb)
        .block_on()
        .map_err(|e| StereoError::Render(format!("Failed to create headless engine: {e}")))?;

    let tracker = MockTracker::tracking(options.fallback_pose);
    let mut pipeline =
        StereoPipeline::new(options.clone(), GpuBackend::new(engine), tracker, presenter);

    for _ in 0..frames.max(1) {
        let report = pipeline.tick(None);
        log::debug!("Headless frame {}: {:?}", report.frame_index, report.outcome);
    }

    let engine = pipeline.backend().engine();
    engine.wait_idle();
    engine
        .capture_mirror()
        .map_err(|e| StereoError::Render(format!("Failed to capture mirror: {e}")))
}

/// Renders like [`render_headless_frames`] and saves the mirror image to a
/// PNG or JPEG file.
pub fn render_headless_to_file(
    path: impl AsRef<std::path::Path>,
    options: &StereoOptions,
    frames: u32,
) -> Result<()> {
    let image = render_headless_frames(options, frames)?;
    stereoscope_render::save_image(path, &image)
        .map_err(|e| StereoError::Render(format!("Failed to save image: {e}")))
}
