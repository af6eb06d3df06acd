//! The per-frame scheduler.
//!
//! [`StereoPipeline::tick`] runs one frame in a fixed order: tracking, pose
//! composition, camera placement, target checkpoint, eye rendering, mirror
//! compositing, handle acquisition and submission. Nothing inside a tick
//! blocks on hardware and no error escapes it; every stage logs and falls
//! back to a safe default, and the outcome is described by a [`FrameReport`].

use stereoscope_core::{
    display_dimensions_or_fallback, eye_target_size, BoardPose, DevicePresenter, FrameSubmission,
    MirrorMode, ReferenceFrameComposer, StereoError, StereoOptions, SubmitError, TrackingProvider,
    ViewerSource, ViewportRect,
};
use stereoscope_render::{
    AvailabilityChange, Camera, DriverUpdate, MirrorCompositor, RenderMode, StereoCameraDriver,
};

use crate::backend::StereoBackend;

/// How a frame ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Both eyes rendered and the device accepted the frame.
    Submitted,
    /// The device is unavailable; only the mono view is active.
    Mono,
    /// No head pose camera is assigned; nothing was updated.
    MissingCamera,
    /// Eye targets could not be prepared or rendered.
    RenderFailed,
    /// Eyes rendered but a native handle was unavailable.
    MissingTextures,
    /// The device rejected the frame.
    Rejected(SubmitError),
}

impl FrameOutcome {
    /// Returns whether a stereo frame was rendered but not delivered.
    pub fn is_dropped(&self) -> bool {
        matches!(
            self,
            FrameOutcome::RenderFailed | FrameOutcome::MissingTextures | FrameOutcome::Rejected(_)
        )
    }
}

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// 1-based frame counter.
    pub frame_index: u64,
    /// The viewer pose used this frame and where it came from.
    pub viewer: ViewerSource,
    /// Device availability as reported by the tracking provider.
    pub available: bool,
    /// Availability transition since the previous frame.
    pub availability: AvailabilityChange,
    /// Render mode chosen by the camera driver; `None` if the update was skipped.
    pub mode: Option<RenderMode>,
    /// Eye targets recreated at this frame's checkpoint.
    pub targets_recreated: usize,
    /// Letterbox/pillarbox rectangle used for the mirror, if one was composited.
    pub mirror_viewport: Option<ViewportRect>,
    pub outcome: FrameOutcome,
}

impl FrameReport {
    /// Returns whether the frame reached the device.
    pub fn submitted(&self) -> bool {
        self.outcome == FrameOutcome::Submitted
    }
}

/// Cumulative counters over the pipeline's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub frames: u64,
    pub tracked_frames: u64,
    pub fallback_frames: u64,
    pub mono_frames: u64,
    pub skipped_frames: u64,
    pub submitted_frames: u64,
    pub dropped_frames: u64,
    pub target_recreations: u64,
}

/// Flags for warnings emitted once per transition.
#[derive(Debug, Default)]
struct WarnState {
    missing_board: bool,
    bad_scale: bool,
    submit_failing: bool,
    render_failing: bool,
}

/// Latches `flag` and returns true on a false -> true transition.
fn rising(flag: &mut bool, now: bool) -> bool {
    let fire = now && !*flag;
    *flag = now;
    fire
}

/// Drives one stereo frame per [`tick`](Self::tick).
///
/// Tracking, presentation and rendering are injected collaborators, so the
/// pipeline runs the same against a real device, mocks, or nothing at all.
pub struct StereoPipeline<B, T, P> {
    options: StereoOptions,
    backend: B,
    tracker: T,
    presenter: P,
    composer: ReferenceFrameComposer,
    driver: StereoCameraDriver,
    compositor: MirrorCompositor,
    camera: Option<Camera>,
    window_size: (u32, u32),
    frame_index: u64,
    stats: PipelineStats,
    warnings: WarnState,
}

impl<B: StereoBackend, T: TrackingProvider, P: DevicePresenter> StereoPipeline<B, T, P> {
    /// Creates a pipeline with a head pose camera built from the options.
    ///
    /// The camera's aspect ratio follows the backend's eye targets. Invalid
    /// options are logged and sanitized rather than rejected, so no frame
    /// ever composes a non-finite pose.
    pub fn new(options: StereoOptions, backend: B, tracker: T, presenter: P) -> Self {
        if let Err(e) = options.validate() {
            log::warn!("Stereo options are invalid, sanitizing: {e}");
        }
        let options = options.sanitized();
        let (eye_width, eye_height) = backend.eye_size();
        let projection = options
            .projection
            .with_aspect_ratio(eye_width as f32 / eye_height.max(1) as f32)
            .sanitized();
        let camera = Camera::from_projection(&projection);
        let composer = ReferenceFrameComposer::new(options.ipd_meters);

        log::info!(
            "Stereo pipeline ready: eye targets {eye_width}x{eye_height}, mirror {}",
            options.mirror_mode.name()
        );

        Self {
            options,
            backend,
            tracker,
            presenter,
            composer,
            driver: StereoCameraDriver::new(),
            compositor: MirrorCompositor::new(),
            camera: Some(camera),
            // Until the host reports a window, mirror into one of the eye size.
            window_size: (eye_width, eye_height),
            frame_index: 0,
            stats: PipelineStats::default(),
            warnings: WarnState::default(),
        }
    }

    /// Runs one frame. Never fails; see [`FrameReport`] for the outcome.
    pub fn tick(&mut self, board: Option<&BoardPose>) -> FrameReport {
        self.frame_index += 1;
        self.stats.frames += 1;

        // Tracking and pose composition.
        let sample = ViewerSource::select(&mut self.tracker, &self.options.fallback_pose);
        if sample.source.is_tracked() {
            self.stats.tracked_frames += 1;
        } else {
            self.stats.fallback_frames += 1;
        }

        if rising(&mut self.warnings.missing_board, board.is_none()) {
            log::warn!("{}; using the identity board", StereoError::MissingBoard);
        }
        let composition =
            self.composer
                .compose(board, &self.options.content_scale, sample.source.pose());
        if rising(&mut self.warnings.bad_scale, composition.scale_clamped) {
            log::warn!(
                "World-to-board scale is not positive; clamped to {}",
                composition.world_to_board_scale
            );
        }

        let mut report = FrameReport {
            frame_index: self.frame_index,
            viewer: sample.source,
            available: sample.available,
            availability: AvailabilityChange::Unchanged,
            mode: None,
            targets_recreated: 0,
            mirror_viewport: None,
            outcome: FrameOutcome::MissingCamera,
        };

        // Camera placement.
        let mirror_mode = self.options.mirror_mode;
        let update = self.driver.update(
            self.camera.as_mut(),
            &composition.poses,
            sample.available,
            mirror_mode,
        );
        let DriverUpdate::Updated { mode, availability } = update else {
            self.stats.skipped_frames += 1;
            return report;
        };
        report.mode = Some(mode);
        report.availability = availability;

        let Some(camera) = self.camera.as_mut() else {
            self.stats.skipped_frames += 1;
            return report;
        };

        if !mode.is_stereo() {
            self.compositor.end_frame(camera);
            self.stats.mono_frames += 1;
            report.outcome = FrameOutcome::Mono;
            return report;
        }

        // Single recreation checkpoint, before any eye renders.
        match self.backend.prepare_targets() {
            Ok(recreated) => {
                report.targets_recreated = recreated;
                self.stats.target_recreations += recreated as u64;
            }
            Err(e) => {
                if rising(&mut self.warnings.render_failing, true) {
                    log::warn!("Eye targets unavailable, dropping frame: {e}");
                }
                self.compositor.end_frame(camera);
                self.stats.dropped_frames += 1;
                report.outcome = FrameOutcome::RenderFailed;
                return report;
            }
        }

        let eye_size = self.backend.eye_size();
        let mirrored = mode == RenderMode::StereoMirrored;
        if mirrored {
            let rect = self
                .compositor
                .begin_frame(camera, mirror_mode, self.window_size, eye_size);
            report.mirror_viewport = Some(rect);
        }

        if let Err(e) = self
            .backend
            .render_eyes(self.driver.eyes(), self.options.clear_color)
        {
            if rising(&mut self.warnings.render_failing, true) {
                log::warn!("Eye rendering failed, dropping frame: {e}");
            }
            self.compositor.end_frame(camera);
            self.stats.dropped_frames += 1;
            report.outcome = FrameOutcome::RenderFailed;
            report.mirror_viewport = None;
            return report;
        }
        self.warnings.render_failing = false;

        if mirrored {
            if let Err(e) = self.backend.composite_mirror(mirror_mode) {
                log::warn!("Mirror compositing failed: {e}");
                report.mirror_viewport = None;
            }
        }
        self.compositor.end_frame(camera);

        // Handles are acquired after rendering, right before submission.
        let Some(handles) = self.backend.acquire_native_handles() else {
            log::warn!("Eye target handles unavailable, dropping frame {}", self.frame_index);
            self.stats.dropped_frames += 1;
            report.outcome = FrameOutcome::MissingTextures;
            return report;
        };

        let frame = FrameSubmission::from_composition(
            &composition,
            handles,
            eye_size,
            self.backend.is_srgb(),
            camera.frustum(),
        );
        match self.presenter.submit_frame(&frame) {
            Ok(()) => {
                if self.warnings.submit_failing {
                    log::info!("Frame submission recovered at frame {}", self.frame_index);
                }
                self.warnings.submit_failing = false;
                self.backend.signal_frame_sent();
                self.stats.submitted_frames += 1;
                report.outcome = FrameOutcome::Submitted;
            }
            Err(e) => {
                let error = StereoError::Submission(e.clone());
                if rising(&mut self.warnings.submit_failing, true) {
                    log::warn!("Frame {}: {error}", self.frame_index);
                } else {
                    log::debug!("Frame {}: {error}", self.frame_index);
                }
                self.stats.dropped_frames += 1;
                report.outcome = FrameOutcome::Rejected(e);
            }
        }
        report
    }

    /// Releases both eye targets, e.g. after a fullscreen toggle. They are
    /// recreated at the next tick's checkpoint.
    pub fn invalidate_all(&mut self) {
        self.backend.invalidate_all();
    }

    /// Sets the on-screen window size used for mirror letterboxing.
    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
    }

    /// Sets the mirror mode from the next tick on.
    pub fn set_mirror_mode(&mut self, mode: MirrorMode) {
        self.options.mirror_mode = mode;
    }

    /// Assigns or removes the head pose camera.
    pub fn set_camera(&mut self, camera: Option<Camera>) {
        self.camera = camera;
    }

    /// The head pose camera, if assigned.
    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    /// The head pose camera, mutably. Projection edits propagate to the eye
    /// cameras on the next tick.
    pub fn camera_mut(&mut self) -> Option<&mut Camera> {
        self.camera.as_mut()
    }

    /// The two eye cameras.
    pub fn eye_cameras(&self) -> &[Camera; 2] {
        self.driver.eyes()
    }

    pub fn options(&self) -> &StereoOptions {
        &self.options
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn tracker_mut(&mut self) -> &mut T {
        &mut self.tracker
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }
}

/// Queries the device once for its display size and returns the per-eye
/// target size, using the configured fallback resolution on failure.
pub fn query_eye_size<P: DevicePresenter + ?Sized>(
    presenter: &mut P,
    options: &StereoOptions,
) -> (u32, u32) {
    eye_target_size(display_dimensions_or_fallback(
        presenter,
        options.fallback_display_size,
    ))
}
