//! The render backend seam between the pipeline and the GPU.

use glam::Vec3;

use stereoscope_core::{MirrorMode, NativeHandle};
use stereoscope_render::{Camera, ClearOnly, EyeRenderer, RenderResult, StereoEngine};

/// What the pipeline needs from a renderer each frame.
///
/// Methods are called in frame order: `prepare_targets`, `render_eyes`,
/// `composite_mirror`, `acquire_native_handles`, then `signal_frame_sent`
/// if the device accepted the frame.
pub trait StereoBackend {
    /// Per-eye target size in pixels.
    fn eye_size(&self) -> (u32, u32);

    /// Whether eye targets are sRGB.
    fn is_srgb(&self) -> bool;

    /// Frame checkpoint: recreates invalidated targets. Returns how many were
    /// recreated.
    fn prepare_targets(&mut self) -> RenderResult<usize>;

    /// Renders both eyes from the given cameras, left first.
    fn render_eyes(&mut self, cameras: &[Camera; 2], clear_color: Vec3) -> RenderResult<()>;

    /// Builds the on-screen mirror image.
    fn composite_mirror(&mut self, mode: MirrorMode) -> RenderResult<()>;

    /// Native handles of both eye targets, or `None` if either is not created.
    fn acquire_native_handles(&mut self) -> Option<[NativeHandle; 2]>;

    /// Fire-and-forget "frame sent" signal. Must not block.
    fn signal_frame_sent(&mut self);

    /// Releases both eye targets; they are recreated at the next checkpoint.
    fn invalidate_all(&mut self);
}

/// [`StereoBackend`] backed by the wgpu [`StereoEngine`].
pub struct GpuBackend<R: EyeRenderer = ClearOnly> {
    engine: StereoEngine,
    renderer: R,
}

impl GpuBackend<ClearOnly> {
    /// Wraps an engine with a renderer that only clears the eye targets.
    pub fn new(engine: StereoEngine) -> Self {
        Self::with_renderer(engine, ClearOnly)
    }
}

impl<R: EyeRenderer> GpuBackend<R> {
    /// Wraps an engine with a host scene renderer.
    pub fn with_renderer(engine: StereoEngine, renderer: R) -> Self {
        Self { engine, renderer }
    }

    /// The underlying engine.
    pub fn engine(&self) -> &StereoEngine {
        &self.engine
    }

    /// The underlying engine, mutably.
    pub fn engine_mut(&mut self) -> &mut StereoEngine {
        &mut self.engine
    }

    /// The host renderer.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}

impl<R: EyeRenderer> StereoBackend for GpuBackend<R> {
    fn eye_size(&self) -> (u32, u32) {
        self.engine.eye_size()
    }

    fn is_srgb(&self) -> bool {
        self.engine.is_srgb()
    }

    fn prepare_targets(&mut self) -> RenderResult<usize> {
        self.engine.prepare_targets()
    }

    fn render_eyes(&mut self, cameras: &[Camera; 2], clear_color: Vec3) -> RenderResult<()> {
        self.engine.render_eyes(cameras, &mut self.renderer, clear_color)
    }

    fn composite_mirror(&mut self, mode: MirrorMode) -> RenderResult<()> {
        self.engine.composite_mirror(mode)
    }

    fn acquire_native_handles(&mut self) -> Option<[NativeHandle; 2]> {
        self.engine.acquire_native_handles()
    }

    fn signal_frame_sent(&mut self) {
        self.engine.signal_frame_sent();
    }

    fn invalidate_all(&mut self) {
        self.engine.invalidate_all();
    }
}
