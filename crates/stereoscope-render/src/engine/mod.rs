//! The headless stereo rendering engine.

mod mirror;
mod rendering;
mod textures;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use wgpu::util::DeviceExt;

use stereoscope_core::{Eye, NativeHandle};

use crate::camera::CameraUniforms;
use crate::error::{RenderError, RenderResult};
use crate::render_target::StereoTargets;

pub use mirror::MirrorImage;
pub use rendering::{ClearOnly, EyeRenderer, RenderContext};
pub use textures::{eye_color_format, GpuEyeTarget, EYE_DEPTH_FORMAT};

/// Owns the wgpu device, both eye targets and the mirror texture.
pub struct StereoEngine {
    /// The wgpu instance.
    pub instance: wgpu::Instance,
    /// The wgpu adapter.
    pub adapter: wgpu::Adapter,
    /// The wgpu device.
    pub device: wgpu::Device,
    /// The wgpu queue.
    pub queue: wgpu::Queue,
    targets: StereoTargets<GpuEyeTarget>,
    srgb: bool,
    camera_buffers: [wgpu::Buffer; 2],
    mirror: Option<mirror::MirrorTarget>,
    device_lost: Arc<AtomicBool>,
    frames_sent: Arc<AtomicU64>,
}

impl StereoEngine {
    /// Creates a headless engine with eye targets of the given per-eye size.
    ///
    /// Targets are allocated at the first [`prepare_targets`](Self::prepare_targets).
    pub async fn new_headless(eye_width: u32, eye_height: u32, srgb: bool) -> RenderResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..wgpu::InstanceDescriptor::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| RenderError::AdapterCreationFailed)?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("stereoscope device (headless)"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
            })
            .await?;

        let info = adapter.get_info();
        log::info!(
            "Stereo engine on {} ({:?}), eye targets {eye_width}x{eye_height}",
            info.name,
            info.backend
        );

        let device_lost = Arc::new(AtomicBool::new(false));
        let lost_flag = Arc::clone(&device_lost);
        device.set_device_lost_callback(move |reason, message| {
            log::error!("Graphics device lost ({reason:?}): {message}");
            lost_flag.store(true, Ordering::SeqCst);
        });

        let targets = StereoTargets::new(
            GpuEyeTarget::new(&device, Eye::Left, eye_width, eye_height, srgb),
            GpuEyeTarget::new(&device, Eye::Right, eye_width, eye_height, srgb),
        );

        let camera_buffers = Eye::BOTH.map(|eye| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(match eye {
                    Eye::Left => "left eye camera uniforms",
                    Eye::Right => "right eye camera uniforms",
                }),
                contents: bytemuck::cast_slice(&[CameraUniforms::default()]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            })
        });

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
            targets,
            srgb,
            camera_buffers,
            mirror: None,
            device_lost,
            frames_sent: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Per-eye target size.
    pub fn eye_size(&self) -> (u32, u32) {
        self.targets.size()
    }

    /// Whether the eye targets use an sRGB color format.
    pub fn is_srgb(&self) -> bool {
        self.srgb
    }

    /// The eye target state machine.
    pub fn targets(&self) -> &StereoTargets<GpuEyeTarget> {
        &self.targets
    }

    /// Returns whether the device-lost callback has fired.
    pub fn is_device_lost(&self) -> bool {
        self.device_lost.load(Ordering::SeqCst)
    }

    /// Per-frame checkpoint: recreates invalidated eye targets.
    ///
    /// After a device loss both targets are invalidated and
    /// [`RenderError::DeviceLost`] is returned on every call.
    pub fn prepare_targets(&mut self) -> RenderResult<usize> {
        if self.is_device_lost() {
            self.targets.invalidate_all();
            self.mirror = None;
            return Err(RenderError::DeviceLost);
        }
        self.targets.prepare_frame()
    }

    /// Releases both eye targets; they are recreated at the next checkpoint.
    pub fn invalidate_all(&mut self) {
        self.targets.invalidate_all();
    }

    /// Releases one eye target.
    pub fn invalidate(&mut self, eye: Eye) {
        self.targets.invalidate(eye);
    }

    /// Returns both native handles, left first, or `None` if either target
    /// is not created.
    pub fn acquire_native_handles(&mut self) -> Option<[NativeHandle; 2]> {
        self.targets.acquire_native_handles()
    }

    /// Resolves a native handle to the eye color texture it names.
    ///
    /// Handles of released targets resolve to `None`.
    pub fn texture_for_handle(&self, handle: NativeHandle) -> Option<&wgpu::Texture> {
        Eye::BOTH
            .iter()
            .filter_map(|&eye| self.targets.target(eye).textures())
            .find(|t| t.handle == handle)
            .map(|t| &t.color)
    }

    /// Issues the "frame sent" signal once the GPU finishes this frame's work.
    ///
    /// Returns immediately; the counter is bumped from the queue callback.
    pub fn signal_frame_sent(&self) {
        let frames_sent = Arc::clone(&self.frames_sent);
        self.queue.on_submitted_work_done(move || {
            frames_sent.fetch_add(1, Ordering::Relaxed);
        });
    }

    /// Number of frame-sent signals that have completed on the GPU.
    pub fn frames_sent(&self) -> u64 {
        self.frames_sent.load(Ordering::Relaxed)
    }

    /// Blocks until all submitted GPU work has finished.
    pub fn wait_idle(&self) {
        let _ = self.device.poll(wgpu::PollType::wait_indefinitely());
    }
}
