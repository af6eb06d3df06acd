use std::sync::atomic::{AtomicU64, Ordering};

use stereoscope_core::{Eye, NativeHandle};

use crate::error::{RenderError, RenderResult};
use crate::render_target::EyeTarget;

/// Depth format of the eye targets.
pub const EYE_DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

// Handle 0 is reserved for `NativeHandle::NULL`.
static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

fn next_handle() -> NativeHandle {
    NativeHandle(NEXT_HANDLE.fetch_add(1, Ordering::Relaxed))
}

/// Returns the eye color format for the sRGB setting.
#[must_use]
pub fn eye_color_format(srgb: bool) -> wgpu::TextureFormat {
    if srgb {
        wgpu::TextureFormat::Rgba8UnormSrgb
    } else {
        wgpu::TextureFormat::Rgba8Unorm
    }
}

/// GPU resources of one created eye target.
#[derive(Debug)]
pub(crate) struct EyeTextures {
    pub color: wgpu::Texture,
    pub color_view: wgpu::TextureView,
    pub depth_view: wgpu::TextureView,
    pub handle: NativeHandle,
}

/// A wgpu color + depth target for one eye.
#[derive(Debug)]
pub struct GpuEyeTarget {
    device: wgpu::Device,
    eye: Eye,
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
    textures: Option<EyeTextures>,
}

impl GpuEyeTarget {
    /// Describes a target; GPU resources are allocated by [`EyeTarget::create`].
    pub fn new(device: &wgpu::Device, eye: Eye, width: u32, height: u32, srgb: bool) -> Self {
        Self {
            device: device.clone(),
            eye,
            width,
            height,
            format: eye_color_format(srgb),
            textures: None,
        }
    }

    /// Color format of the target.
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub(crate) fn textures(&self) -> Option<&EyeTextures> {
        self.textures.as_ref()
    }

    fn extent(&self) -> wgpu::Extent3d {
        wgpu::Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: 1,
        }
    }
}

impl EyeTarget for GpuEyeTarget {
    fn is_created(&self) -> bool {
        self.textures.is_some()
    }

    fn create(&mut self) -> RenderResult<()> {
        let max = self.device.limits().max_texture_dimension_2d;
        if self.width == 0 || self.height == 0 || self.width > max || self.height > max {
            return Err(RenderError::TextureCreationFailed(format!(
                "{} eye target size {}x{} outside 1..={max}",
                self.eye.name(),
                self.width,
                self.height
            )));
        }

        let color_label = format!("{} Eye Color", self.eye.name());
        let color = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&color_label),
            size: self.extent(),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let color_view = color.create_view(&wgpu::TextureViewDescriptor::default());

        let depth_label = format!("{} Eye Depth", self.eye.name());
        let depth = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&depth_label),
            size: self.extent(),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: EYE_DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let depth_view = depth.create_view(&wgpu::TextureViewDescriptor::default());

        self.textures = Some(EyeTextures {
            color,
            color_view,
            depth_view,
            handle: next_handle(),
        });
        Ok(())
    }

    fn release(&mut self) {
        if let Some(textures) = self.textures.take() {
            textures.color.destroy();
        }
    }

    fn native_handle(&self) -> Option<NativeHandle> {
        self.textures.as_ref().map(|t| t.handle)
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
