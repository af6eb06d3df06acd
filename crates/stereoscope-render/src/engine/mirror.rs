use stereoscope_core::{mirror_offset, Eye, MirrorMode};

use super::StereoEngine;
use crate::error::{RenderError, RenderResult};

/// The composited mirror texture and the mode it was built for.
#[derive(Debug)]
pub(crate) struct MirrorTarget {
    texture: wgpu::Texture,
    mode: MirrorMode,
    width: u32,
    height: u32,
}

/// Mirror image read back from the GPU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorImage {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8 rows, top row first.
    pub data: Vec<u8>,
}

impl MirrorImage {
    /// Returns the RGBA value of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        self.data.get(i..i + 4).and_then(|p| p.try_into().ok())
    }
}

/// Calculates bytes per row with proper alignment for wgpu buffer copies.
fn aligned_bytes_per_row(width: u32) -> u32 {
    let unaligned = width * 4;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unaligned.div_ceil(align) * align
}

impl StereoEngine {
    /// Copies the eye targets into the mirror texture for `mode`.
    ///
    /// Side-by-side places the left eye at `(0, 0)` and the right eye at
    /// `(eye_width, 0)`. [`MirrorMode::None`] drops the mirror texture.
    pub fn composite_mirror(&mut self, mode: MirrorMode) -> RenderResult<()> {
        if mode == MirrorMode::None {
            self.mirror = None;
            return Ok(());
        }

        let (eye_width, eye_height) = self.eye_size();
        let (width, height) = mode.mirror_size(eye_width, eye_height);
        let reusable = self
            .mirror
            .as_ref()
            .is_some_and(|m| m.width == width && m.height == height);
        if !reusable {
            log::debug!("Creating {width}x{height} mirror texture for {}", mode.name());
            let texture = self.device.create_texture(&wgpu::TextureDescriptor {
                label: Some("Mirror Texture"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: super::eye_color_format(self.srgb),
                usage: wgpu::TextureUsages::COPY_DST
                    | wgpu::TextureUsages::COPY_SRC
                    | wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            });
            self.mirror = Some(MirrorTarget {
                texture,
                mode,
                width,
                height,
            });
        }
        let Some(mirror) = self.mirror.as_mut() else {
            return Err(RenderError::MirrorUnavailable);
        };
        mirror.mode = mode;

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("mirror composite encoder"),
            });
        for eye in Eye::BOTH {
            let Some(offset) = mirror_offset(mode, eye, eye_width) else {
                continue;
            };
            let textures = self
                .targets
                .target(eye)
                .textures()
                .ok_or(RenderError::TargetNotCreated(eye))?;
            encoder.copy_texture_to_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &textures.color,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                wgpu::TexelCopyTextureInfo {
                    texture: &mirror.texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d {
                        x: offset,
                        y: 0,
                        z: 0,
                    },
                    aspect: wgpu::TextureAspect::All,
                },
                wgpu::Extent3d {
                    width: eye_width,
                    height: eye_height,
                    depth_or_array_layers: 1,
                },
            );
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    /// The mirror texture and the mode it was last composited for.
    pub fn mirror_texture(&self) -> Option<(&wgpu::Texture, MirrorMode)> {
        self.mirror.as_ref().map(|m| (&m.texture, m.mode))
    }

    /// Reads the mirror texture back to CPU memory. Blocks on the GPU.
    pub fn capture_mirror(&self) -> RenderResult<MirrorImage> {
        let mirror = self.mirror.as_ref().ok_or(RenderError::MirrorUnavailable)?;
        let (width, height) = (mirror.width, mirror.height);
        let bytes_per_row = aligned_bytes_per_row(width);

        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("mirror readback buffer"),
            size: u64::from(bytes_per_row) * u64::from(height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("mirror capture encoder"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &mirror.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        let buffer_slice = buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        let _ = self.device.poll(wgpu::PollType::wait_indefinitely());
        rx.recv()
            .map_err(|_| RenderError::BufferMapFailed)?
            .map_err(|_| RenderError::BufferMapFailed)?;

        // Copy data, removing row padding
        let data = buffer_slice.get_mapped_range();
        let row_bytes = (width * 4) as usize;
        let mut result = Vec::with_capacity(row_bytes * height as usize);
        for row in 0..height {
            let start = (row * bytes_per_row) as usize;
            result.extend_from_slice(&data[start..start + row_bytes]);
        }
        drop(data);
        buffer.unmap();

        Ok(MirrorImage {
            width,
            height,
            data: result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aligned_bytes_per_row() {
        assert_eq!(aligned_bytes_per_row(64), 256);
        assert_eq!(aligned_bytes_per_row(65), 512);
        assert_eq!(aligned_bytes_per_row(1216) % wgpu::COPY_BYTES_PER_ROW_ALIGNMENT, 0);
    }

    #[test]
    fn test_mirror_image_pixel() {
        let image = MirrorImage {
            width: 2,
            height: 1,
            data: vec![1, 2, 3, 4, 5, 6, 7, 8],
        };
        assert_eq!(image.pixel(1, 0), Some([5, 6, 7, 8]));
        assert_eq!(image.pixel(2, 0), None);
    }
}
