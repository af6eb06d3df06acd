use glam::Vec3;

use stereoscope_core::Eye;

use super::StereoEngine;
use crate::camera::{Camera, CameraUniforms};
use crate::error::{RenderError, RenderResult};

/// Render context passed to the host renderer for each eye.
pub struct RenderContext<'a> {
    /// The wgpu device.
    pub device: &'a wgpu::Device,
    /// The wgpu queue.
    pub queue: &'a wgpu::Queue,
    /// The command encoder.
    pub encoder: &'a mut wgpu::CommandEncoder,
    /// The eye color view, already cleared this frame.
    pub view: &'a wgpu::TextureView,
    /// The eye depth view, cleared to 1.0.
    pub depth_view: &'a wgpu::TextureView,
    /// Color format of `view`.
    pub color_format: wgpu::TextureFormat,
    /// Uniform buffer holding this eye's [`CameraUniforms`].
    pub camera_buffer: &'a wgpu::Buffer,
    /// The eye camera.
    pub camera: &'a Camera,
    /// Which eye is being drawn.
    pub eye: Eye,
}

/// Draws host content into an eye target.
pub trait EyeRenderer {
    /// Records draw commands for one eye. Passes should load, not clear.
    fn render_eye(&mut self, ctx: &mut RenderContext<'_>);
}

/// Renderer that leaves the eye targets at the clear color.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClearOnly;

impl EyeRenderer for ClearOnly {
    fn render_eye(&mut self, _ctx: &mut RenderContext<'_>) {}
}

impl StereoEngine {
    /// Renders both eyes: uploads camera uniforms, clears each target, then
    /// lets `renderer` draw into it. Both eyes go out in one submission.
    ///
    /// Targets must have been prepared this frame.
    pub fn render_eyes(
        &mut self,
        cameras: &[Camera; 2],
        renderer: &mut dyn EyeRenderer,
        clear_color: Vec3,
    ) -> RenderResult<()> {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("stereo eye encoder"),
            });

        for eye in Eye::BOTH {
            let camera = &cameras[eye.index()];
            let target = self.targets.target(eye);
            let textures = target
                .textures()
                .ok_or(RenderError::TargetNotCreated(eye))?;
            let camera_buffer = &self.camera_buffers[eye.index()];

            self.queue.write_buffer(
                camera_buffer,
                0,
                bytemuck::cast_slice(&[CameraUniforms::from(camera)]),
            );

            {
                let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("eye clear pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &textures.color_view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color {
                                r: f64::from(clear_color.x),
                                g: f64::from(clear_color.y),
                                b: f64::from(clear_color.z),
                                a: 1.0,
                            }),
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                        view: &textures.depth_view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }),
                    ..Default::default()
                });
            }

            let mut ctx = RenderContext {
                device: &self.device,
                queue: &self.queue,
                encoder: &mut encoder,
                view: &textures.color_view,
                depth_view: &textures.depth_view,
                color_format: target.format(),
                camera_buffer,
                camera,
                eye,
            };
            renderer.render_eye(&mut ctx);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }
}
