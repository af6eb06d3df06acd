//! Rendering error types.

use thiserror::Error;

use stereoscope_core::Eye;

/// Errors that can occur during rendering operations.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Failed to create wgpu adapter.
    #[error("failed to create graphics adapter")]
    AdapterCreationFailed,

    /// Failed to create wgpu device.
    #[error("failed to create graphics device: {0}")]
    DeviceCreationFailed(#[from] wgpu::RequestDeviceError),

    /// The graphics device was lost.
    #[error("graphics device lost")]
    DeviceLost,

    /// Texture creation failed.
    #[error("texture creation failed: {0}")]
    TextureCreationFailed(String),

    /// An eye target was used while not created.
    #[error("{} eye target is not created", .0.name())]
    TargetNotCreated(Eye),

    /// The mirror image has not been composited yet.
    #[error("mirror image not available")]
    MirrorUnavailable,

    /// Mapping a readback buffer failed.
    #[error("GPU buffer mapping failed")]
    BufferMapFailed,
}

/// A specialized Result type for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;
