//! Saving captured mirror images to disk or memory.

use std::path::Path;

use image::{ImageBuffer, Rgba};

use crate::engine::MirrorImage;

/// Saves a mirror image to a file; the format follows the extension
/// (`.png`, `.jpg`, `.jpeg`).
///
/// # Errors
/// Returns an error if the file cannot be written or format is unsupported.
pub fn save_image(path: impl AsRef<Path>, image: &MirrorImage) -> Result<(), ScreenshotError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let img = to_image_buffer(image)?;
    match extension.as_str() {
        "png" => img.save_with_format(path, image::ImageFormat::Png)?,
        "jpg" | "jpeg" => {
            // JPEG has no alpha channel
            let rgb = image::DynamicImage::ImageRgba8(img).to_rgb8();
            rgb.save_with_format(path, image::ImageFormat::Jpeg)?;
        }
        _ => return Err(ScreenshotError::UnsupportedFormat(extension)),
    }
    log::info!(
        "Saved {}x{} mirror image to {}",
        image.width,
        image.height,
        path.display()
    );
    Ok(())
}

/// Encodes a mirror image as PNG in memory.
pub fn save_to_buffer(image: &MirrorImage) -> Result<Vec<u8>, ScreenshotError> {
    let img = to_image_buffer(image)?;
    let mut buffer = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buffer, image::ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

fn to_image_buffer(image: &MirrorImage) -> Result<ImageBuffer<Rgba<u8>, Vec<u8>>, ScreenshotError> {
    // wgpu uses top-left origin, so no vertical flip needed
    ImageBuffer::from_raw(image.width, image.height, image.data.clone())
        .ok_or(ScreenshotError::InvalidImageData)
}

/// Error type for screenshot operations.
#[derive(Debug, thiserror::Error)]
pub enum ScreenshotError {
    #[error("Failed to save image: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid image data")]
    InvalidImageData,
}
