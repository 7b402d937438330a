/// Screenshot post-processing
///
/// Turns downloaded image bytes into a buffer the display layer can blit:
/// 1. Decode (PNG, JPEG, WebP, ... guessed from the content)
/// 2. Crop away the bottom 20% (upstream screenshots bake a decorative
///    border into it)
/// 3. Convert to tightly packed RGBA8

use image::DynamicImage;
use tokio::task;

use crate::error::PreviewError;
use crate::state::data::PixelBuffer;

/// Fraction of the original height that survives the crop
pub const KEEP_HEIGHT_RATIO: f64 = 0.8;

/// Decode image bytes, inferring the format from the content
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, PreviewError> {
    let img = image::load_from_memory(bytes)?;
    tracing::debug!(width = img.width(), height = img.height(), "decoded screenshot");
    Ok(img)
}

/// Keep the rectangle `(0, 0, width, floor(height * 0.8))`
///
/// Returns a new image; the input is left untouched.
pub fn crop_bottom(img: &DynamicImage) -> DynamicImage {
    let width = img.width();
    let kept_height = (f64::from(img.height()) * KEEP_HEIGHT_RATIO).floor() as u32;
    img.crop_imm(0, 0, width, kept_height)
}

/// Convert to row-major RGBA8, synthesizing opaque alpha when the source has none
pub fn to_pixel_buffer(img: &DynamicImage) -> PixelBuffer {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    PixelBuffer {
        width,
        height,
        stride: width as usize * 4,
        pixels: rgba.into_raw(),
    }
}

/// Decode, crop and convert in one go
pub fn process_screenshot(bytes: &[u8]) -> Result<PixelBuffer, PreviewError> {
    let img = decode(bytes)?;
    let cropped = crop_bottom(&img);
    let buffer = to_pixel_buffer(&cropped);

    tracing::debug!(
        "cropped screenshot {}x{} -> {}x{}",
        img.width(),
        img.height(),
        buffer.width,
        buffer.height
    );
    Ok(buffer)
}

/// Run `process_screenshot` on the blocking pool
pub async fn process_screenshot_async(bytes: Vec<u8>) -> Result<PixelBuffer, PreviewError> {
    // Decoding is CPU-bound, keep it off the async workers
    task::spawn_blocking(move || process_screenshot(&bytes)).await?
}
