//! Conversion between host tensors and encoded bitmaps.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbImage};

use crate::error::NodeError;
use crate::ports::EncodedImage;
use crate::tensor::{Frame, ImageTensor};

/// Convert one tensor frame to an RGB bitmap.
///
/// Values are clamped to `[0, 1]` and rounded to the nearest byte.
///
/// # Errors
///
/// Returns an error if the frame is too large for the bitmap dimensions.
pub fn frame_to_rgb(frame: Frame<'_>) -> Result<RgbImage, NodeError> {
    let width = u32::try_from(frame.width)
        .map_err(|_| NodeError::ImageConversion(format!("Frame width {} too large", frame.width)))?;
    let height = u32::try_from(frame.height)
        .map_err(|_| NodeError::ImageConversion(format!("Frame height {} too large", frame.height)))?;
    let bytes = frame.data.iter().map(|&v| unit_to_byte(v)).collect();
    RgbImage::from_raw(width, height, bytes)
        .ok_or_else(|| NodeError::ImageConversion("Frame data does not match its dimensions".into()))
}

/// Convert an RGB bitmap to a single-frame tensor.
///
/// # Errors
///
/// Returns an error if the bitmap is empty.
pub fn rgb_to_tensor(image: &RgbImage) -> Result<ImageTensor, NodeError> {
    let data = image.as_raw().iter().map(|&b| f32::from(b) / 255.0).collect();
    ImageTensor::new(1, image.height() as usize, image.width() as usize, data)
}

/// Encode a bitmap as PNG.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn encode_png(image: &RgbImage) -> Result<EncodedImage, NodeError> {
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| NodeError::ImageConversion(format!("Failed to encode PNG: {e}")))?;
    Ok(EncodedImage { data: buf.into_inner(), mime_type: "image/png".into() })
}

/// Decode encoded image bytes into a single-frame tensor, dropping alpha.
///
/// # Errors
///
/// Returns an error if the bytes are not a decodable image.
pub fn decode_to_tensor(data: &[u8]) -> Result<ImageTensor, NodeError> {
    let decoded = image::load_from_memory(data)
        .map_err(|e| NodeError::ImageConversion(format!("Failed to decode image: {e}")))?;
    rgb_to_tensor(&decoded.to_rgb8())
}

/// Convert every frame of a tensor to PNG, in batch order.
///
/// # Errors
///
/// Returns an error if any frame fails to convert.
pub fn tensor_to_png_frames(tensor: &ImageTensor) -> Result<Vec<EncodedImage>, NodeError> {
    tensor.frames().map(|frame| frame_to_rgb(frame).and_then(|rgb| encode_png(&rgb))).collect()
}

/// Convert the first frame of a tensor into a dynamic image for saving.
///
/// # Errors
///
/// Returns an error if the frame cannot be converted.
pub fn first_frame_image(tensor: &ImageTensor) -> Result<DynamicImage, NodeError> {
    let frame =
        tensor.frame(0).ok_or_else(|| NodeError::ImageConversion("Tensor has no frames".into()))?;
    Ok(DynamicImage::ImageRgb8(frame_to_rgb(frame)?))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn unit_to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
