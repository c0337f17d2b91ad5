//! File naming and saving of generated tensors for the command-line host.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use image::{DynamicImage, ImageFormat, ImageReader};

use crate::convert::{first_frame_image, rgb_to_tensor};
use crate::error::NodeError;
use crate::params::format_extension;
use crate::tensor::ImageTensor;

/// Generate an output filename from a prompt and format.
///
/// Sanitizes the first 50 characters of the prompt to kebab-case,
/// appends a unix timestamp, and adds the appropriate file extension.
#[must_use]
pub fn auto_filename(prompt: &str, format: &str) -> String {
    let sanitized = sanitize_for_filename(prompt, 50);
    let timestamp = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
    let ext = format_extension(format);
    format!("{sanitized}-{timestamp}.{ext}")
}

/// Sanitize a string for use in a filename.
///
/// Converts to lowercase, replaces non-alphanumeric chars with hyphens,
/// collapses consecutive hyphens, and trims to max length.
#[must_use]
pub fn sanitize_for_filename(input: &str, max_len: usize) -> String {
    let mut result = String::with_capacity(max_len);
    let mut last_was_hyphen = true; // Prevents leading hyphen

    for ch in input.chars().take(max_len * 2) {
        if result.len() >= max_len {
            break;
        }
        if ch.is_ascii_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            result.push('-');
            last_was_hyphen = true;
        }
    }

    while result.ends_with('-') {
        result.pop();
    }

    if result.is_empty() {
        "image".to_string()
    } else {
        result
    }
}

/// Resolve the output path: use explicit path or auto-generate.
#[must_use]
pub fn resolve_output_path(explicit: Option<&str>, prompt: &str, format: &str) -> PathBuf {
    match explicit {
        Some(p) => PathBuf::from(p),
        None => PathBuf::from(auto_filename(prompt, format)),
    }
}

/// Save the first frame of a tensor in the requested format.
///
/// # Errors
///
/// Returns an error if the frame cannot be converted or the file cannot be written.
pub fn save_tensor(tensor: &ImageTensor, format: &str, output_path: &Path) -> Result<(), NodeError> {
    let image_format = match format {
        "jpeg" => ImageFormat::Jpeg,
        "png" => ImageFormat::Png,
        "webp" => ImageFormat::WebP,
        other => {
            return Err(NodeError::ImageConversion(format!("Unsupported format: {other}")));
        }
    };

    let image: DynamicImage = first_frame_image(tensor)?;
    image
        .save_with_format(output_path, image_format)
        .map_err(|e| NodeError::ImageConversion(format!("Failed to save as {format}: {e}")))
}

/// Load input image files into one tensor batch, in the given order.
///
/// # Errors
///
/// Returns an error if a file cannot be read or decoded, or the images differ in size.
pub fn load_image_batch(paths: &[String]) -> Result<Option<ImageTensor>, NodeError> {
    if paths.is_empty() {
        return Ok(None);
    }
    let mut frames = Vec::with_capacity(paths.len());
    for path in paths {
        let decoded = ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| NodeError::ImageConversion(format!("Failed to decode {path}: {e}")))?;
        frames.push(rgb_to_tensor(&decoded.to_rgb8())?);
    }
    ImageTensor::from_frames(frames).map(Some)
}
