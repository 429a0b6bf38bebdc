use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::RgbImage;
use tracing::debug;

use crate::error::DecodeError;

pub const DEFAULT_MAX_BYTES: usize = 10 * 1024 * 1024;

/// Decodes base64 text (optionally a `data:` URL) into a 3-channel image.
pub fn decode_base64_image(input: &str, max_bytes: usize) -> Result<RgbImage, DecodeError> {
    let payload = normalize_base64(input);
    if payload.is_empty() {
        return Err(DecodeError::Empty);
    }
    let bytes = BASE64.decode(payload.as_bytes())?;
    decode_image_bytes(&bytes, max_bytes)
}

/// Decodes raw encoded image bytes (PNG, JPEG, ...). Alpha is dropped.
pub fn decode_image_bytes(bytes: &[u8], max_bytes: usize) -> Result<RgbImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }
    if bytes.len() > max_bytes {
        return Err(DecodeError::TooLarge {
            size: bytes.len(),
            limit: max_bytes,
        });
    }
    let image = image::load_from_memory(bytes)?;
    let rgb = image.to_rgb8();
    debug!(
        width = rgb.width(),
        height = rgb.height(),
        bytes = bytes.len(),
        "decoded image"
    );
    Ok(rgb)
}

fn normalize_base64(input: &str) -> String {
    let trimmed = input.trim();
    let body = match trimmed.strip_prefix("data:") {
        Some(rest) => match rest.split_once(',') {
            Some((header, data)) if header.ends_with(";base64") => data,
            _ => trimmed,
        },
        None => trimmed,
    };
    body.chars().filter(|ch| !ch.is_whitespace()).collect()
}
