//! JPEG encoding.
//!
//! Uses the `image` crate's baseline JPEG encoder. JPEG has no alpha
//! channel, so RGBA buffers are flattened to RGB by dropping alpha.

use std::borrow::Cow;
use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::{validate, EncodeError};
use crate::decode::PixelBuffer;

/// Encode a pixel buffer to JPEG bytes.
///
/// # Arguments
///
/// * `image` - Buffer to encode; RGBA input loses its alpha channel
/// * `quality` - JPEG quality (1-100, where 100 is highest quality)
///
/// # Quality Guidelines
///
/// * 90-100: High quality, suitable for archival or further editing
/// * 75-90: Good quality, recommended for uploads
/// * Below 60: Low quality, visible artifacts
///
/// # Example
///
/// ```ignore
/// use photocrop_core::decode::{PixelBuffer, PixelFormat};
/// use photocrop_core::encode::encode_jpeg;
///
/// let image = PixelBuffer::blank(100, 100, PixelFormat::Rgb8);
/// let jpeg = encode_jpeg(&image, 90).unwrap();
///
/// // Verify JPEG magic bytes
/// assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
/// ```
pub fn encode_jpeg(image: &PixelBuffer, quality: u8) -> Result<Vec<u8>, EncodeError> {
    validate(image)?;

    // Clamp quality to valid range (1-100)
    let quality = quality.clamp(1, 100);

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);

    let rgb = if image.format.has_alpha() {
        Cow::Owned(strip_alpha(&image.pixels))
    } else {
        Cow::Borrowed(image.pixels.as_slice())
    };
    encoder
        .write_image(&rgb, image.width, image.height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Drop the alpha byte of every RGBA pixel.
fn strip_alpha(rgba: &[u8]) -> Vec<u8> {
    rgba.chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect()
}


// ============================================================================
// Property-Based Tests
// ============================================================================
