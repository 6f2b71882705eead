//! Output format selection and writing to disk.

use std::io::Cursor;
use std::path::Path;

use image::ImageFormat;

use super::{encode_jpeg, validate, EncodeError};
use crate::decode::PixelBuffer;

/// Pick the output codec from the destination's file extension.
///
/// # Errors
///
/// Returns `EncodeError::MissingExtension` if the path has no extension and
/// `EncodeError::UnsupportedFormat` if the extension is unknown or the codec
/// cannot write it.
pub fn output_format(path: &Path) -> Result<ImageFormat, EncodeError> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| EncodeError::MissingExtension(path.to_path_buf()))?;

    match ImageFormat::from_extension(ext) {
        Some(format) if format.writing_enabled() => Ok(format),
        _ => Err(EncodeError::UnsupportedFormat(ext.to_string())),
    }
}

/// Encode a pixel buffer in the given format.
///
/// `quality` only applies to JPEG.
pub fn encode_to_vec(
    image: PixelBuffer,
    format: ImageFormat,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    if format == ImageFormat::Jpeg {
        return encode_jpeg(&image, quality);
    }

    validate(&image)?;
    let dynamic = image
        .into_dynamic()
        .ok_or_else(|| EncodeError::EncodingFailed("pixel buffer rejected by codec".to_string()))?;

    let mut buffer = Cursor::new(Vec::new());
    dynamic
        .write_to(&mut buffer, format)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Encode a pixel buffer and write it to `path`, format chosen by extension.
///
/// The image is encoded fully in memory before the file is created, so a
/// codec failure never leaves a truncated file behind.
///
/// # Returns
///
/// The format that was written and the number of bytes.
pub fn write_to_path(
    image: PixelBuffer,
    path: &Path,
    quality: u8,
) -> Result<(ImageFormat, usize), EncodeError> {
    let format = output_format(path)?;
    let bytes = encode_to_vec(image, format, quality)?;
    std::fs::write(path, &bytes)?;
    Ok((format, bytes.len()))
}
