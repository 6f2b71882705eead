//! Image encoding for photocrop.
//!
//! This module provides functionality for:
//! - Choosing the output codec from the destination file extension
//! - Encoding JPEG with configurable quality
//! - Encoding PNG, WebP and GIF through the `image` crate
//! - Writing the result to disk
//!
//! # Examples
//!
//! ```ignore
//! use photocrop_core::encode::write_to_path;
//!
//! let (format, bytes) = write_to_path(image, Path::new("out/final.jpg"), 90)?;
//! println!("Wrote {bytes} bytes as {format:?}");
//! ```

mod file;
mod jpeg;

use std::path::PathBuf;

use thiserror::Error;

use crate::decode::PixelBuffer;

pub use file::{encode_to_vec, output_format, write_to_path};
pub use jpeg::encode_jpeg;

/// Errors that can occur during encoding or writing.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Destination path has no file extension to pick a codec from
    #[error("Destination has no file extension: {0}")]
    MissingExtension(PathBuf),

    /// Extension is unknown or its codec cannot encode
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// Codec failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    /// Writing the output file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Check dimensions and buffer length before handing pixels to a codec.
fn validate(image: &PixelBuffer) -> Result<(), EncodeError> {
    if image.width == 0 || image.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: image.width,
            height: image.height,
        });
    }

    let expected = image.width as usize * image.height as usize * image.format.bytes_per_pixel();
    if image.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: image.pixels.len(),
        });
    }

    Ok(())
}
