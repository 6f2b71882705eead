//! Geometric transforms: rotation, proportional resize and center crop.
//!
//! # Transform Order
//!
//! The upload pipeline applies these in a fixed order:
//! 1. Rotation (EXIF orientation correction)
//! 2. Resize to cover the target box
//! 3. Center crop to the exact target box
//!
//! Every transform takes its input [`PixelBuffer`](crate::decode::PixelBuffer)
//! by value and returns a new one.
//!
//! # Coordinate System
//!
//! - Rotation angles are in degrees, positive = clockwise
//! - Crop rectangles are in pixels
//! - Origin is top-left corner

mod crop;
mod resize;
mod rotation;

use thiserror::Error;

pub use crop::{apply_crop, center_crop, center_crop_rect, CropRect};
pub use resize::{compute_cover_size, resize_exact, resize_to_cover};
pub use rotation::{apply_rotation, compute_rotated_bounds};

/// Errors that can occur while transforming a pixel buffer.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A requested output dimension is zero, or the source is empty.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Crop rectangle is not fully contained in the image.
    #[error("Crop rectangle {rect:?} is outside the {width}x{height} image")]
    OutOfBounds {
        rect: CropRect,
        width: u32,
        height: u32,
    },

    /// Neither image dimension equals the requested crop dimension.
    #[error("Cannot center-crop {width}x{height} to {target_w}x{target_h}: no axis matches")]
    NoMatchingAxis {
        width: u32,
        height: u32,
        target_w: u32,
        target_h: u32,
    },

    /// Pixel data length doesn't match the declared dimensions.
    #[error("Pixel buffer length does not match its dimensions")]
    BufferMismatch,
}
