//! Pixel-exact cropping.
//!
//! Crop rectangles are in pixels with a signed origin so that a box computed
//! for a buffer smaller than the target is representable, and then rejected.

use serde::{Deserialize, Serialize};

use super::TransformError;
use crate::decode::PixelBuffer;

/// A crop region in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    /// Left edge.
    pub x: i64,
    /// Top edge.
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    pub fn new(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True if the rectangle lies entirely inside a `width` x `height` buffer.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x + self.width as i64 <= width as i64
            && self.y + self.height as i64 <= height as i64
    }
}

/// Compute the centered crop of a cover-resized buffer.
///
/// If the buffer width already equals the target width the crop trims rows
/// around the vertical center; otherwise, if the heights match, it trims
/// columns around the horizontal center. Returns `None` when neither axis
/// matches.
///
/// # Example
///
/// ```ignore
/// use photocrop_core::transform::{center_crop_rect, CropRect};
///
/// let rect = center_crop_rect(1000, 1333, 1000, 750).unwrap();
/// assert_eq!(rect, CropRect::new(0, 291, 1000, 750));
/// ```
pub fn center_crop_rect(
    buffer_w: u32,
    buffer_h: u32,
    target_w: u32,
    target_h: u32,
) -> Option<CropRect> {
    if buffer_w == target_w {
        let y = (buffer_h / 2) as i64 - (target_h / 2) as i64;
        Some(CropRect::new(0, y, target_w, target_h))
    } else if buffer_h == target_h {
        let x = (buffer_w / 2) as i64 - (target_w / 2) as i64;
        Some(CropRect::new(x, 0, target_w, target_h))
    } else {
        None
    }
}

/// Copy a rectangular region out of an image.
///
/// Consumes the source buffer. A rectangle covering the whole image returns
/// the buffer unchanged.
///
/// # Errors
///
/// Returns `TransformError::InvalidDimensions` for an empty rectangle and
/// `TransformError::OutOfBounds` if the rectangle is not fully contained in
/// the image.
pub fn apply_crop(image: PixelBuffer, rect: CropRect) -> Result<PixelBuffer, TransformError> {
    if rect.width == 0 || rect.height == 0 {
        return Err(TransformError::InvalidDimensions {
            width: rect.width,
            height: rect.height,
        });
    }

    if !rect.fits_within(image.width, image.height) {
        return Err(TransformError::OutOfBounds {
            rect,
            width: image.width,
            height: image.height,
        });
    }

    if rect.x == 0 && rect.y == 0 && image.dimensions() == (rect.width, rect.height) {
        return Ok(image);
    }

    let bpp = image.format.bytes_per_pixel();
    let row_len = rect.width as usize * bpp;
    let mut output = Vec::with_capacity(row_len * rect.height as usize);

    // Both offsets were bounds-checked above.
    let (left, top) = (rect.x as u32, rect.y as u32);
    for y in 0..rect.height {
        let start = image.offset(left, top + y);
        output.extend_from_slice(&image.pixels[start..start + row_len]);
    }

    Ok(PixelBuffer::new(rect.width, rect.height, image.format, output))
}

/// Crop a cover-resized image to exactly `target_w` x `target_h`, centered.
///
/// # Errors
///
/// Returns `TransformError::NoMatchingAxis` if neither buffer dimension
/// equals its target, plus any error from [`apply_crop`].
pub fn center_crop(
    image: PixelBuffer,
    target_w: u32,
    target_h: u32,
) -> Result<PixelBuffer, TransformError> {
    let rect = center_crop_rect(image.width, image.height, target_w, target_h).ok_or(
        TransformError::NoMatchingAxis {
            width: image.width,
            height: image.height,
            target_w,
            target_h,
        },
    )?;
    apply_crop(image, rect)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
