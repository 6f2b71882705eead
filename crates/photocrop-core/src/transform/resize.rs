//! Proportional resizing that covers a target box.
//!
//! The larger of the two per-axis scale factors is applied to both axes, so
//! the result matches one target dimension exactly and meets or exceeds the
//! other. A center crop can then always cut the exact box out of it.

use super::TransformError;
use crate::decode::{FilterType, PixelBuffer};

/// Calculate the size of a proportional resize that covers `target_w` x `target_h`.
///
/// The axis whose scale factor wins is set to its target exactly. The other
/// axis is scaled with the same factor, truncated, and never allowed below
/// its own target.
///
/// # Example
///
/// ```ignore
/// use photocrop_core::transform::compute_cover_size;
///
/// // Portrait source into a landscape box: width matches, height overflows.
/// assert_eq!(compute_cover_size(3000, 4000, 1000, 750), (1000, 1333));
/// ```
pub fn compute_cover_size(src_w: u32, src_h: u32, target_w: u32, target_h: u32) -> (u32, u32) {
    if src_w == 0 || src_h == 0 {
        return (target_w, target_h);
    }

    let sx = target_w as f64 / src_w as f64;
    let sy = target_h as f64 / src_h as f64;

    if sx >= sy {
        let h = (sx * src_h as f64).floor() as u32;
        (target_w, h.max(target_h))
    } else {
        let w = (sy * src_w as f64).floor() as u32;
        (w.max(target_w), target_h)
    }
}

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns `TransformError::InvalidDimensions` if either target dimension is
/// zero or the source is empty, and `TransformError::BufferMismatch` if the
/// pixel data does not match the declared size.
pub fn resize_exact(
    image: PixelBuffer,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<PixelBuffer, TransformError> {
    if width == 0 || height == 0 || image.is_empty() {
        return Err(TransformError::InvalidDimensions { width, height });
    }

    if image.dimensions() == (width, height) {
        return Ok(image);
    }

    let dynamic = image.into_dynamic().ok_or(TransformError::BufferMismatch)?;
    let resized = dynamic.resize_exact(width, height, filter.to_image_filter());

    Ok(PixelBuffer::from_dynamic(resized))
}

/// Scale an image uniformly so it covers the target box.
///
/// Consumes the source buffer. See [`compute_cover_size`] for the sizing rule.
///
/// # Errors
///
/// Same as [`resize_exact`].
pub fn resize_to_cover(
    image: PixelBuffer,
    target_w: u32,
    target_h: u32,
    filter: FilterType,
) -> Result<PixelBuffer, TransformError> {
    if target_w == 0 || target_h == 0 {
        return Err(TransformError::InvalidDimensions {
            width: target_w,
            height: target_h,
        });
    }

    let (width, height) = compute_cover_size(image.width, image.height, target_w, target_h);
    resize_exact(image, width, height, filter)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
