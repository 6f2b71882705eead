//! Image rotation onto an expanded canvas.
//!
//! Angles are in degrees, positive = clockwise, which is the direction the
//! EXIF orientation tag describes. The output canvas is the bounding box of
//! the rotated source, so no content is clipped.
//!
//! Multiples of 90° are exact pixel remaps. Any other angle uses inverse
//! mapping with bilinear sampling; for each output pixel:
//! ```text
//! src_x =  dx * cos(θ) + dy * sin(θ) + src_cx
//! src_y = -dx * sin(θ) + dy * cos(θ) + src_cy
//! ```
//! where (dx, dy) is the offset from the output center. Output pixels that
//! map outside the source stay zeroed.

use crate::decode::PixelBuffer;

const ANGLE_EPSILON: f64 = 0.001;

/// Compute the dimensions of the bounding box for a rotated image.
///
/// # Arguments
///
/// * `width` - Original image width
/// * `height` - Original image height
/// * `angle_degrees` - Rotation angle in degrees (sign does not matter)
///
/// # Returns
///
/// Tuple of (new_width, new_height), never smaller than 1x1.
///
/// # Example
///
/// ```ignore
/// use photocrop_core::transform::compute_rotated_bounds;
///
/// assert_eq!(compute_rotated_bounds(4000, 3000, 90.0), (3000, 4000));
/// assert_eq!(compute_rotated_bounds(4000, 3000, 180.0), (4000, 3000));
/// ```
pub fn compute_rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    if let Some(turns) = quarter_turns(angle_degrees) {
        return if turns % 2 == 1 {
            (height, width)
        } else {
            (width, height)
        };
    }

    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos().abs();
    let sin = angle_rad.sin().abs();

    let w = width as f64;
    let h = height as f64;

    // new_w = |w*cos| + |h*sin|
    // new_h = |w*sin| + |h*cos|
    let new_w = (w * cos + h * sin).round() as u32;
    let new_h = (w * sin + h * cos).round() as u32;

    (new_w.max(1), new_h.max(1))
}

/// Number of clockwise quarter turns (0..=3) if the angle is a multiple of 90°.
fn quarter_turns(angle_degrees: f64) -> Option<u32> {
    let normalized = angle_degrees.rem_euclid(360.0);
    let turns = (normalized / 90.0).round();
    if (normalized - turns * 90.0).abs() < ANGLE_EPSILON {
        Some(turns as u32 % 4)
    } else {
        None
    }
}

/// Rotate an image clockwise around its center.
///
/// Consumes the source buffer. A rotation that is a multiple of 360° hands
/// the same buffer back untouched.
///
/// # Example
///
/// ```ignore
/// use photocrop_core::transform::apply_rotation;
///
/// let upright = apply_rotation(image, 90.0);
/// ```
pub fn apply_rotation(image: PixelBuffer, angle_degrees: f64) -> PixelBuffer {
    match quarter_turns(angle_degrees) {
        Some(0) => image,
        Some(turns) => rotate_quarter_turns(&image, turns),
        None => rotate_bilinear(&image, angle_degrees),
    }
}

/// Exact clockwise rotation by `turns` × 90°.
fn rotate_quarter_turns(image: &PixelBuffer, turns: u32) -> PixelBuffer {
    let (w, h) = image.dimensions();
    let (dst_w, dst_h) = if turns % 2 == 1 { (h, w) } else { (w, h) };
    let bpp = image.format.bytes_per_pixel();
    let mut output = PixelBuffer::blank(dst_w, dst_h, image.format);

    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            let (src_x, src_y) = match turns {
                1 => (dst_y, h - 1 - dst_x),
                2 => (w - 1 - dst_x, h - 1 - dst_y),
                _ => (w - 1 - dst_y, dst_x),
            };
            let src_idx = image.offset(src_x, src_y);
            let dst_idx = output.offset(dst_x, dst_y);
            output.pixels[dst_idx..dst_idx + bpp]
                .copy_from_slice(&image.pixels[src_idx..src_idx + bpp]);
        }
    }

    output
}

fn rotate_bilinear(image: &PixelBuffer, angle_degrees: f64) -> PixelBuffer {
    let (dst_w, dst_h) = compute_rotated_bounds(image.width, image.height, angle_degrees);

    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos();
    let sin = angle_rad.sin();

    let src_cx = image.width as f64 / 2.0;
    let src_cy = image.height as f64 / 2.0;
    let dst_cx = dst_w as f64 / 2.0;
    let dst_cy = dst_h as f64 / 2.0;

    let bpp = image.format.bytes_per_pixel();
    let mut output = PixelBuffer::blank(dst_w, dst_h, image.format);
    let mut pixel = [0u8; 4];

    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            // Work on pixel centers so quarter turns of odd sizes stay aligned.
            let dx = dst_x as f64 + 0.5 - dst_cx;
            let dy = dst_y as f64 + 0.5 - dst_cy;

            let src_x = dx * cos + dy * sin + src_cx - 0.5;
            let src_y = -dx * sin + dy * cos + src_cy - 0.5;

            if sample_bilinear(image, src_x, src_y, &mut pixel[..bpp]) {
                let dst_idx = output.offset(dst_x, dst_y);
                output.pixels[dst_idx..dst_idx + bpp].copy_from_slice(&pixel[..bpp]);
            }
        }
    }

    output
}

/// Sample a pixel using bilinear interpolation, writing one value per channel.
///
/// Returns false when (x, y) falls outside the source, leaving `out` untouched.
fn sample_bilinear(image: &PixelBuffer, x: f64, y: f64, out: &mut [u8]) -> bool {
    let max_x = image.width as f64 - 1.0;
    let max_y = image.height as f64 - 1.0;

    if x < -0.5 || x > max_x + 0.5 || y < -0.5 || y > max_y + 0.5 {
        return false;
    }

    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);

    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(image.width - 1);
    let y1 = (y0 + 1).min(image.height - 1);

    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = image.offset(x0, y0);
    let p10 = image.offset(x1, y0);
    let p01 = image.offset(x0, y1);
    let p11 = image.offset(x1, y1);

    for (c, slot) in out.iter_mut().enumerate() {
        let v = image.pixels[p00 + c] as f64 * (1.0 - fx) * (1.0 - fy)
            + image.pixels[p10 + c] as f64 * fx * (1.0 - fy)
            + image.pixels[p01 + c] as f64 * (1.0 - fx) * fy
            + image.pixels[p11 + c] as f64 * fx * fy;
        *slot = v.clamp(0.0, 255.0).round() as u8;
    }

    true
}
