//! Shared fixtures for unit tests.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat};

use crate::decode::{PixelBuffer, PixelFormat};

/// RGB gradient where every pixel encodes its own position.
pub fn gradient(width: u32, height: u32) -> PixelBuffer {
    let mut pixels = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            pixels.push((x % 256) as u8);
            pixels.push((y % 256) as u8);
            pixels.push(((x + y) % 256) as u8);
        }
    }
    PixelBuffer::new(width, height, PixelFormat::Rgb8, pixels)
}

/// Encode a gradient as a baseline JPEG.
pub fn encode_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = gradient(width, height);
    let mut out = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut out, 90)
        .write_image(&img.pixels, width, height, ExtendedColorType::Rgb8)
        .unwrap();
    out.into_inner()
}

/// Encode a half-transparent RGBA PNG.
pub fn encode_test_png_rgba(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 128]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];
const APP1_MARKER: [u8; 2] = [0xFF, 0xE1];
const EXIF_HEADER: &[u8; 6] = b"Exif\0\0";
/// Little-endian TIFF header with IFD0 at offset 8.
const TIFF_HEADER_LE: [u8; 8] = [0x49, 0x49, 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00];
const TAG_ORIENTATION: u16 = 0x0112;
const TYPE_SHORT: u16 = 3;

/// Splice an EXIF APP1 segment carrying only an orientation tag right after
/// the JPEG SOI marker.
pub fn with_exif_orientation(jpeg: &[u8], orientation: u16) -> Vec<u8> {
    assert_eq!(&jpeg[..2], &JPEG_SOI[..], "not a JPEG");

    let mut payload = EXIF_HEADER.to_vec();
    payload.extend_from_slice(&TIFF_HEADER_LE);
    payload.extend_from_slice(&1u16.to_le_bytes());
    payload.extend_from_slice(&TAG_ORIENTATION.to_le_bytes());
    payload.extend_from_slice(&TYPE_SHORT.to_le_bytes());
    payload.extend_from_slice(&1u32.to_le_bytes());
    // SHORT value, left-aligned in the 4-byte slot.
    payload.extend_from_slice(&orientation.to_le_bytes());
    payload.extend_from_slice(&[0x00, 0x00]);
    // No next IFD.
    payload.extend_from_slice(&0u32.to_le_bytes());

    let segment_len = (payload.len() + 2) as u16;
    let mut out = Vec::with_capacity(jpeg.len() + payload.len() + 4);
    out.extend_from_slice(&JPEG_SOI);
    out.extend_from_slice(&APP1_MARKER);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(&payload);
    out.extend_from_slice(&jpeg[2..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{get_orientation, Orientation};

    #[test]
    fn test_exif_fixture_is_readable() {
        let jpeg = with_exif_orientation(&encode_test_jpeg(4, 2), 6);
        assert_eq!(get_orientation(&jpeg), Some(Orientation::Rotate90));
    }

    #[test]
    fn test_plain_fixture_has_no_exif() {
        assert_eq!(get_orientation(&encode_test_jpeg(4, 2)), None);
    }
}
