//! Image decoding for photocrop.
//!
//! This module provides functionality for:
//! - Draining an upload stream into memory
//! - Decoding JPEG/PNG/WebP/GIF bytes into a [`PixelBuffer`]
//! - Resolving the EXIF orientation tag to a clockwise rotation
//!
//! Decoding never applies orientation itself. The pipeline reads the tag
//! from the same bytes and rotates the buffer as a separate stage.
//!
//! # Examples
//!
//! ```ignore
//! use photocrop_core::decode::{decode_image, rotation_degrees};
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! println!("{}x{}, needs {}° turn", image.width, image.height, rotation_degrees(&bytes));
//! ```

mod orientation;
mod reader;
mod types;

pub use orientation::{get_orientation, read_exif_orientation, rotation_degrees, Orientation};
pub use reader::{decode_image, read_input};
pub use types::{DecodeError, FilterType, PixelBuffer, PixelFormat};
