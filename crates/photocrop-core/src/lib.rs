//! photocrop core - upload image normalization
//!
//! This crate takes an uploaded photo, turns it upright according to its
//! EXIF orientation, scales it down by an integer ratio, center-crops it to
//! the exact target size and writes it out in the format named by the
//! destination's extension.
//!
//! # Example
//!
//! ```ignore
//! use std::fs::File;
//!
//! let upload = File::open("org-windows.jpg")?;
//! if photocrop_core::compress_and_save(upload, "123-final.jpg", 4) {
//!     println!("compressed");
//! }
//! ```

pub mod decode;
pub mod encode;
pub mod pipeline;
pub mod transform;

#[cfg(test)]
mod test_helpers;

pub use decode::{FilterType, Orientation, PixelBuffer, PixelFormat};
pub use pipeline::{
    compress_and_save, compress_and_save_with, process_bytes, try_compress_and_save,
    CompressOptions, CompressReport, PipelineError, SavedImage, TargetBasis, TargetBox,
};
pub use transform::{apply_crop, apply_rotation, center_crop, resize_to_cover, CropRect};
