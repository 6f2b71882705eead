//! The upload pipeline: decode, orient, resize, crop, write.
//!
//! [`compress_and_save`] is the boolean entry point for callers that only
//! care whether a file was produced. [`try_compress_and_save`] runs the same
//! steps and returns the typed error or a [`SavedImage`] report, and
//! [`process_bytes`] stops before encoding.
//!
//! Each stage takes ownership of the previous stage's buffer, so at most two
//! buffers are alive at any point.

use std::io::Read;
use std::path::{Path, PathBuf};

use image::ImageFormat;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::decode::{self, DecodeError, FilterType, Orientation};
use crate::encode::{self, EncodeError};
use crate::transform::{self, TransformError};
use crate::PixelBuffer;

/// Default JPEG quality for written uploads.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Errors that can stop the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Compression ratio must be at least 1.
    #[error("Invalid compression ratio {0}: must be at least 1")]
    InvalidRatio(u32),

    /// Destination path is empty or names a directory.
    #[error("Invalid destination: {0:?}")]
    InvalidDestination(PathBuf),

    /// The ratio shrinks the image to nothing.
    #[error("Ratio {ratio} reduces {width}x{height} to an empty image")]
    EmptyTargetBox { width: u32, height: u32, ratio: u32 },

    /// Covering the target box would enlarge the upload.
    #[error("Covering the target needs a {width}x{height} buffer, more than the {max_pixels} source pixels")]
    CoverTooLarge {
        width: u32,
        height: u32,
        max_pixels: u64,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Which dimensions the compression ratio divides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetBasis {
    /// Dimensions as stored in the file, before orientation correction.
    #[default]
    Source,
    /// Dimensions after orientation correction, so portrait photos stay portrait.
    Oriented,
}

/// Settings for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressOptions {
    /// Resampling filter for the proportional resize.
    pub filter: FilterType,
    /// JPEG quality (1-100); ignored for other formats.
    pub jpeg_quality: u8,
    /// Which dimensions the ratio is applied to.
    pub target_basis: TargetBasis,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            filter: FilterType::Bicubic,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            target_basis: TargetBasis::Source,
        }
    }
}

impl CompressOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    /// Set JPEG quality, clamped to 1-100.
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    pub fn with_target_basis(mut self, basis: TargetBasis) -> Self {
        self.target_basis = basis;
        self
    }
}

/// Exact output size requested for an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetBox {
    pub width: u32,
    pub height: u32,
}

impl TargetBox {
    /// Divide both dimensions by `ratio`, rounding down.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::InvalidRatio` for a ratio of 0 and
    /// `PipelineError::EmptyTargetBox` if either result would be 0.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use photocrop_core::TargetBox;
    ///
    /// let target = TargetBox::from_source(4000, 3000, 4).unwrap();
    /// assert_eq!((target.width, target.height), (1000, 750));
    /// ```
    pub fn from_source(width: u32, height: u32, ratio: u32) -> Result<Self, PipelineError> {
        if ratio == 0 {
            return Err(PipelineError::InvalidRatio(ratio));
        }

        let target = Self {
            width: width / ratio,
            height: height / ratio,
        };
        if target.width == 0 || target.height == 0 {
            return Err(PipelineError::EmptyTargetBox {
                width,
                height,
                ratio,
            });
        }

        Ok(target)
    }
}

/// What the pipeline did to an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressReport {
    /// Decoded size, as stored.
    pub source: (u32, u32),
    /// Orientation tag, `None` when the file carries none.
    pub orientation: Option<Orientation>,
    /// Clockwise rotation applied, in degrees.
    pub rotation_degrees: u32,
    /// Size after rotation.
    pub oriented: (u32, u32),
    /// Size after the proportional resize.
    pub resized: (u32, u32),
    /// Final size.
    pub target: TargetBox,
}

/// Result of a successful [`try_compress_and_save`].
#[derive(Debug, Clone)]
pub struct SavedImage {
    pub report: CompressReport,
    /// Codec picked from the destination extension.
    pub format: ImageFormat,
    pub bytes_written: usize,
}

/// Run decode, orientation, resize and crop on encoded image bytes.
///
/// # Errors
///
/// Fails on a zero ratio, undecodable bytes, a ratio that leaves nothing,
/// a cover resize that would hold more pixels than the oriented upload, or a
/// transform error.
pub fn process_bytes(
    bytes: &[u8],
    ratio: u32,
    options: &CompressOptions,
) -> Result<(PixelBuffer, CompressReport), PipelineError> {
    if ratio == 0 {
        return Err(PipelineError::InvalidRatio(ratio));
    }

    let image = decode::decode_image(bytes)?;
    let source = image.dimensions();

    let orientation = decode::get_orientation(bytes);
    let rotation_degrees = orientation.map_or(0, Orientation::degrees);
    debug!(
        width = source.0,
        height = source.1,
        ?orientation,
        rotation_degrees,
        "decoded upload"
    );

    let target = match options.target_basis {
        TargetBasis::Source => TargetBox::from_source(source.0, source.1, ratio)?,
        TargetBasis::Oriented => {
            let (w, h) = if orientation.is_some_and(Orientation::swaps_dimensions) {
                (source.1, source.0)
            } else {
                source
            };
            TargetBox::from_source(w, h, ratio)?
        }
    };

    let image = if orientation.is_some_and(Orientation::needs_rotation) {
        transform::apply_rotation(image, rotation_degrees as f64)
    } else {
        image
    };
    let oriented = image.dimensions();

    // A landscape box over a portrait upload scales it up; cap the
    // intermediate at the upload's own pixel count.
    let (cover_w, cover_h) =
        transform::compute_cover_size(oriented.0, oriented.1, target.width, target.height);
    let max_pixels = image.pixel_count();
    if cover_w as u64 * cover_h as u64 > max_pixels {
        return Err(PipelineError::CoverTooLarge {
            width: cover_w,
            height: cover_h,
            max_pixels,
        });
    }

    let image = transform::resize_to_cover(image, target.width, target.height, options.filter)?;
    let resized = image.dimensions();
    debug!(
        oriented = ?oriented,
        resized = ?resized,
        target_w = target.width,
        target_h = target.height,
        "resized upload"
    );

    let image = transform::center_crop(image, target.width, target.height)?;

    let report = CompressReport {
        source,
        orientation,
        rotation_degrees,
        oriented,
        resized,
        target,
    };
    Ok((image, report))
}

/// Read an upload, fit it to `1/ratio` of its size and write it to `dest`.
///
/// The output codec follows the extension of `dest`. The destination is
/// checked before the stream is read. The caller owns the stream; it is read
/// to the end but not closed.
pub fn try_compress_and_save<R: Read>(
    reader: R,
    dest: &Path,
    ratio: u32,
    options: &CompressOptions,
) -> Result<SavedImage, PipelineError> {
    if ratio == 0 {
        return Err(PipelineError::InvalidRatio(ratio));
    }
    if dest.as_os_str().is_empty() || dest.file_name().is_none() {
        return Err(PipelineError::InvalidDestination(dest.to_path_buf()));
    }
    encode::output_format(dest)?;

    let bytes = decode::read_input(reader)?;
    let (image, report) = process_bytes(&bytes, ratio, options)?;
    drop(bytes);

    let (format, bytes_written) = encode::write_to_path(image, dest, options.jpeg_quality)?;

    Ok(SavedImage {
        report,
        format,
        bytes_written,
    })
}

/// [`compress_and_save_with`] using [`CompressOptions::default`].
pub fn compress_and_save<R: Read>(reader: R, dest: impl AsRef<Path>, ratio: u32) -> bool {
    compress_and_save_with(reader, dest, ratio, &CompressOptions::default())
}

/// Boolean wrapper around [`try_compress_and_save`].
///
/// Returns `true` once the file is written. Any failure is logged at error
/// level and reported as `false`.
pub fn compress_and_save_with<R: Read>(
    reader: R,
    dest: impl AsRef<Path>,
    ratio: u32,
    options: &CompressOptions,
) -> bool {
    let dest = dest.as_ref();
    match try_compress_and_save(reader, dest, ratio, options) {
        Ok(saved) => {
            info!(
                dest = %dest.display(),
                width = saved.report.target.width,
                height = saved.report.target.height,
                format = ?saved.format,
                bytes = saved.bytes_written,
                "saved compressed upload"
            );
            true
        }
        Err(e) => {
            error!(dest = %dest.display(), ratio, error = %e, "failed to compress upload");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{encode_test_jpeg, with_exif_orientation};

    #[test]
    fn test_target_box_divides_and_floors() {
        let target = TargetBox::from_source(4000, 3000, 4).unwrap();
        assert_eq!(target, TargetBox { width: 1000, height: 750 });

        let target = TargetBox::from_source(1001, 999, 2).unwrap();
        assert_eq!(target, TargetBox { width: 500, height: 499 });
    }

    #[test]
    fn test_target_box_ratio_one_is_identity() {
        let target = TargetBox::from_source(640, 480, 1).unwrap();
        assert_eq!(target, TargetBox { width: 640, height: 480 });
    }

    #[test]
    fn test_target_box_zero_ratio() {
        let result = TargetBox::from_source(640, 480, 0);
        assert!(matches!(result, Err(PipelineError::InvalidRatio(0))));
    }

    #[test]
    fn test_target_box_empty() {
        let result = TargetBox::from_source(3, 100, 4);
        assert!(matches!(
            result,
            Err(PipelineError::EmptyTargetBox { ratio: 4, .. })
        ));
    }

    #[test]
    fn test_options_builder() {
        let options = CompressOptions::new()
            .with_filter(FilterType::Lanczos3)
            .with_jpeg_quality(0)
            .with_target_basis(TargetBasis::Oriented);

        assert_eq!(options.filter, FilterType::Lanczos3);
        assert_eq!(options.jpeg_quality, 1);
        assert_eq!(options.target_basis, TargetBasis::Oriented);
    }

    #[test]
    fn test_options_default() {
        let options = CompressOptions::default();
        assert_eq!(options.filter, FilterType::Bicubic);
        assert_eq!(options.jpeg_quality, DEFAULT_JPEG_QUALITY);
        assert_eq!(options.target_basis, TargetBasis::Source);
    }

    #[test]
    fn test_process_without_exif() {
        let jpeg = encode_test_jpeg(80, 60);
        let (image, report) = process_bytes(&jpeg, 4, &CompressOptions::default()).unwrap();

        assert_eq!(image.dimensions(), (20, 15));
        assert_eq!(report.orientation, None);
        assert_eq!(report.rotation_degrees, 0);
        assert_eq!(report.oriented, (80, 60));
        assert_eq!(report.resized, (20, 15));
    }

    #[test]
    fn test_process_rotated_source_basis() {
        let jpeg = with_exif_orientation(&encode_test_jpeg(80, 60), 6);
        let (image, report) = process_bytes(&jpeg, 4, &CompressOptions::default()).unwrap();

        assert_eq!(report.orientation, Some(Orientation::Rotate90));
        assert_eq!(report.rotation_degrees, 90);
        assert_eq!(report.oriented, (60, 80));
        // 20/60 beats 15/80, so width fits and height overflows.
        assert_eq!(report.resized, (20, 26));
        assert_eq!(image.dimensions(), (20, 15));
    }

    #[test]
    fn test_process_rotated_oriented_basis() {
        let jpeg = with_exif_orientation(&encode_test_jpeg(80, 60), 8);
        let options = CompressOptions::default().with_target_basis(TargetBasis::Oriented);
        let (image, report) = process_bytes(&jpeg, 4, &options).unwrap();

        assert_eq!(report.rotation_degrees, 270);
        assert_eq!(report.resized, (15, 20));
        assert_eq!(image.dimensions(), (15, 20));
    }

    #[test]
    fn test_process_explicit_normal_orientation() {
        let jpeg = with_exif_orientation(&encode_test_jpeg(40, 20), 1);
        let (image, report) = process_bytes(&jpeg, 2, &CompressOptions::default()).unwrap();

        assert_eq!(report.orientation, Some(Orientation::Normal));
        assert_eq!(report.rotation_degrees, 0);
        assert_eq!(image.dimensions(), (20, 10));
    }

    #[test]
    fn test_process_mirrored_orientation_is_not_rotated() {
        let jpeg = with_exif_orientation(&encode_test_jpeg(40, 20), 2);
        let (_, report) = process_bytes(&jpeg, 2, &CompressOptions::default()).unwrap();

        assert_eq!(report.orientation, Some(Orientation::Unknown));
        assert_eq!(report.rotation_degrees, 0);
        assert_eq!(report.oriented, (40, 20));
    }

    #[test]
    fn test_process_rejects_cover_larger_than_upload() {
        // Wide strip turned upright: covering 800x40 would need 800x16000.
        let jpeg = with_exif_orientation(&encode_test_jpeg(800, 40), 6);
        let result = process_bytes(&jpeg, 1, &CompressOptions::default());

        assert!(matches!(
            result,
            Err(PipelineError::CoverTooLarge {
                width: 800,
                height: 16000,
                max_pixels: 32000,
            })
        ));
    }

    #[test]
    fn test_process_wide_strip_oriented_basis() {
        let jpeg = with_exif_orientation(&encode_test_jpeg(800, 40), 6);
        let options = CompressOptions::default().with_target_basis(TargetBasis::Oriented);
        let (image, report) = process_bytes(&jpeg, 2, &options).unwrap();

        assert_eq!(report.oriented, (40, 800));
        assert_eq!(image.dimensions(), (20, 400));
        assert!(report.resized.0 as u64 * report.resized.1 as u64 <= 800 * 40);
    }

    #[test]
    fn test_process_zero_ratio() {
        let jpeg = encode_test_jpeg(8, 8);
        let result = process_bytes(&jpeg, 0, &CompressOptions::default());
        assert!(matches!(result, Err(PipelineError::InvalidRatio(0))));
    }

    #[test]
    fn test_process_garbage() {
        let result = process_bytes(b"not an image", 2, &CompressOptions::default());
        assert!(matches!(result, Err(PipelineError::Decode(_))));
    }

    #[test]
    fn test_try_compress_rejects_empty_destination() {
        let jpeg = encode_test_jpeg(8, 8);
        let result =
            try_compress_and_save(&jpeg[..], Path::new(""), 2, &CompressOptions::default());
        assert!(matches!(result, Err(PipelineError::InvalidDestination(_))));
    }

    #[test]
    fn test_try_compress_rejects_unknown_extension_before_reading() {
        struct Unreadable;
        impl Read for Unreadable {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                panic!("stream should not be read");
            }
        }

        let result = try_compress_and_save(
            Unreadable,
            Path::new("out.xyz"),
            2,
            &CompressOptions::default(),
        );
        assert!(matches!(
            result,
            Err(PipelineError::Encode(EncodeError::UnsupportedFormat(_)))
        ));
    }

    #[test]
    fn test_compress_and_save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.jpg");
        let jpeg = encode_test_jpeg(64, 48);

        assert!(compress_and_save(&jpeg[..], &dest, 2));

        let written = image::open(&dest).unwrap();
        assert_eq!((written.width(), written.height()), (32, 24));
    }

    #[test]
    fn test_compress_and_save_false_on_zero_ratio() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.jpg");
        let jpeg = encode_test_jpeg(64, 48);

        assert!(!compress_and_save(&jpeg[..], &dest, 0));
        assert!(!dest.exists());
    }

    #[test]
    fn test_compress_and_save_false_when_cover_too_large() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("strip.jpg");
        let jpeg = with_exif_orientation(&encode_test_jpeg(800, 40), 8);

        assert!(!compress_and_save(&jpeg[..], &dest, 1));
        assert!(!dest.exists());
    }

    #[test]
    fn test_compress_and_save_false_on_empty_stream() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.png");

        assert!(!compress_and_save(std::io::empty(), &dest, 2));
        assert!(!dest.exists());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
