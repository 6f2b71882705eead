//! EXIF orientation lookup.
//!
//! Only the four pure rotations are honored. The mirrored orientations
//! (2, 4, 5, 7) and out-of-range values resolve to [`Orientation::Unknown`],
//! which applies no rotation.
//!
//! See: https://exiftool.org/TagNames/EXIF.html

use std::io::Cursor;

use exif::{In, Reader, Tag};
use serde::{Deserialize, Serialize};

/// Rotation implied by an EXIF orientation tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    /// Stored upright (EXIF value 1).
    #[default]
    Normal,
    /// Needs a 90° clockwise turn (EXIF value 6).
    Rotate90,
    /// Needs a half turn (EXIF value 3).
    Rotate180,
    /// Needs a 270° clockwise turn (EXIF value 8).
    Rotate270,
    /// Any other value, including mirrored orientations.
    Unknown,
}

/// EXIF orientation value → orientation.
const ORIENTATION_TABLE: [(u32, Orientation); 4] = [
    (1, Orientation::Normal),
    (3, Orientation::Rotate180),
    (6, Orientation::Rotate90),
    (8, Orientation::Rotate270),
];

impl Orientation {
    /// Look up the numeric EXIF orientation value.
    pub fn from_exif_value(value: u32) -> Self {
        ORIENTATION_TABLE
            .iter()
            .find(|(tag, _)| *tag == value)
            .map(|(_, orientation)| *orientation)
            .unwrap_or(Orientation::Unknown)
    }

    /// Clockwise rotation in degrees that makes the image upright.
    pub fn degrees(self) -> u32 {
        match self {
            Orientation::Normal | Orientation::Unknown => 0,
            Orientation::Rotate90 => 90,
            Orientation::Rotate180 => 180,
            Orientation::Rotate270 => 270,
        }
    }

    /// Returns true if correcting this orientation swaps width and height.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Orientation::Rotate90 | Orientation::Rotate270)
    }

    pub fn needs_rotation(self) -> bool {
        self.degrees() != 0
    }
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        Orientation::from_exif_value(value)
    }
}

/// Read the raw EXIF orientation value from encoded image bytes.
///
/// Returns `None` when the container has no EXIF block, the block cannot be
/// parsed, or it carries no orientation tag.
pub fn read_exif_orientation(bytes: &[u8]) -> Option<u32> {
    let mut cursor = Cursor::new(bytes);
    let exif = Reader::new().read_from_container(&mut cursor).ok()?;
    let field = exif.get_field(Tag::Orientation, In::PRIMARY)?;
    field.value.get_uint(0)
}

/// Resolve the orientation of encoded image bytes.
///
/// `None` means no usable orientation metadata was found. Callers that only
/// care about the angle should use [`rotation_degrees`], which treats a
/// missing tag the same as [`Orientation::Normal`].
pub fn get_orientation(bytes: &[u8]) -> Option<Orientation> {
    read_exif_orientation(bytes).map(Orientation::from_exif_value)
}

/// Clockwise rotation in degrees needed to display the image upright.
pub fn rotation_degrees(bytes: &[u8]) -> u32 {
    get_orientation(bytes).map_or(0, Orientation::degrees)
}
