//! Reading and decoding encoded images.

use std::io::{Cursor, Read};

use image::ImageReader;

use super::{DecodeError, PixelBuffer};

/// Drain a readable stream into memory.
///
/// The bytes are read once and shared by the orientation resolver and the
/// decoder, so the stream does not need to be seekable.
///
/// # Errors
///
/// Returns `DecodeError::IoError` if reading fails and
/// `DecodeError::EmptyInput` if the stream yields no bytes.
pub fn read_input<R: Read>(mut reader: R) -> Result<Vec<u8>, DecodeError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    if bytes.is_empty() {
        return Err(DecodeError::EmptyInput);
    }
    Ok(bytes)
}

/// Decode an image from bytes without applying EXIF orientation.
///
/// The container format is sniffed from the leading bytes. The pixels come
/// back as stored in the file; rotation is a separate pipeline stage.
///
/// # Errors
///
/// Returns `DecodeError::EmptyInput` for an empty slice,
/// `DecodeError::InvalidFormat` if the format cannot be recognized, and
/// `DecodeError::CorruptedFile` if the codec fails part way through.
pub fn decode_image(bytes: &[u8]) -> Result<PixelBuffer, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::EmptyInput);
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    Ok(PixelBuffer::from_dynamic(img))
}
