//! Decoding of uploaded image bytes, with EXIF orientation handling for JPEG.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::DynamicImage;

use super::{DecodeError, DecodedImage, Orientation, SourceFormat};

/// Sniff the raster format of `bytes` from its magic number.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the bytes are not one of the
/// supported formats.
pub fn detect_format(bytes: &[u8]) -> Result<SourceFormat, DecodeError> {
    let format = image::guess_format(bytes).map_err(|_| DecodeError::InvalidFormat)?;
    SourceFormat::from_image_format(format).ok_or(DecodeError::InvalidFormat)
}

/// Decode an uploaded image into RGB pixels.
///
/// The format is sniffed from the content, not from any file name. JPEG
/// images have their EXIF orientation applied so that the pixels are upright.
/// Alpha channels are dropped.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the format is not recognized.
/// Returns `DecodeError::CorruptedFile` if the data is truncated or damaged.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let format = detect_format(bytes)?;

    let img = image::load_from_memory_with_format(bytes, format.to_image_format())
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let img = match format {
        SourceFormat::Jpeg => apply_orientation(img, extract_orientation(bytes)),
        SourceFormat::Png | SourceFormat::Bmp => img,
    };

    let decoded = DecodedImage::from_rgb_image(img.into_rgb8());
    if decoded.is_empty() {
        return Err(DecodeError::CorruptedFile("image has no pixels".to_string()));
    }
    Ok(decoded)
}

/// Extract EXIF orientation from image bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

/// Apply EXIF orientation transformation to an image.
fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

/// Extract EXIF orientation value from image bytes (for external use).
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    extract_orientation(bytes)
}
