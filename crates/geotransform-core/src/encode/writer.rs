//! Encoding of RGB pixel buffers into JPEG, PNG or BMP bytes.
//!
//! Uses the `image` crate's encoders directly so the output buffer is built
//! in memory without touching the file system.

use image::codecs::bmp::BmpEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;
use thiserror::Error;

use crate::decode::{DecodedImage, SourceFormat};

/// JPEG quality used when re-encoding processed images.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder failed
    #[error("{format:?} encoding failed: {message}")]
    EncodingFailed {
        format: SourceFormat,
        message: String,
    },
}

/// Encode an image in the given format.
///
/// JPEG output uses [`DEFAULT_JPEG_QUALITY`].
///
/// # Errors
///
/// Returns an error if the image has zero dimensions, a buffer of the wrong
/// length, or the encoder itself fails.
pub fn encode_image(image: &DecodedImage, format: SourceFormat) -> Result<Vec<u8>, EncodeError> {
    match format {
        SourceFormat::Jpeg => {
            encode_jpeg(&image.pixels, image.width, image.height, DEFAULT_JPEG_QUALITY)
        }
        SourceFormat::Png | SourceFormat::Bmp => {
            validate(&image.pixels, image.width, image.height)?;

            let mut buffer = Cursor::new(Vec::new());
            let result = match format {
                SourceFormat::Png => PngEncoder::new(&mut buffer).write_image(
                    &image.pixels,
                    image.width,
                    image.height,
                    ExtendedColorType::Rgb8,
                ),
                _ => BmpEncoder::new(&mut buffer).write_image(
                    &image.pixels,
                    image.width,
                    image.height,
                    ExtendedColorType::Rgb8,
                ),
            };
            result.map_err(|e| EncodeError::EncodingFailed {
                format,
                message: e.to_string(),
            })?;

            Ok(buffer.into_inner())
        }
    }
}

/// Encode RGB pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality, clamped to 1-100
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    validate(pixels, width, height)?;

    let quality = quality.clamp(1, 100);
    let mut buffer = Cursor::new(Vec::new());

    JpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed {
            format: SourceFormat::Jpeg,
            message: e.to_string(),
        })?;

    Ok(buffer.into_inner())
}

fn validate(pixels: &[u8], width: u32, height: u32) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = width as usize * height as usize * 3;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }

    Ok(())
}
