//! WASM-compatible wrapper types for image data.
//!
//! Handles the conversion between the core `DecodedImage` and a type that
//! JavaScript can hold on to between calls.

use geotransform_core::decode::{DecodeError, DecodedImage, SourceFormat};
use wasm_bindgen::prelude::*;

/// A decoded RGB image held in WASM memory.
///
/// Calling `pixels()` copies the buffer into a JavaScript `Uint8Array`; keep
/// the image on the WASM side while chaining calls to avoid that copy.
#[wasm_bindgen]
pub struct JsDecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsDecodedImage {
    /// Create a new JsDecodedImage from dimensions and pixel data.
    ///
    /// # Arguments
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsDecodedImage {
        JsDecodedImage {
            width,
            height,
            pixels,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes in the pixel buffer (width * height * 3)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGB pixel data as Uint8Array (a copy).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }
}

impl JsDecodedImage {
    pub(crate) fn from_decoded(img: DecodedImage) -> Self {
        Self {
            width: img.width,
            height: img.height,
            pixels: img.pixels,
        }
    }

    /// Convert back to a core DecodedImage. Clones the pixel data.
    ///
    /// The buffer comes from JavaScript, so its length is checked against the
    /// dimensions here rather than trusted.
    pub(crate) fn to_decoded(&self) -> Result<DecodedImage, DecodeError> {
        DecodedImage::try_new(self.width, self.height, self.pixels.clone())
    }
}

/// Parse a format name coming from JavaScript ("jpeg", "jpg", "png", "bmp").
///
/// Also accepts MIME types such as `image/png`, as found on `File.type`.
pub(crate) fn format_from_str(value: &str) -> Option<SourceFormat> {
    let value = value.trim();
    let name = value.strip_prefix("image/").unwrap_or(value);
    SourceFormat::from_extension(name)
}
