//! Image decoding WASM bindings.
//!
//! # Functions
//!
//! - [`decode_image`] - Decode a JPEG, PNG or BMP image from bytes
//! - [`detect_format`] - Sniff the format name from the file content
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, detect_format } from '@geotransform/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! if (detect_format(bytes) !== undefined) {
//!   const image = decode_image(bytes);
//!   console.log(`Decoded ${image.width}x${image.height}`);
//! }
//! ```

use crate::to_js_error;
use crate::types::JsDecodedImage;
use geotransform_core::{decode, ServiceError};
use wasm_bindgen::prelude::*;

/// Decode an image from bytes.
///
/// JPEG images have their EXIF orientation applied. Alpha is dropped.
///
/// # Errors
///
/// Throws if the bytes are not a supported format or are corrupted.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsDecodedImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| to_js_error(ServiceError::Decode(e)))
}

/// Format name ("jpeg", "png", "bmp") sniffed from the bytes, or `undefined`.
#[wasm_bindgen]
pub fn detect_format(bytes: &[u8]) -> Option<String> {
    decode::detect_format(bytes)
        .ok()
        .map(|format| format.as_str().to_string())
}
