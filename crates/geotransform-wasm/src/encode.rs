//! Image encoding WASM bindings.

use crate::to_js_error;
use crate::types::{format_from_str, JsDecodedImage};
use geotransform_core::{encode, ServiceError};
use wasm_bindgen::prelude::*;

/// Encode an image as JPEG (quality 95), PNG or BMP.
///
/// # Arguments
///
/// * `image` - The image to encode
/// * `format` - "jpeg"/"jpg", "png", "bmp", or a MIME type such as "image/png"
///
/// # Example (TypeScript)
///
/// ```typescript
/// const png = encode_image(image, 'png');
/// const blob = new Blob([png], { type: 'image/png' });
/// ```
#[wasm_bindgen]
pub fn encode_image(image: &JsDecodedImage, format: &str) -> Result<Vec<u8>, JsValue> {
    let Some(source_format) = format_from_str(format) else {
        return Err(to_js_error(ServiceError::UnsupportedFormat(format.to_string())));
    };

    let decoded = image
        .to_decoded()
        .map_err(|e| to_js_error(ServiceError::Decode(e)))?;
    encode::encode_image(&decoded, source_format).map_err(|e| to_js_error(ServiceError::Encode(e)))
}
