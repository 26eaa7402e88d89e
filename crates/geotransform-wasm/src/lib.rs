//! Geotransform WASM - WebAssembly bindings for geotransform
//!
//! This crate exposes the geotransform-core dispatcher to the browser upload
//! form, so an image can be transformed client-side with the same rules the
//! file-backed service applies.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for image data
//! - `decode` - Image decoding bindings (format sniffing, RGB decode)
//! - `encode` - Image encoding bindings (JPEG, PNG, BMP)
//! - `transform` - The transformation entry points
//!
//! # Usage
//!
//! ```typescript
//! import init, { transform_image } from '@geotransform/wasm';
//!
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const params = JSON.stringify({ angle: 30 });
//! const output = transform_image(bytes, 'rotation', params);
//! const url = URL.createObjectURL(new Blob([output], { type: file.type }));
//! ```
//!
//! Failures are thrown as `{ error: string, status: number }` objects, the
//! same shape the file-backed service reports.

use geotransform_core::ServiceError;
use serde::Serialize;
use wasm_bindgen::prelude::*;

mod decode;
mod encode;
mod transform;
mod types;

pub use decode::{decode_image, detect_format};
pub use encode::encode_image;
pub use transform::{supported_transformations, transform_decoded, transform_image};
pub use types::JsDecodedImage;

/// Error object thrown to JavaScript.
#[derive(Debug, Serialize)]
struct JsErrorBody {
    error: String,
    status: u16,
}

impl From<&ServiceError> for JsErrorBody {
    fn from(err: &ServiceError) -> Self {
        Self {
            error: err.to_string(),
            status: err.status_code(),
        }
    }
}

/// Log a failure to the browser console and convert it for throwing.
pub(crate) fn to_js_error(err: ServiceError) -> JsValue {
    let body = JsErrorBody::from(&err);
    web_sys::console::warn_1(&JsValue::from_str(&body.error));
    serde_wasm_bindgen::to_value(&body).unwrap_or_else(|_| JsValue::from_str(&body.error))
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
