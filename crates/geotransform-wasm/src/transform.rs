//! WASM bindings for the transformation dispatcher.
//!
//! Two entry points mirror the two ways the front end holds an image:
//! - [`transform_image`] takes the uploaded file bytes and returns encoded
//!   bytes in the same format, parameters as a JSON string
//! - [`transform_decoded`] works on an already decoded [`JsDecodedImage`],
//!   parameters as a plain JS object

use crate::to_js_error;
use crate::types::JsDecodedImage;
use geotransform_core::service::transform_encoded;
use geotransform_core::transform::TransformKind;
use geotransform_core::{apply_transform, DecodedImage, Params, ServiceError};
use wasm_bindgen::prelude::*;

/// Transform encoded image bytes.
///
/// # Arguments
///
/// * `bytes` - The uploaded file (JPEG, PNG or BMP)
/// * `transformation` - e.g. "scale" or "scaling", "rotate" or "rotation"
/// * `params_json` - JSON object such as `{"scale_factor": 1.5}`
///
/// # Returns
///
/// The transformed image, encoded in the same format as the input.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const params = JSON.stringify({ offset_x: 10, offset_y: 0 });
/// const output = transform_image(bytes, 'translation', params);
/// ```
#[wasm_bindgen]
pub fn transform_image(
    bytes: &[u8],
    transformation: &str,
    params_json: &str,
) -> Result<Vec<u8>, JsValue> {
    run_transform_image(bytes, transformation, params_json).map_err(to_js_error)
}

/// Transform a decoded image.
///
/// `params` may be `undefined`/`null`, in which case every parameter takes
/// its default.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const rotated = transform_decoded(image, 'rotate', { angle: 90 });
/// ```
#[wasm_bindgen]
pub fn transform_decoded(
    image: &JsDecodedImage,
    transformation: &str,
    params: Option<js_sys::Object>,
) -> Result<JsDecodedImage, JsValue> {
    let params = match params {
        Some(object) => serde_wasm_bindgen::from_value::<Params>(JsValue::from(object))
            .map_err(|e| {
                to_js_error(ServiceError::InvalidParams(
                    geotransform_core::ParamsFormatError(e.to_string()),
                ))
            })?,
        None => Params::new(),
    };

    let source = image
        .to_decoded()
        .map_err(|e| to_js_error(ServiceError::Decode(e)))?;
    run_transform_decoded(&source, transformation, &params)
        .map(JsDecodedImage::from_decoded)
        .map_err(to_js_error)
}

/// Canonical names of the supported transformations.
#[wasm_bindgen]
pub fn supported_transformations() -> Vec<String> {
    TransformKind::ALL
        .iter()
        .map(|kind| kind.as_str().to_string())
        .collect()
}

fn run_transform_image(
    bytes: &[u8],
    transformation: &str,
    params_json: &str,
) -> Result<Vec<u8>, ServiceError> {
    let params = Params::from_json(params_json)?;
    let (output, _format) = transform_encoded(bytes, transformation, &params)?;
    Ok(output)
}

fn run_transform_decoded(
    image: &DecodedImage,
    transformation: &str,
    params: &Params,
) -> Result<DecodedImage, ServiceError> {
    Ok(apply_transform(image, transformation, params)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geotransform_core::{decode_image, encode_image, SourceFormat, TransformError};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = DecodedImage::filled(width, height, [30, 60, 90]);
        encode_image(&img, SourceFormat::Png).unwrap()
    }

    #[test]
    fn test_supported_transformations() {
        assert_eq!(
            supported_transformations(),
            vec!["scale", "rotate", "translate", "shear", "reflect"]
        );
    }

    #[test]
    fn test_transform_image_scale() {
        let output = run_transform_image(&png(40, 30), "scaling", r#"{"scale_factor": 2}"#)
            .unwrap();
        let decoded = decode_image(&output).unwrap();
        assert_eq!((decoded.width, decoded.height), (80, 60));
    }

    #[test]
    fn test_transform_image_translate_canvas() {
        let output = run_transform_image(
            &png(100, 50),
            "translation",
            r#"{"offset_x": 10, "offset_y": 0}"#,
        )
        .unwrap();
        let decoded = decode_image(&output).unwrap();
        assert_eq!((decoded.width, decoded.height), (110, 50));
        assert_eq!(decoded.pixel(5, 25), [255, 255, 255]);
        assert_eq!(decoded.pixel(50, 25), [30, 60, 90]);
    }

    #[test]
    fn test_transform_image_invalid_json() {
        let err = run_transform_image(&png(2, 2), "rotate", "not json").unwrap_err();
        assert!(matches!(err, ServiceError::InvalidParams(_)));
    }

    #[test]
    fn test_transform_image_invalid_kind() {
        let err = run_transform_image(&png(2, 2), "unknown_transform", "{}").unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Transform(TransformError::InvalidKind(_))
        ));
    }

    #[test]
    fn test_transform_decoded_reflect_round_trip() {
        let mut img = DecodedImage::filled(3, 2, [0, 0, 0]);
        img.pixels[0] = 255;
        let params = Params::new().with("axis", "xy");

        let once = run_transform_decoded(&img, "reflect", &params).unwrap();
        assert_eq!(once.pixel(2, 1), [255, 0, 0]);

        let twice = run_transform_decoded(&once, "reflect", &params).unwrap();
        assert_eq!(twice, img);
    }
}

/// WASM-specific tests that require JsValue.
///
/// Run with `wasm-pack test`.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn image(width: u32, height: u32) -> JsDecodedImage {
        JsDecodedImage::new(width, height, vec![100u8; (width * height * 3) as usize])
    }

    #[wasm_bindgen_test]
    fn test_transform_decoded_with_object_params() {
        let params = js_sys::Object::new();
        js_sys::Reflect::set(&params, &"scale_factor".into(), &JsValue::from_f64(0.5)).unwrap();

        let result = transform_decoded(&image(10, 8), "scale", Some(params)).unwrap();
        assert_eq!(result.width(), 5);
        assert_eq!(result.height(), 4);
    }

    #[wasm_bindgen_test]
    fn test_transform_decoded_without_params() {
        let result = transform_decoded(&image(6, 6), "rotate", None).unwrap();
        assert_eq!(result.pixels(), vec![100u8; 6 * 6 * 3]);
    }

    #[wasm_bindgen_test]
    fn test_transform_decoded_bad_axis() {
        let params = js_sys::Object::new();
        js_sys::Reflect::set(&params, &"axis".into(), &"z".into()).unwrap();
        assert!(transform_decoded(&image(2, 2), "reflect", Some(params)).is_err());
    }

    #[wasm_bindgen_test]
    fn test_transform_image_invalid_bytes() {
        assert!(transform_image(&[1, 2, 3], "rotate", "{}").is_err());
    }
}
