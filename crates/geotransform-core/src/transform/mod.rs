//! Geometric transformations and the dispatcher that selects between them.
//!
//! A request names one of five kinds and carries untyped [`Params`]. The
//! request is first decoded into a [`Transform`], whose variants each hold a
//! validated parameter record, and only then applied to the image. Unknown
//! kinds and bad parameters are therefore rejected before any pixel work.
//!
//! | kind      | parameters (default)              | output size                 | fill  |
//! |-----------|-----------------------------------|-----------------------------|-------|
//! | scale     | `scale_factor` (1.0)              | `max(1, round(side * f))`   | n/a   |
//! | rotate    | `angle` degrees (0)               | unchanged                   | black |
//! | translate | `offset_x`, `offset_y` (0)        | grows by `abs(offset)`      | white |
//! | shear     | `shear_x`, `shear_y` (0)          | unchanged                   | black |
//! | reflect   | `axis` = x / y / xy ("x")         | unchanged                   | n/a   |
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner, y points down
//! - Rotation angles are in degrees, positive = counter-clockwise
//! - Rotation is about `(width / 2, height / 2)`

mod affine;
mod reflect;
mod rotation;
mod scale;
mod shear;
mod translate;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::decode::DecodedImage;
use crate::params::Params;

pub use affine::{warp_affine, AffineMatrix};
pub use reflect::{flip_horizontal, flip_vertical, ReflectAxis, ReflectParams};
pub use rotation::{RotateParams, ROTATION_FILL};
pub use scale::{resize, scaled_dimensions, ScaleParams};
pub use shear::{ShearParams, SHEAR_FILL};
pub use translate::{TranslateParams, TRANSLATION_FILL};

/// Largest output canvas a single request may allocate (100 megapixels).
pub const MAX_OUTPUT_PIXELS: u64 = 100_000_000;

/// Errors raised while decoding or applying a transformation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// The transformation name is not one of the supported kinds.
    #[error("Invalid transformation type: {0:?}")]
    InvalidKind(String),

    /// A parameter is malformed or out of range.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The input image buffer is unusable.
    #[error("Invalid image: {0}")]
    InvalidImage(String),
}

impl TransformError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        TransformError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// The closed set of supported transformation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformKind {
    Scale,
    Rotate,
    Translate,
    Shear,
    Reflect,
}

impl TransformKind {
    pub const ALL: [TransformKind; 5] = [
        TransformKind::Scale,
        TransformKind::Rotate,
        TransformKind::Translate,
        TransformKind::Shear,
        TransformKind::Reflect,
    ];

    /// Canonical request name.
    pub fn as_str(self) -> &'static str {
        match self {
            TransformKind::Scale => "scale",
            TransformKind::Rotate => "rotate",
            TransformKind::Translate => "translate",
            TransformKind::Shear => "shear",
            TransformKind::Reflect => "reflect",
        }
    }
}

impl FromStr for TransformKind {
    type Err = TransformError;

    /// Accepts the canonical names and the noun forms the upload form sends
    /// (`scaling`, `rotation`, `translation`, `shearing`, `reflection`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scale" | "scaling" => Ok(TransformKind::Scale),
            "rotate" | "rotation" => Ok(TransformKind::Rotate),
            "translate" | "translation" => Ok(TransformKind::Translate),
            "shear" | "shearing" => Ok(TransformKind::Shear),
            "reflect" | "reflection" => Ok(TransformKind::Reflect),
            other => Err(TransformError::InvalidKind(other.to_string())),
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully validated transformation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    Scale(ScaleParams),
    Rotate(RotateParams),
    Translate(TranslateParams),
    Shear(ShearParams),
    Reflect(ReflectParams),
}

impl Transform {
    /// Decode a request: resolve the kind name, then read its parameters.
    ///
    /// An unknown kind fails with `InvalidKind` no matter what `params` holds.
    pub fn from_request(kind: &str, params: &Params) -> Result<Self, TransformError> {
        let kind: TransformKind = kind.parse()?;
        Self::from_params(kind, params)
    }

    /// Read and validate the parameters relevant to `kind`; others are ignored.
    pub fn from_params(kind: TransformKind, params: &Params) -> Result<Self, TransformError> {
        Ok(match kind {
            TransformKind::Scale => Transform::Scale(ScaleParams::from_params(params)?),
            TransformKind::Rotate => Transform::Rotate(RotateParams::from_params(params)?),
            TransformKind::Translate => Transform::Translate(TranslateParams::from_params(params)?),
            TransformKind::Shear => Transform::Shear(ShearParams::from_params(params)?),
            TransformKind::Reflect => Transform::Reflect(ReflectParams::from_params(params)?),
        })
    }

    pub fn kind(&self) -> TransformKind {
        match self {
            Transform::Scale(_) => TransformKind::Scale,
            Transform::Rotate(_) => TransformKind::Rotate,
            Transform::Translate(_) => TransformKind::Translate,
            Transform::Shear(_) => TransformKind::Shear,
            Transform::Reflect(_) => TransformKind::Reflect,
        }
    }

    /// Apply to `image`, producing a new buffer. The input is never modified.
    pub fn apply(&self, image: &DecodedImage) -> Result<DecodedImage, TransformError> {
        validate_image(image)?;

        match self {
            Transform::Scale(p) => p.apply(image),
            Transform::Rotate(p) => p.apply(image),
            Transform::Translate(p) => p.apply(image),
            Transform::Shear(p) => p.apply(image),
            Transform::Reflect(p) => p.apply(image),
        }
    }
}

/// Decode `kind`/`params` and apply the result to `image`.
///
/// This is the single entry point used by the file and WASM front ends.
#[tracing::instrument(skip(image, params), fields(width = image.width, height = image.height))]
pub fn apply_transform(
    image: &DecodedImage,
    kind: &str,
    params: &Params,
) -> Result<DecodedImage, TransformError> {
    let transform = Transform::from_request(kind, params)?;
    tracing::debug!(?transform, "Dispatching transformation");

    let output = transform.apply(image)?;
    tracing::debug!(
        "Produced {}x{} image from {}x{}",
        output.width,
        output.height,
        image.width,
        image.height
    );
    Ok(output)
}

fn validate_image(image: &DecodedImage) -> Result<(), TransformError> {
    if image.width == 0 || image.height == 0 {
        return Err(TransformError::InvalidImage(format!(
            "dimensions must be non-zero, got {}x{}",
            image.width, image.height
        )));
    }

    let expected = image.width as usize * image.height as usize * 3;
    if image.pixels.len() != expected {
        return Err(TransformError::InvalidImage(format!(
            "expected {} bytes of RGB data, got {}",
            expected,
            image.pixels.len()
        )));
    }

    Ok(())
}

/// Reject canvases that do not fit in `u32` or exceed [`MAX_OUTPUT_PIXELS`].
pub(crate) fn check_canvas(
    name: &str,
    width: u64,
    height: u64,
) -> Result<(u32, u32), TransformError> {
    let too_large = || {
        TransformError::invalid(
            name,
            format!(
                "output canvas {}x{} exceeds the {} pixel limit",
                width, height, MAX_OUTPUT_PIXELS
            ),
        )
    };

    let pixels = width.checked_mul(height).ok_or_else(too_large)?;
    if pixels > MAX_OUTPUT_PIXELS {
        return Err(too_large());
    }

    let width = u32::try_from(width).map_err(|_| too_large())?;
    let height = u32::try_from(height).map_err(|_| too_large())?;
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn test_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push((x * 2 % 256) as u8);
                pixels.push((y * 4 % 256) as u8);
                pixels.push(((x ^ y) % 256) as u8);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    #[test]
    fn test_kind_aliases() {
        assert_eq!("scale".parse::<TransformKind>().unwrap(), TransformKind::Scale);
        assert_eq!("scaling".parse::<TransformKind>().unwrap(), TransformKind::Scale);
        assert_eq!("rotation".parse::<TransformKind>().unwrap(), TransformKind::Rotate);
        assert_eq!(
            "translation".parse::<TransformKind>().unwrap(),
            TransformKind::Translate
        );
        assert_eq!("shearing".parse::<TransformKind>().unwrap(), TransformKind::Shear);
        assert_eq!("reflection".parse::<TransformKind>().unwrap(), TransformKind::Reflect);
    }

    #[test]
    fn test_kind_names_round_trip() {
        for kind in TransformKind::ALL {
            assert_eq!(kind.as_str().parse::<TransformKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_kind_ignores_params() {
        let img = test_image(4, 4);
        let bad_params = Params::new().with("scale_factor", -1).with("axis", "z");

        for params in [Params::new(), bad_params] {
            let result = apply_transform(&img, "unknown_transform", &params);
            assert_eq!(
                result,
                Err(TransformError::InvalidKind("unknown_transform".to_string()))
            );
        }
    }

    #[test]
    fn test_kind_is_case_sensitive() {
        assert!(matches!(
            "Scale".parse::<TransformKind>(),
            Err(TransformError::InvalidKind(_))
        ));
        assert!("none".parse::<TransformKind>().is_err());
    }

    #[test]
    fn test_from_request_builds_typed_variant() {
        let params = Params::new().with("angle", 30).with("scale_factor", 9);
        let transform = Transform::from_request("rotate", &params).unwrap();
        assert_eq!(transform, Transform::Rotate(RotateParams::new(30.0)));
        assert_eq!(transform.kind(), TransformKind::Rotate);
    }

    #[test]
    fn test_scale_dispatch() {
        let img = test_image(100, 50);
        let params = Params::new().with("scale_factor", 0.5);
        let out = apply_transform(&img, "scale", &params).unwrap();
        assert_eq!((out.width, out.height), (50, 25));
    }

    #[test]
    fn test_scale_non_positive_is_invalid_parameter() {
        let img = test_image(10, 10);
        for factor in [0.0, -2.0] {
            let params = Params::new().with("scale_factor", factor);
            assert!(matches!(
                apply_transform(&img, "scale", &params),
                Err(TransformError::InvalidParameter { .. })
            ));
        }
    }

    #[test]
    fn test_rotate_zero_dispatch_is_identity() {
        let img = test_image(31, 17);
        let out = apply_transform(&img, "rotate", &Params::new()).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn test_translate_dispatch() {
        let img = test_image(100, 50);
        let params = Params::new().with("offset_x", 10).with("offset_y", 0);
        let out = apply_transform(&img, "translate", &params).unwrap();

        assert_eq!((out.width, out.height), (110, 50));
        for y in 0..50 {
            for x in 0..10 {
                assert_eq!(out.pixel(x, y), [255, 255, 255]);
            }
        }
    }

    #[test]
    fn test_shear_zero_dispatch_is_identity() {
        let img = test_image(12, 9);
        let params = Params::new().with("shear_x", 0).with("shear_y", 0);
        assert_eq!(apply_transform(&img, "shear", &params).unwrap(), img);
    }

    #[test]
    fn test_reflect_dispatch() {
        let img = test_image(6, 4);
        let once = apply_transform(&img, "reflect", &Params::new()).unwrap();
        assert_ne!(once, img);
        let twice = apply_transform(&once, "reflect", &Params::new()).unwrap();
        assert_eq!(twice, img);

        let params = Params::new().with("axis", "z");
        assert!(matches!(
            apply_transform(&img, "reflect", &params),
            Err(TransformError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_non_numeric_parameter() {
        let img = test_image(4, 4);
        let params = Params::new().with("angle", Value::Bool(true));
        assert!(matches!(
            apply_transform(&img, "rotate", &params),
            Err(TransformError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_malformed_image_rejected() {
        let img = DecodedImage {
            width: 4,
            height: 4,
            pixels: vec![0; 10],
        };
        assert!(matches!(
            apply_transform(&img, "reflect", &Params::new()),
            Err(TransformError::InvalidImage(_))
        ));

        let empty = DecodedImage {
            width: 0,
            height: 4,
            pixels: vec![],
        };
        assert!(matches!(
            Transform::Rotate(RotateParams::new(10.0)).apply(&empty),
            Err(TransformError::InvalidImage(_))
        ));
    }

    #[test]
    fn test_input_is_not_modified() {
        let img = test_image(8, 8);
        let copy = img.clone();
        let _ = apply_transform(&img, "rotate", &Params::new().with("angle", 33)).unwrap();
        assert_eq!(img, copy);
    }

    #[test]
    fn test_check_canvas_limits() {
        assert_eq!(check_canvas("x", 10, 20).unwrap(), (10, 20));
        assert!(check_canvas("x", MAX_OUTPUT_PIXELS + 1, 1).is_err());
        assert!(check_canvas("x", u64::MAX, 2).is_err());
        assert!(check_canvas("x", u32::MAX as u64 + 1, 0).is_err());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            TransformError::InvalidKind("spin".to_string()).to_string(),
            "Invalid transformation type: \"spin\""
        );
    }
}
