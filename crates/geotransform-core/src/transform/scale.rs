//! Uniform scaling with bilinear resampling.

use crate::decode::{DecodedImage, FilterType};
use crate::params::Params;

use super::{check_canvas, TransformError};

/// Parameters for `scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleParams {
    /// Multiplier applied to both dimensions. Must be > 0.
    pub scale_factor: f64,
}

impl Default for ScaleParams {
    fn default() -> Self {
        Self { scale_factor: 1.0 }
    }
}

impl ScaleParams {
    pub fn new(scale_factor: f64) -> Result<Self, TransformError> {
        if scale_factor.is_nan() || scale_factor <= 0.0 {
            return Err(TransformError::invalid(
                "scale_factor",
                "Scale factor must be greater than 0",
            ));
        }
        Ok(Self { scale_factor })
    }

    pub fn from_params(params: &Params) -> Result<Self, TransformError> {
        Self::new(params.get_f64("scale_factor", 1.0)?)
    }

    pub fn apply(&self, image: &DecodedImage) -> Result<DecodedImage, TransformError> {
        let (width, height) = scaled_dimensions(image.width, image.height, self.scale_factor);
        let (width, height) = check_canvas("scale_factor", width, height)?;

        tracing::debug!(
            "Scaling {}x{} -> {}x{} (factor {})",
            image.width,
            image.height,
            width,
            height,
            self.scale_factor
        );

        resize(image, width, height, FilterType::Bilinear)
    }
}

/// Output dimensions for a scale factor: `max(1, round(side * factor))`.
pub fn scaled_dimensions(width: u32, height: u32, factor: f64) -> (u64, u64) {
    let scale = |side: u32| ((side as f64 * factor).round() as u64).max(1);
    (scale(width), scale(height))
}

/// Resize an image to exact dimensions.
///
/// Uses the `image` crate's resampling. The input is never modified.
pub fn resize(
    image: &DecodedImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<DecodedImage, TransformError> {
    // Fast path: if dimensions match, just clone
    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let src = image::ImageBuffer::<image::Rgb<u8>, &[u8]>::from_raw(
        image.width,
        image.height,
        image.pixels.as_slice(),
    )
    .ok_or_else(|| TransformError::InvalidImage("pixel buffer too short".to_string()))?;

    let resized = image::imageops::resize(&src, width, height, filter.to_image_filter());
    Ok(DecodedImage::from_rgb_image(resized))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((x + y) % 256) as u8;
                pixels.extend_from_slice(&[v, v, v]);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    #[test]
    fn test_scale_doubles() {
        let img = create_test_image(100, 50);
        let out = ScaleParams::new(2.0).unwrap().apply(&img).unwrap();
        assert_eq!((out.width, out.height), (200, 100));
        assert_eq!(out.pixels.len(), 200 * 100 * 3);
    }

    #[test]
    fn test_scale_rounds_dimensions() {
        // 33 * 0.5 = 16.5 rounds to 17
        assert_eq!(scaled_dimensions(33, 10, 0.5), (17, 5));
        assert_eq!(scaled_dimensions(10, 10, 0.34), (3, 3));
    }

    #[test]
    fn test_scale_never_below_one_pixel() {
        assert_eq!(scaled_dimensions(100, 50, 0.0001), (1, 1));

        let img = create_test_image(10, 10);
        let out = ScaleParams::new(0.001).unwrap().apply(&img).unwrap();
        assert_eq!((out.width, out.height), (1, 1));
    }

    #[test]
    fn test_scale_factor_one_is_copy() {
        let img = create_test_image(20, 10);
        let out = ScaleParams::default().apply(&img).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn test_rejects_non_positive_factor() {
        for factor in [0.0, -1.0, -0.5, f64::NAN] {
            assert!(
                matches!(
                    ScaleParams::new(factor),
                    Err(TransformError::InvalidParameter { .. })
                ),
                "factor {} should be rejected",
                factor
            );
        }
    }

    #[test]
    fn test_from_params_default() {
        let params = ScaleParams::from_params(&Params::new()).unwrap();
        assert_eq!(params.scale_factor, 1.0);
    }

    #[test]
    fn test_from_params_string_factor() {
        let params = ScaleParams::from_params(&Params::new().with("scale_factor", "0.5")).unwrap();
        assert_eq!(params.scale_factor, 0.5);
    }

    #[test]
    fn test_huge_factor_rejected() {
        let img = create_test_image(100, 100);
        let result = ScaleParams::new(1.0e6).unwrap().apply(&img);
        assert!(matches!(
            result,
            Err(TransformError::InvalidParameter { ref name, .. }) if name == "scale_factor"
        ));
    }

    #[test]
    fn test_uniform_color_preserved() {
        let img = DecodedImage::filled(8, 8, [10, 200, 30]);
        let out = ScaleParams::new(1.5).unwrap().apply(&img).unwrap();
        assert_eq!((out.width, out.height), (12, 12));
        assert!(out.pixels.chunks_exact(3).all(|p| p == [10, 200, 30]));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: output size is max(1, round(side * factor)).
        #[test]
        fn prop_output_dimensions(
            width in 1u32..=64,
            height in 1u32..=64,
            factor in 0.01f64..4.0,
        ) {
            let img = DecodedImage::filled(width, height, [50, 60, 70]);
            let out = ScaleParams::new(factor).unwrap().apply(&img).unwrap();

            let expected_w = ((width as f64 * factor).round() as u32).max(1);
            let expected_h = ((height as f64 * factor).round() as u32).max(1);
            prop_assert_eq!(out.width, expected_w);
            prop_assert_eq!(out.height, expected_h);
            prop_assert_eq!(out.pixels.len(), (expected_w * expected_h * 3) as usize);
        }

        /// Property: any non-positive factor is rejected.
        #[test]
        fn prop_non_positive_rejected(factor in -100.0f64..=0.0) {
            prop_assert!(ScaleParams::new(factor).is_err());
        }
    }
}
