//! Rotation about the image center.
//!
//! Unlike a straighten tool, the canvas is NOT expanded: the output keeps the
//! source dimensions, corners that rotate out of frame are clipped and areas
//! with no source pixel are filled black.

use crate::decode::DecodedImage;
use crate::params::Params;

use super::affine::{warp_affine, AffineMatrix};
use super::TransformError;

/// Background for pixels with no source mapping.
pub const ROTATION_FILL: [u8; 3] = [0, 0, 0];

/// Parameters for `rotate`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotateParams {
    /// Angle in degrees, positive = counter-clockwise.
    pub angle: f64,
}

impl RotateParams {
    pub fn new(angle: f64) -> Self {
        Self { angle }
    }

    pub fn from_params(params: &Params) -> Result<Self, TransformError> {
        Ok(Self::new(params.get_f64("angle", 0.0)?))
    }

    /// The forward matrix for an image of the given size.
    pub fn matrix(&self, width: u32, height: u32) -> AffineMatrix {
        AffineMatrix::rotation(width as f64 / 2.0, height as f64 / 2.0, self.angle)
    }

    pub fn apply(&self, image: &DecodedImage) -> Result<DecodedImage, TransformError> {
        // Fast path: whole turns leave every pixel in place
        if (self.angle % 360.0).abs() < 1e-9 {
            return Ok(image.clone());
        }

        tracing::debug!(
            "Rotating {}x{} by {} degrees",
            image.width,
            image.height,
            self.angle
        );

        let matrix = self.matrix(image.width, image.height);
        // A rotation matrix always has determinant 1
        warp_affine(image, &matrix, image.width, image.height, ROTATION_FILL)
            .ok_or_else(|| TransformError::invalid("angle", "rotation matrix is not invertible"))
    }
}
