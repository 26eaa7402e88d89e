//! Shear with a fixed-size canvas; content sheared out of frame is clipped.

use crate::decode::DecodedImage;
use crate::params::Params;

use super::affine::{warp_affine, AffineMatrix};
use super::TransformError;

/// Background for pixels with no source mapping.
pub const SHEAR_FILL: [u8; 3] = [0, 0, 0];

/// Parameters for `shear`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShearParams {
    pub shear_x: f64,
    pub shear_y: f64,
}

impl ShearParams {
    /// Build shear parameters; the resulting matrix must be invertible.
    pub fn new(shear_x: f64, shear_y: f64) -> Result<Self, TransformError> {
        let params = Self { shear_x, shear_y };
        if params.matrix().invert().is_none() {
            return Err(TransformError::invalid(
                "shear_x",
                format!(
                    "shear_x * shear_y must not equal 1 (got {} * {})",
                    shear_x, shear_y
                ),
            ));
        }
        Ok(params)
    }

    pub fn from_params(params: &Params) -> Result<Self, TransformError> {
        Self::new(params.get_f64("shear_x", 0.0)?, params.get_f64("shear_y", 0.0)?)
    }

    pub fn matrix(&self) -> AffineMatrix {
        AffineMatrix::shear(self.shear_x, self.shear_y)
    }

    pub fn apply(&self, image: &DecodedImage) -> Result<DecodedImage, TransformError> {
        tracing::debug!(
            "Shearing {}x{} by ({}, {})",
            image.width,
            image.height,
            self.shear_x,
            self.shear_y
        );

        warp_affine(image, &self.matrix(), image.width, image.height, SHEAR_FILL)
            .ok_or_else(|| TransformError::invalid("shear_x", "shear matrix is not invertible"))
    }
}
