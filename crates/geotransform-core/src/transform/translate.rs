//! Translation onto an enlarged white canvas.
//!
//! The canvas grows by `|offset_x|` columns and `|offset_y|` rows and the
//! shift `[[1, 0, offset_x], [0, 1, offset_y]]` is warped into that enlarged
//! canvas. A positive offset therefore leaves a white band on the left/top;
//! a negative offset moves content off the left/top edge and leaves the band
//! on the right/bottom.

use crate::decode::DecodedImage;
use crate::params::Params;

use super::affine::{warp_affine, AffineMatrix};
use super::{check_canvas, TransformError};

/// Background of the enlarged canvas.
pub const TRANSLATION_FILL: [u8; 3] = [255, 255, 255];

/// Parameters for `translate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TranslateParams {
    pub offset_x: i64,
    pub offset_y: i64,
}

impl TranslateParams {
    pub fn new(offset_x: i64, offset_y: i64) -> Self {
        Self { offset_x, offset_y }
    }

    pub fn from_params(params: &Params) -> Result<Self, TransformError> {
        Ok(Self::new(
            params.get_i64("offset_x", 0)?,
            params.get_i64("offset_y", 0)?,
        ))
    }

    /// Size of the enlarged canvas for a `width x height` source.
    pub fn canvas_size(&self, width: u32, height: u32) -> (u64, u64) {
        (
            width as u64 + self.offset_x.unsigned_abs(),
            height as u64 + self.offset_y.unsigned_abs(),
        )
    }

    pub fn apply(&self, image: &DecodedImage) -> Result<DecodedImage, TransformError> {
        let (width, height) = self.canvas_size(image.width, image.height);
        let name = if self.offset_x.unsigned_abs() >= self.offset_y.unsigned_abs() {
            "offset_x"
        } else {
            "offset_y"
        };
        let (width, height) = check_canvas(name, width, height)?;

        tracing::debug!(
            "Translating {}x{} by ({}, {}) onto {}x{} canvas",
            image.width,
            image.height,
            self.offset_x,
            self.offset_y,
            width,
            height
        );

        let matrix = AffineMatrix::translation(self.offset_x as f64, self.offset_y as f64);
        warp_affine(image, &matrix, width, height, TRANSLATION_FILL)
            .ok_or_else(|| TransformError::invalid(name, "translation is not invertible"))
    }
}
