//! Mirror flips. These are exact pixel permutations, no resampling.

use std::fmt;
use std::str::FromStr;

use crate::decode::DecodedImage;
use crate::params::Params;

use super::TransformError;

/// Axis to reflect about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReflectAxis {
    /// About the horizontal axis: vertical flip (top <-> bottom).
    #[default]
    X,
    /// About the vertical axis: horizontal flip (left <-> right).
    Y,
    /// Both flips, equivalent to a 180 degree turn.
    Both,
}

impl ReflectAxis {
    pub fn as_str(self) -> &'static str {
        match self {
            ReflectAxis::X => "x",
            ReflectAxis::Y => "y",
            ReflectAxis::Both => "xy",
        }
    }
}

impl FromStr for ReflectAxis {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" => Ok(ReflectAxis::X),
            "y" => Ok(ReflectAxis::Y),
            "xy" => Ok(ReflectAxis::Both),
            other => Err(TransformError::invalid(
                "axis",
                format!("Invalid reflection axis {:?} (expected x, y or xy)", other),
            )),
        }
    }
}

impl fmt::Display for ReflectAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for `reflect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReflectParams {
    pub axis: ReflectAxis,
}

impl ReflectParams {
    pub fn new(axis: ReflectAxis) -> Self {
        Self { axis }
    }

    pub fn from_params(params: &Params) -> Result<Self, TransformError> {
        Ok(Self::new(params.get_str("axis", "x")?.parse()?))
    }

    pub fn apply(&self, image: &DecodedImage) -> Result<DecodedImage, TransformError> {
        tracing::debug!("Reflecting {}x{} about {}", image.width, image.height, self.axis);

        Ok(match self.axis {
            ReflectAxis::X => flip_vertical(image),
            ReflectAxis::Y => flip_horizontal(image),
            ReflectAxis::Both => flip_horizontal(&flip_vertical(image)),
        })
    }
}

fn row_len(image: &DecodedImage) -> usize {
    (image.width as usize * 3).max(1)
}

/// Reverse the order of rows.
pub fn flip_vertical(image: &DecodedImage) -> DecodedImage {
    let pixels = image
        .pixels
        .chunks_exact(row_len(image))
        .rev()
        .flatten()
        .copied()
        .collect();
    DecodedImage::new(image.width, image.height, pixels)
}

/// Reverse the order of pixels within each row.
pub fn flip_horizontal(image: &DecodedImage) -> DecodedImage {
    let pixels = image
        .pixels
        .chunks_exact(row_len(image))
        .flat_map(|row| row.chunks_exact(3).rev().flatten().copied())
        .collect();
    DecodedImage::new(image.width, image.height, pixels)
}
