//! 2x3 affine matrices and the inverse-mapping warp shared by rotate,
//! translate and shear.
//!
//! # Algorithm
//!
//! Matrices are stored in the forward direction (source -> destination).
//! The warp inverts the matrix once and then, for each pixel in the output
//! image, computes the source coordinate it comes from:
//!
//! ```text
//! src_x = inv[0][0] * dst_x + inv[0][1] * dst_y + inv[0][2]
//! src_y = inv[1][0] * dst_x + inv[1][1] * dst_y + inv[1][2]
//! ```
//!
//! and samples the source with bilinear interpolation. Pixel centers sit on
//! integer coordinates. Neighbors that fall outside the source contribute
//! the fill color, so content edges blend into the background.

use crate::decode::DecodedImage;

/// Sub-pixel resolution of source coordinates (1/32 pixel).
const SUBPIXEL_STEPS: f64 = 32.0;

const SINGULAR_EPSILON: f64 = 1e-12;

/// A 2D affine transform `[[a, b, c], [d, e, f]]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineMatrix {
    pub rows: [[f64; 3]; 2],
}

impl AffineMatrix {
    pub const IDENTITY: AffineMatrix = AffineMatrix {
        rows: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
    };

    pub fn new(rows: [[f64; 3]; 2]) -> Self {
        Self { rows }
    }

    /// Shift by `(tx, ty)`.
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new([[1.0, 0.0, tx], [0.0, 1.0, ty]])
    }

    /// `[[1, shear_x, 0], [shear_y, 1, 0]]`
    pub fn shear(shear_x: f64, shear_y: f64) -> Self {
        Self::new([[1.0, shear_x, 0.0], [shear_y, 1.0, 0.0]])
    }

    /// Rotation about `(cx, cy)` with unit scale.
    ///
    /// Positive angles rotate counter-clockwise as seen on screen (y axis
    /// pointing down):
    ///
    /// ```text
    /// [[ cos, sin, (1 - cos) * cx - sin * cy ],
    ///  [-sin, cos, sin * cx + (1 - cos) * cy ]]
    /// ```
    pub fn rotation(cx: f64, cy: f64, angle_degrees: f64) -> Self {
        let angle = angle_degrees.to_radians();
        let (sin, cos) = angle.sin_cos();
        Self::new([
            [cos, sin, (1.0 - cos) * cx - sin * cy],
            [-sin, cos, sin * cx + (1.0 - cos) * cy],
        ])
    }

    pub fn determinant(&self) -> f64 {
        let [[a, b, _], [d, e, _]] = self.rows;
        a * e - b * d
    }

    /// Inverse transform, or `None` if the linear part is singular.
    pub fn invert(&self) -> Option<Self> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < SINGULAR_EPSILON {
            return None;
        }

        let [[a, b, c], [d, e, f]] = self.rows;
        Some(Self::new([
            [e / det, -b / det, (b * f - e * c) / det],
            [-d / det, a / det, (d * c - a * f) / det],
        ]))
    }

    /// Map a point through the transform.
    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let [[a, b, c], [d, e, f]] = self.rows;
        (a * x + b * y + c, d * x + e * y + f)
    }
}

impl Default for AffineMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Warp `image` through `matrix` into a new `width x height` canvas.
///
/// Destination pixels whose source falls outside the image are set to
/// `fill`. Returns `None` if `matrix` cannot be inverted.
pub fn warp_affine(
    image: &DecodedImage,
    matrix: &AffineMatrix,
    width: u32,
    height: u32,
    fill: [u8; 3],
) -> Option<DecodedImage> {
    let inverse = matrix.invert()?;

    let mut output = Vec::with_capacity(width as usize * height as usize * 3);

    for dst_y in 0..height {
        for dst_x in 0..width {
            let (src_x, src_y) = inverse.apply(dst_x as f64, dst_y as f64);
            output.extend_from_slice(&sample_bilinear(image, src_x, src_y, fill));
        }
    }

    Some(DecodedImage::new(width, height, output))
}

#[inline]
fn quantize(v: f64) -> f64 {
    (v * SUBPIXEL_STEPS).round() / SUBPIXEL_STEPS
}

/// Read a pixel as f64, substituting `fill` outside the image.
#[inline]
fn pixel_or_fill(image: &DecodedImage, x: i64, y: i64, fill: [u8; 3]) -> [f64; 3] {
    let p = if x >= 0 && y >= 0 && x < image.width as i64 && y < image.height as i64 {
        image.pixel(x as u32, y as u32)
    } else {
        fill
    };
    [p[0] as f64, p[1] as f64, p[2] as f64]
}

/// Sample a pixel using bilinear interpolation.
///
/// Bilinear interpolation considers the 4 nearest pixels and weights
/// their contribution based on distance.
fn sample_bilinear(image: &DecodedImage, x: f64, y: f64, fill: [u8; 3]) -> [u8; 3] {
    if !x.is_finite() || !y.is_finite() {
        return fill;
    }

    let (x, y) = (quantize(x), quantize(y));
    let x0f = x.floor();
    let y0f = y.floor();

    // Entirely outside: no neighbor can reach the image
    if x0f < -1.0 || y0f < -1.0 || x0f >= image.width as f64 || y0f >= image.height as f64 {
        return fill;
    }

    let (x0, y0) = (x0f as i64, y0f as i64);
    let fx = x - x0f;
    let fy = y - y0f;

    let p00 = pixel_or_fill(image, x0, y0, fill);
    let p10 = pixel_or_fill(image, x0 + 1, y0, fill);
    let p01 = pixel_or_fill(image, x0, y0 + 1, fill);
    let p11 = pixel_or_fill(image, x0 + 1, y0 + 1, fill);

    let mut result = [0u8; 3];
    for i in 0..3 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }

    result
}
