//! Image encoding for processed output.
//!
//! Output is always written in the same format the input arrived in:
//! - JPEG at a fixed quality of 95
//! - PNG (lossless)
//! - BMP (uncompressed 24-bit)
//!
//! # Examples
//!
//! ```ignore
//! use geotransform_core::encode::encode_image;
//! use geotransform_core::decode::SourceFormat;
//!
//! let bytes = encode_image(&image, SourceFormat::Png).unwrap();
//! println!("Encoded {} bytes", bytes.len());
//! ```

mod writer;

pub use writer::{encode_image, encode_jpeg, EncodeError, DEFAULT_JPEG_QUALITY};
