//! Image decoding for uploaded files.
//!
//! This module provides functionality for:
//! - Sniffing the raster format (JPEG, PNG, BMP) from file content
//! - Decoding to a flat RGB buffer, applying EXIF orientation for JPEG
//!
//! All operations are synchronous and allocate a fresh output buffer.
//!
//! # Examples
//!
//! ```ignore
//! use geotransform_core::decode::decode_image;
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod reader;
mod types;

pub use reader::{decode_image, detect_format, get_orientation};
pub use types::{DecodeError, DecodedImage, FilterType, Orientation, SourceFormat};
