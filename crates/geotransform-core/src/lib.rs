//! Geotransform Core - geometric image transformations
//!
//! This crate applies one named 2D transformation (scale, rotate, translate,
//! shear or reflect) to an uploaded RGB image and hands back a new image in
//! the same format it arrived in.
//!
//! # Module Structure
//!
//! - `decode` - Format sniffing and decoding to RGB (JPEG, PNG, BMP)
//! - `encode` - Re-encoding processed images in their original format
//! - `params` - Untyped request parameters and coercion rules
//! - `transform` - Typed transformations, the dispatcher and the affine warp
//! - `config` - Storage locations for the file-backed service
//! - `service` - Upload handling: save, transform, write, report errors

pub mod config;
pub mod decode;
pub mod encode;
pub mod params;
pub mod service;
pub mod transform;

pub use config::StorageConfig;
pub use decode::{decode_image, DecodeError, DecodedImage, SourceFormat};
pub use encode::{encode_image, EncodeError};
pub use params::{Params, ParamsFormatError};
pub use service::{ErrorBody, ServiceError, TransformService, UploadRequest};
pub use transform::{apply_transform, Transform, TransformError, TransformKind};
