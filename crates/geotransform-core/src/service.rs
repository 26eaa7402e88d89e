//! File-backed request handling around the transformation dispatcher.
//!
//! [`TransformService`] performs the I/O the dispatcher itself never does:
//! it validates the upload form fields, saves the original, decodes it,
//! applies the requested transformation, re-encodes in the original format
//! and writes the result next to the other processed files.
//!
//! Every failure maps to an HTTP-style status via [`ServiceError::status_code`]
//! and a JSON body via [`ErrorBody`], so a web layer only has to forward them.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::StorageConfig;
use crate::decode::{decode_image, detect_format, DecodeError, SourceFormat};
use crate::encode::{encode_image, EncodeError};
use crate::params::{Params, ParamsFormatError};
use crate::transform::{apply_transform, TransformError};

/// Transformation name used when the form omits one. Never valid.
pub const DEFAULT_TRANSFORMATION: &str = "none";

/// Errors surfaced to the caller of the service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("No file provided")]
    NoFile,

    #[error("No selected file")]
    NoFilename,

    #[error(transparent)]
    InvalidParams(#[from] ParamsFormatError),

    #[error("Unsupported file extension: {0:?}")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("Failed to decode image: {0}")]
    Decode(#[from] DecodeError),

    #[error("Failed to encode image: {0}")]
    Encode(#[from] EncodeError),

    #[error("I/O error on {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
}

impl ServiceError {
    fn io(path: &Path, source: io::Error) -> Self {
        ServiceError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// HTTP status a web layer should answer with.
    ///
    /// Problems with the request itself are 400; storage and encoder failures
    /// are 500.
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::NoFile
            | ServiceError::NoFilename
            | ServiceError::InvalidParams(_)
            | ServiceError::UnsupportedFormat(_)
            | ServiceError::Transform(_)
            | ServiceError::Decode(_) => 400,
            ServiceError::Encode(_) | ServiceError::Io { .. } => 500,
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            error: self.to_string(),
        }
    }
}

/// JSON error payload: `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// The `file` part of an upload form.
#[derive(Debug, Clone, Copy)]
pub struct UploadedFile<'a> {
    pub filename: &'a str,
    pub bytes: &'a [u8],
}

/// A multipart upload as received by the web layer.
///
/// Each field is optional because the form may omit it.
#[derive(Debug, Clone, Copy, Default)]
pub struct UploadRequest<'a> {
    pub file: Option<UploadedFile<'a>>,
    /// Transformation name; defaults to [`DEFAULT_TRANSFORMATION`].
    pub transformation: Option<&'a str>,
    /// JSON-encoded parameter object; defaults to `{}`.
    pub params: Option<&'a str>,
}

impl<'a> UploadRequest<'a> {
    pub fn new(filename: &'a str, bytes: &'a [u8]) -> Self {
        Self {
            file: Some(UploadedFile { filename, bytes }),
            ..Default::default()
        }
    }

    pub fn transformation(mut self, name: &'a str) -> Self {
        self.transformation = Some(name);
        self
    }

    pub fn params(mut self, json: &'a str) -> Self {
        self.params = Some(json);
        self
    }
}

/// A successfully processed upload.
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    /// Where the result was written.
    pub path: PathBuf,
    /// The encoded result, ready to be served.
    pub bytes: Vec<u8>,
    pub format: SourceFormat,
}

impl ProcessedImage {
    /// `Content-Type` to serve [`ProcessedImage::bytes`] with.
    pub fn content_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Handles uploads against a fixed [`StorageConfig`].
#[derive(Debug, Clone)]
pub struct TransformService {
    config: StorageConfig,
}

impl TransformService {
    /// Create the service, making sure both storage directories exist.
    pub fn new(config: StorageConfig) -> Result<Self, ServiceError> {
        config
            .ensure_directories()
            .map_err(|e| ServiceError::io(&config.upload_dir, e))?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Process one upload end to end.
    pub fn handle_upload(&self, request: UploadRequest<'_>) -> Result<ProcessedImage, ServiceError> {
        let result = self.process(request);
        if let Err(e) = &result {
            tracing::warn!(status = e.status_code(), "Rejected upload: {}", e);
        }
        result
    }

    fn process(&self, request: UploadRequest<'_>) -> Result<ProcessedImage, ServiceError> {
        let file = request.file.ok_or(ServiceError::NoFile)?;
        let file_name = sanitize_file_name(file.filename).ok_or(ServiceError::NoFilename)?;
        let transformation = request.transformation.unwrap_or(DEFAULT_TRANSFORMATION);
        let params = Params::from_json(request.params.unwrap_or("{}"))?;

        let format = format_for_file_name(file_name)?;

        let upload_path = self.config.upload_path(file_name);
        std::fs::write(&upload_path, file.bytes).map_err(|e| ServiceError::io(&upload_path, e))?;

        let bytes = transform_bytes(file.bytes, format, transformation, &params)?;

        let output_path = self.config.processed_path(file_name);
        std::fs::write(&output_path, &bytes).map_err(|e| ServiceError::io(&output_path, e))?;

        tracing::info!(
            file = file_name,
            transformation,
            bytes = bytes.len(),
            "Wrote {}",
            output_path.display()
        );

        Ok(ProcessedImage {
            path: output_path,
            bytes,
            format,
        })
    }
}

/// Decode `bytes`, apply the transformation, and encode as `format`.
pub fn transform_bytes(
    bytes: &[u8],
    format: SourceFormat,
    transformation: &str,
    params: &Params,
) -> Result<Vec<u8>, ServiceError> {
    let image = decode_image(bytes)?;
    let output = apply_transform(&image, transformation, params)?;
    Ok(encode_image(&output, format)?)
}

/// Like [`transform_bytes`], with the output format sniffed from the input.
pub fn transform_encoded(
    bytes: &[u8],
    transformation: &str,
    params: &Params,
) -> Result<(Vec<u8>, SourceFormat), ServiceError> {
    let format = detect_format(bytes)?;
    let output = transform_bytes(bytes, format, transformation, params)?;
    Ok((output, format))
}

/// Reduce a client-supplied file name to its final component.
///
/// Returns `None` for names that are empty or only name a directory.
pub fn sanitize_file_name(name: &str) -> Option<&str> {
    let base = name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or("").trim();
    match base {
        "" | "." | ".." => None,
        _ => Some(base),
    }
}

fn format_for_file_name(file_name: &str) -> Result<SourceFormat, ServiceError> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    SourceFormat::from_extension(ext).ok_or_else(|| ServiceError::UnsupportedFormat(ext.to_string()))
}
