//! Storage locations for uploaded and processed files.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Directory name for saved uploads under a base directory.
pub const UPLOAD_DIR_NAME: &str = "uploads";
/// Directory name for processed output under a base directory.
pub const PROCESSED_DIR_NAME: &str = "processed";

/// Where the file-backed service reads and writes images.
///
/// Configured once at startup and handed to [`crate::service::TransformService`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Uploaded originals are saved here under their own file name.
    pub upload_dir: PathBuf,
    /// Results are written here as `processed_<file name>`.
    pub processed_dir: PathBuf,
}

impl Default for StorageConfig {
    /// `uploads/` and `processed/` relative to the working directory.
    fn default() -> Self {
        Self::from_base_dir(".")
    }
}

impl StorageConfig {
    pub fn new(upload_dir: impl Into<PathBuf>, processed_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            processed_dir: processed_dir.into(),
        }
    }

    /// `<base>/uploads` and `<base>/processed`.
    pub fn from_base_dir(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        Self::new(base.join(UPLOAD_DIR_NAME), base.join(PROCESSED_DIR_NAME))
    }

    /// Create both directories if they do not exist yet.
    pub fn ensure_directories(&self) -> io::Result<()> {
        std::fs::create_dir_all(&self.upload_dir)?;
        std::fs::create_dir_all(&self.processed_dir)?;
        Ok(())
    }

    /// Path an upload named `file_name` is saved to.
    pub fn upload_path(&self, file_name: &str) -> PathBuf {
        self.upload_dir.join(file_name)
    }

    /// Path the processed result for `file_name` is written to.
    pub fn processed_path(&self, file_name: &str) -> PathBuf {
        self.processed_dir.join(format!("processed_{}", file_name))
    }
}
