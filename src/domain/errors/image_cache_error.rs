//! Image cache error types.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Image cache error variants.
///
/// A missing source image is not an error: the destination path is still
/// returned, it just points at nothing.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ImageCacheError {
    #[error("image reference has no file extension: {reference:?}")]
    InvalidReference { reference: String },

    #[error("failed to process image {}: {message}", path.display())]
    Processing { path: PathBuf, message: String },

    #[error("filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("quality must be between 0 and 100, got {0}")]
    InvalidQuality(u8),

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("unknown image operation: {0}")]
    UnknownOperation(String),
}

impl ImageCacheError {
    /// Creates invalid reference error.
    #[must_use]
    pub fn invalid_reference(reference: impl Into<String>) -> Self {
        Self::InvalidReference {
            reference: reference.into(),
        }
    }

    /// Creates processing error.
    #[must_use]
    pub fn processing(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Processing {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Creates filesystem error.
    #[must_use]
    pub fn filesystem(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
