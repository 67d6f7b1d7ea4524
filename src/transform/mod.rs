//! Image transform capability consumed by the derived asset manager.
//!
//! The manager never touches pixels itself: it hands the source path and the
//! profile parameters to an [`AssetTransform`] and writes whatever comes
//! back. The capability is injected, so applications can swap in their own
//! processing pipeline; [`ImageThumbnailer`] is the built-in implementation.

mod thumbnail;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use thumbnail::ImageThumbnailer;

use crate::models::ProfileParams;

/// Errors raised by a transform capability.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The source image could not be opened or decoded.
    #[error("failed to open source image {path}: {source}")]
    Open {
        /// Source path that failed to decode.
        path: PathBuf,
        /// Underlying image error.
        source: image::ImageError,
    },

    /// The derived image could not be encoded.
    #[error("failed to encode derived image {path}: {source}")]
    Encode {
        /// Destination path being encoded for.
        path: PathBuf,
        /// Underlying image error.
        source: image::ImageError,
    },

    /// I/O failure while writing the derived image.
    #[error("io error for {path}: {source}")]
    Io {
        /// Path involved in the failed operation.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Capability that produces derived variants of a source image.
///
/// `transform` yields the derived variant as encoded bytes; `save` writes
/// those bytes to a destination path, applying the configured quality when
/// the destination format supports it. The split allows the manager to stage
/// output through a temporary file before atomically publishing it.
pub trait AssetTransform: Send + Sync {
    /// Produce the derived variant of `source` described by `params`.
    fn transform(&self, source: &Path, params: &ProfileParams) -> Result<Vec<u8>, TransformError>;

    /// Encode and write previously transformed bytes to `dest`.
    fn save(&self, bytes: &[u8], dest: &Path, quality: u8) -> Result<(), TransformError>;
}
