//! Error types for asset generation and cleanup.

use std::path::PathBuf;

use thiserror::Error;

use crate::transform::TransformError;

/// Result type alias for asset management operations.
pub type AssetResult<T> = Result<T, AssetError>;

/// Errors raised while materializing or managing derived assets.
///
/// Cleanup paths never surface these; see
/// [`DerivedAssetManager::cleanup_derived`](crate::DerivedAssetManager::cleanup_derived).
#[derive(Debug, Error)]
pub enum AssetError {
    /// No transform capability was injected but a derived asset had to be
    /// generated. Signals misconfiguration, not a transient condition.
    #[error("no asset transform is configured; derived assets cannot be generated")]
    TransformUnavailable,

    /// The directory that should contain a derived asset could not be created.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreation {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The injected transform capability failed.
    #[error("transform failed for {path}: {source}")]
    Transform {
        /// Source file the transform ran against.
        path: PathBuf,
        /// Underlying transform error.
        source: TransformError,
    },

    /// A profile name was requested that is not present in the configuration.
    #[error("unknown profile '{name}'")]
    UnknownProfile {
        /// Profile name that failed the lookup.
        name: String,
    },

    /// I/O error while moving a finished derived asset into place.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
