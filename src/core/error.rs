//! Error types for data-preparation operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while preparing card datasets.
#[derive(Debug, Error)]
pub enum PrepError {
    /// Filesystem access failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path being read or written.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// An image could not be decoded or encoded.
    #[error("Image error at {path}: {source}")]
    Image {
        /// The image file.
        path: PathBuf,
        /// The underlying image error.
        #[source]
        source: image::ImageError,
    },

    /// The card dataset or a config file is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A vocabulary snapshot could not be written or read.
    #[error("Vocabulary snapshot error: {0}")]
    Bincode(#[from] bincode::Error),

    /// A character is not present in the character vocabulary.
    #[error("Character {0:?} is not in the vocabulary")]
    VocabularyMiss(char),

    /// The crop rectangle does not fit inside the source image.
    #[error("Invalid crop geometry for {width}x{height} image: {reason}")]
    InvalidGeometry {
        /// Source image width.
        width: u32,
        /// Source image height.
        height: u32,
        /// What went wrong.
        reason: &'static str,
    },

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An operation needed at least one example.
    #[error("Dataset is empty: {0}")]
    EmptyDataset(&'static str),
}

impl PrepError {
    /// Wrap an IO error with the path it happened at.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap an image error with the file it happened at.
    pub fn image(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::Image {
            path: path.into(),
            source,
        }
    }
}

/// Result type for data-preparation operations.
pub type PrepResult<T> = std::result::Result<T, PrepError>;
