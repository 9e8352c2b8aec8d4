//! Error type for snapshot loading and configuration.
//!
//! Comparison itself never fails; everything that can go wrong happens while
//! turning files on disk into a [`Snapshot`](crate::snapshot::Snapshot).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompatError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode descriptor set: {0}")]
    Decode(#[from] protobuf::Error),

    #[error("Failed to parse proto sources under {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("No .proto files found under {0}")]
    EmptyInput(PathBuf),
}

impl CompatError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CompatError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CompatError>;
