//! Error types of the dataset.

use std::{io, path::PathBuf};
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The error returned by dataset construction and item access.
#[derive(Debug, Error)]
pub enum Error {
    /// A required directory or annotation file does not exist.
    #[error("'{}' does not exist", .path.display())]
    NotFound { path: PathBuf },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The image file is unreadable or corrupt. Only the offending item is affected.
    #[error("failed to decode image file '{}'", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("index {index} is out of range for dataset of length {len}")]
    Index { index: usize, len: usize },
    #[error("I/O error on '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Config(#[from] json5::Error),
}

impl Error {
    pub(crate) fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}
