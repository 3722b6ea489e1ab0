//! Error types shared by every part of the crate.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A named file could not be opened, read, or written.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An anonymous reader or writer failed.
    #[error("I/O error: {0}")]
    Stream(#[from] io::Error),

    /// Fewer bytes are available than the header declares.
    #[error("truncated file: expected at least {expected} bytes, found {actual}")]
    TruncatedFile { expected: usize, actual: usize },

    #[error("malformed topology: {0}")]
    MalformedTopology(String),

    #[error("allocation of {bytes} bytes failed")]
    AllocationFailure { bytes: usize },

    #[error("malformed dataset: {0}")]
    MalformedDataset(String),

    /// An input vector does not match the width of the layer it feeds.
    #[error("shape mismatch: expected {expected} values, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns a closure that tags an `io::Error` with the file it concerns,
    /// for use with `map_err`.
    pub fn io_at(path: &Path) -> impl FnOnce(io::Error) -> Error + '_ {
        move |source| Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
