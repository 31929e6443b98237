//! Error types for acquisition and codec operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// I/O operation error.
#[derive(Debug, Error)]
pub enum IoError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The path does not reference a regular file.
    #[error("not a regular file: {0}")]
    NotAFile(PathBuf),

    /// The URL is malformed or uses an unsupported scheme.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Fetching a URL failed.
    #[error("download failed for {url}: {reason}")]
    DownloadFailed {
        /// The URL that was requested.
        url: String,
        /// Transport or HTTP-level failure description.
        reason: String,
    },

    /// Decoding error.
    #[error("decode error: {0}")]
    DecodeError(String),

    /// Encoding error.
    #[error("encode error: {0}")]
    EncodeError(String),

    /// Unsupported format.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The clipboard holds no usable image representation.
    #[error("unsupported clipboard payload: {0}")]
    UnsupportedPayload(String),

    /// A decoded buffer did not match the canonical layout.
    #[error(transparent)]
    Buffer(#[from] docraster_core::Error),
}

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;
