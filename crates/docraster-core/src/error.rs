//! Error types for core image operations.
//!
//! Provides a unified error enum for buffer construction and
//! bounds-checked pixel access.

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while constructing or accessing raster buffers.
#[derive(Debug, Error)]
pub enum Error {
    /// Pixel coordinates are outside image bounds.
    ///
    /// Returned when attempting to access a pixel at (x, y) where
    /// `x >= width` or `y >= height`.
    #[error("pixel ({x}, {y}) out of bounds for image {width}x{height}")]
    OutOfBounds {
        /// X coordinate that was out of bounds
        x: u32,
        /// Y coordinate that was out of bounds
        y: u32,
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },

    /// A region does not fit within the image dimensions.
    #[error("region ({rx}, {ry}, {rw}x{rh}) exceeds image bounds {width}x{height}")]
    InvalidRegion {
        /// Region X origin
        rx: u32,
        /// Region Y origin
        ry: u32,
        /// Region width
        rw: u32,
        /// Region height
        rh: u32,
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },

    /// Invalid dimensions specified.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Raw buffer length does not match `width * height * 4`.
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch {
        /// Expected byte length.
        expected: usize,
        /// Actual byte length.
        actual: usize,
    },
}
