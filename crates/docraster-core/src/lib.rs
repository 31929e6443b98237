//! # docraster-core
//!
//! Core types for preparing raster images before they are embedded in a
//! generated document.
//!
//! This crate provides the foundational types used throughout the
//! docraster workspace:
//!
//! - [`RasterImage`] - Immutable, owned RGBA8 pixel buffer
//! - [`Color`] - RGBA8 color value with straight alpha
//! - [`Rect`], [`CropMargins`] - Region types
//!
//! ## Design Philosophy
//!
//! Every image is **immutable once constructed**. Transforms in the
//! companion crates are pure functions from a borrowed image to a fresh,
//! independently owned one, which keeps ownership reasoning trivial and
//! lets concurrent callers process disjoint images without locking.
//!
//! ## Crate Structure
//!
//! This crate is the foundation of the workspace and has no internal
//! dependencies:
//!
//! ```text
//! docraster-core (this crate)
//!    ^
//!    |
//!    +-- docraster-ops (scale, composite, crop, alpha)
//!    +-- docraster-io  (acquisition, codecs)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod color;
pub mod error;
pub mod image;
pub mod rect;

// Re-exports for convenience
pub use color::Color;
pub use error::{Error, Result};
pub use image::RasterImage;
pub use rect::{CropMargins, Rect};

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```
/// use docraster_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::color::Color;
    pub use crate::error::{Error, Result};
    pub use crate::image::RasterImage;
    pub use crate::rect::{CropMargins, Rect};
}
