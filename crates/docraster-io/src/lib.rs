//! # docraster-io
//!
//! Image acquisition and codecs for document raster preparation.
//!
//! # Architecture
//!
//! - [`acquire`] - Loads a [`docraster_core::RasterImage`] from a file,
//!   a URL, or a clipboard provider, normalizing every source to the
//!   canonical RGBA8 buffer
//! - [`codec`] - Serializes an image to PNG/JPEG bytes or writes it to
//!   a file with an explicit success/failure result
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use docraster_io::{acquire, codec};
//!
//! let image = acquire::from_file("input.png")?;
//! let bytes = codec::encode_png(&image)?;
//! codec::save_to_file(&image, "out.png", codec::ImageFormat::Png)?;
//! ```
//!
//! # Failure Policy
//!
//! Invalid inputs (missing file, malformed URL, imageless clipboard)
//! fail immediately with a typed error. Transient decode faults on
//! files are retried up to three times. Write failures are logged and
//! returned - never silently discarded.
//!
//! # Feature Flags
//!
//! - `clipboard` - System clipboard acquisition via arboard (default)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod acquire;
pub mod codec;
mod error;

pub use acquire::{ClipboardPayload, ClipboardProvider, from_clipboard, from_file, from_url};
pub use codec::{ImageFormat, encode_png, save_to_file};
pub use error::{IoError, IoResult};

#[cfg(feature = "clipboard")]
pub use acquire::SystemClipboard;
