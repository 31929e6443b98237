//! # docraster-ops
//!
//! The pixel compositing and transform engine for document raster
//! preparation.
//!
//! # Modules
//!
//! - [`scale`] - Affine resampling with selectable kernels
//! - [`mask`] - Antialiased rounded-rectangle coverage maps
//! - [`composite`] - Soft-clipped corners, borders, outline strokes
//! - [`crop`] - Sub-region extraction
//! - [`alpha`] - Flattening and color-key transparency
//!
//! # Example
//!
//! ```rust
//! use docraster_core::{Color, RasterImage};
//! use docraster_ops::composite::{add_border, BorderSpec};
//! use docraster_ops::scale::{scale, ScaleRequest};
//!
//! let img = RasterImage::filled(40, 40, Color::rgb(200, 16, 16));
//! let img = scale(&img, &ScaleRequest::new(80, 80)).unwrap();
//! let img = add_border(&img, &BorderSpec::new(Color::BLACK, 4)).unwrap();
//! assert_eq!(img.dimensions(), (88, 88));
//! ```
//!
//! Every operation consumes a borrowed [`docraster_core::RasterImage`]
//! and produces a fresh one; sources are never mutated.
//!
//! # Feature Flags
//!
//! - `parallel` - Row-parallel resampling via rayon (default)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod alpha;
pub mod composite;
pub mod crop;
pub mod mask;
pub mod scale;

pub use alpha::ColorKeySpec;
pub use composite::{BorderSpec, OutlineSpec};
pub use error::{OpsError, OpsResult};
pub use scale::{Kernel, ScaleRequest};
