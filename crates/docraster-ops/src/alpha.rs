//! Alpha flattening and color-key transparency.
//!
//! [`flatten`] prepares an image for formats without transparency
//! support by compositing it onto an opaque background. [`key_out_color`]
//! goes the other way: it marks pixels near a reference color as
//! transparent, within a numeric tolerance.
//!
//! Color keying is a lazy, per-pixel pure function composed over the
//! source's pixel iterator; nothing is materialized until the caller
//! asks for a concrete buffer via [`ColorKeyed::to_image`].

use docraster_core::{Color, RasterImage};

/// Renders the image onto an opaque canvas filled with `background`.
///
/// The alpha channel is discarded: every output pixel is fully opaque.
/// Flattening an already-opaque image is the identity.
pub fn flatten(image: &RasterImage, background: Color) -> RasterImage {
    RasterImage::from_fn(image.width(), image.height(), |x, y| {
        flatten_pixel(image.pixel(x, y), background)
    })
}

/// [`flatten`] against opaque white, the conventional background for
/// alpha-less document formats.
pub fn flatten_white(image: &RasterImage) -> RasterImage {
    flatten(image, Color::WHITE)
}

/// Composites one straight-alpha pixel onto an opaque background.
#[inline]
fn flatten_pixel(src: Color, background: Color) -> Color {
    let a = u32::from(src.a);
    if a == 255 {
        return Color::rgb(src.r, src.g, src.b);
    }
    let inv = 255 - a;
    let ch = |s: u8, b: u8| ((u32::from(s) * a + u32::from(b) * inv + 127) / 255) as u8;
    Color::rgb(
        ch(src.r, background.r),
        ch(src.g, background.g),
        ch(src.b, background.b),
    )
}

/// Marker color and tolerance for color-key transparency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorKeySpec {
    /// The color to key out. Its alpha is ignored.
    pub marker_color: Color,
    /// Matching tolerance; 0 requires an exact RGB match.
    pub tolerance: u32,
}

impl ColorKeySpec {
    /// Creates a spec for an exact-match key.
    pub const fn exact(marker_color: Color) -> Self {
        ColorKeySpec {
            marker_color,
            tolerance: 0,
        }
    }

    /// Creates a spec with the given tolerance.
    pub const fn with_tolerance(marker_color: Color, tolerance: u32) -> Self {
        ColorKeySpec {
            marker_color,
            tolerance,
        }
    }

    /// The squared-distance threshold, `tolerance^2 * 3`.
    #[inline]
    pub const fn threshold(&self) -> u32 {
        self.tolerance * self.tolerance * 3
    }
}

/// The color-key filter as a pure per-pixel function.
///
/// - With `tolerance == 0`, only an exact RGB match (alpha-agnostic) is
///   keyed transparent.
/// - With `tolerance > 0`, a fully opaque pixel whose squared RGB
///   distance to the marker is `<= tolerance^2 * 3` is keyed
///   transparent.
///
/// A keyed pixel keeps its RGB channels and gets alpha 0; everything
/// else passes through unchanged.
#[inline]
pub fn key_pixel(spec: &ColorKeySpec, px: Color) -> Color {
    let keyed = if spec.tolerance == 0 {
        px.r == spec.marker_color.r
            && px.g == spec.marker_color.g
            && px.b == spec.marker_color.b
    } else {
        px.is_opaque() && px.distance_sq(&spec.marker_color) <= spec.threshold()
    };
    if keyed {
        Color::new(px.r, px.g, px.b, 0)
    } else {
        px
    }
}

/// A lazily color-keyed view of a source image.
///
/// Holds a borrow of the source and the key spec; pixels are filtered
/// on read. Obtain one from [`key_out_color`].
#[derive(Debug, Clone, Copy)]
pub struct ColorKeyed<'a> {
    image: &'a RasterImage,
    spec: ColorKeySpec,
}

impl ColorKeyed<'_> {
    /// Output width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Output height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Iterates over filtered pixels in row-major order without
    /// materializing a buffer.
    pub fn pixels(&self) -> impl Iterator<Item = Color> + '_ {
        self.image.pixels().map(|px| key_pixel(&self.spec, px))
    }

    /// Forces materialization into a fresh image.
    pub fn to_image(&self) -> RasterImage {
        RasterImage::from_fn(self.width(), self.height(), |x, y| {
            key_pixel(&self.spec, self.image.pixel(x, y))
        })
    }
}

/// Creates a lazily-filtered view that keys `spec.marker_color` out of
/// the image.
pub fn key_out_color<'a>(image: &'a RasterImage, spec: ColorKeySpec) -> ColorKeyed<'a> {
    ColorKeyed { image, spec }
}
