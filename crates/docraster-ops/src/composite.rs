//! Mask compositing, soft-clipped corners, and border strokes.
//!
//! # Operations
//!
//! - [`source_atop`] - Porter-Duff source-atop of two images
//! - [`rounded_corners`] - two-pass soft clip against an antialiased
//!   rounded-rectangle mask
//! - [`add_border`] - grow the canvas and stroke a border around the
//!   inset image
//! - [`draw_rectangle`] - stroke an outline rectangle onto a copy of
//!   the image
//!
//! All operations return fresh images; sources are never mutated.

use crate::mask::{self, RectF};
use crate::{OpsError, OpsResult};
use docraster_core::{Color, RasterImage, Rect};
use tracing::debug;

/// Border stroke parameters for [`add_border`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderSpec {
    /// Stroke color.
    pub color: Color,
    /// Stroke width in pixels; the canvas grows by twice this amount.
    pub width: u32,
    /// Corner radius; 0 strokes a plain rectangle.
    pub corner_radius: u32,
}

impl BorderSpec {
    /// Creates a border spec with square corners.
    pub const fn new(color: Color, width: u32) -> Self {
        BorderSpec {
            color,
            width,
            corner_radius: 0,
        }
    }

    /// Sets the corner radius.
    pub const fn with_corner_radius(mut self, corner_radius: u32) -> Self {
        self.corner_radius = corner_radius;
        self
    }
}

/// Outline parameters for [`draw_rectangle`].
///
/// When `color` is `None` the outline color is derived by inverting the
/// RGB bits of the pixel at the rectangle's center.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutlineSpec {
    /// Stroke color; `None` selects the auto-contrast fallback.
    pub color: Option<Color>,
    /// Stroke width in pixels.
    pub width: u32,
    /// Corner radius; 0 strokes a plain rectangle.
    pub corner_radius: u32,
}

/// Porter-Duff source-atop for a single pixel pair.
///
/// The source replaces the mask wherever the mask is visible and
/// inherits the mask's alpha shape: `out.a = mask.a`, and the color is
/// the source blended onto the mask color by the source's own alpha.
#[inline]
pub fn source_atop_pixel(src: Color, dst: Color) -> Color {
    if dst.a == 0 {
        return Color::TRANSPARENT;
    }
    let sa = u32::from(src.a);
    let inv = 255 - sa;
    let ch = |s: u8, d: u8| ((u32::from(s) * sa + u32::from(d) * inv + 127) / 255) as u8;
    Color::new(
        ch(src.r, dst.r),
        ch(src.g, dst.g),
        ch(src.b, dst.b),
        dst.a,
    )
}

/// Straight-alpha over for a single pixel pair, used to lay strokes
/// onto a canvas.
#[inline]
pub fn over_pixel(src: Color, dst: Color) -> Color {
    let sa = u32::from(src.a);
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }
    let da = u32::from(dst.a);
    let out_a = sa * 255 + da * (255 - sa); // scaled by 255
    if out_a == 0 {
        return Color::TRANSPARENT;
    }
    let ch = |s: u8, d: u8| {
        let num = u32::from(s) * sa * 255 + u32::from(d) * da * (255 - sa);
        ((num + out_a / 2) / out_a) as u8
    };
    Color::new(
        ch(src.r, dst.r),
        ch(src.g, dst.g),
        ch(src.b, dst.b),
        ((out_a + 127) / 255) as u8,
    )
}

/// Composites `src` atop `mask`, pixel by pixel.
///
/// # Errors
///
/// [`OpsError::SizeMismatch`] when the two images differ in dimensions.
pub fn source_atop(src: &RasterImage, mask: &RasterImage) -> OpsResult<RasterImage> {
    if src.dimensions() != mask.dimensions() {
        return Err(OpsError::SizeMismatch(format!(
            "src {}x{}, mask {}x{}",
            src.width(),
            src.height(),
            mask.width(),
            mask.height()
        )));
    }
    Ok(RasterImage::from_fn(src.width(), src.height(), |x, y| {
        source_atop_pixel(src.pixel(x, y), mask.pixel(x, y))
    }))
}

/// Soft-clips an image to a rounded rectangle.
///
/// Two passes: first an antialiased opaque rounded-rect mask spanning
/// the full canvas is rendered (its edge carries graduated alpha), then
/// the source is composited atop it so the mask's alpha channel becomes
/// the visible region's alpha. The result has smooth corners rather
/// than hard per-pixel clipping; radius 0 degenerates to the unclipped
/// rectangle.
pub fn rounded_corners(image: &RasterImage, corner_radius: u32) -> OpsResult<RasterImage> {
    let (w, h) = image.dimensions();
    debug!(w, h, corner_radius, "rounded_corners");

    let canvas = RectF::new(0.0, 0.0, w as f32, h as f32);
    let alpha = mask::fill_mask(w, h, &canvas, corner_radius as f32);
    let mask_image = RasterImage::from_fn(w, h, |x, y| {
        Color::new(255, 255, 255, alpha[y as usize * w as usize + x as usize])
    });

    source_atop(image, &mask_image)
}

/// Draws an image inset on a larger canvas and strokes a border around
/// it.
///
/// The canvas is `width + 2 * spec.width` by `height + 2 * spec.width`;
/// the stroke is centered on the inset boundary, antialiased, with
/// square corners (or rounded when `spec.corner_radius > 0`).
pub fn add_border(image: &RasterImage, spec: &BorderSpec) -> OpsResult<RasterImage> {
    let bw = spec.width;
    let (src_w, src_h) = image.dimensions();
    let out_w = src_w + 2 * bw;
    let out_h = src_h + 2 * bw;
    debug!(out_w, out_h, width = bw, radius = spec.corner_radius, "add_border");

    let stroke = if bw > 0 {
        let half = bw as f32 * 0.5;
        let boundary = RectF::new(half, half, out_w as f32 - half, out_h as f32 - half);
        Some(mask::stroke_mask(
            out_w,
            out_h,
            &boundary,
            spec.corner_radius as f32,
            bw as f32,
        ))
    } else {
        None
    };

    let inset = Rect::new(bw, bw, src_w, src_h);
    Ok(RasterImage::from_fn(out_w, out_h, |x, y| {
        let base = if inset.contains(x, y) {
            image.pixel(x - bw, y - bw)
        } else {
            Color::TRANSPARENT
        };
        match &stroke {
            Some(alpha) => {
                let cov = alpha[y as usize * out_w as usize + x as usize];
                let stroke_px = stroke_color(spec.color, cov);
                over_pixel(stroke_px, base)
            }
            None => base,
        }
    }))
}

/// Strokes an outline rectangle onto a copy of the image.
///
/// `rect` gives the outline position and size in image coordinates.
/// With `spec.color == None` the stroke color is the bitwise RGB
/// inverse of the pixel at the rectangle's center
/// `(rect.x + rect.width / 2, rect.y + rect.height / 2)`.
///
/// # Errors
///
/// Fails when the auto-contrast fallback needs a center pixel that
/// lies outside the image.
pub fn draw_rectangle(image: &RasterImage, rect: Rect, spec: &OutlineSpec) -> OpsResult<RasterImage> {
    let (w, h) = image.dimensions();
    let color = match spec.color {
        Some(c) => c,
        None => {
            let cx = rect.x + rect.width / 2;
            let cy = rect.y + rect.height / 2;
            let inv = image.try_pixel(cx, cy)?.invert_rgb();
            Color::rgb(inv.r, inv.g, inv.b)
        }
    };

    let boundary = RectF::new(
        rect.x as f32,
        rect.y as f32,
        rect.right() as f32,
        rect.bottom() as f32,
    );
    let alpha = mask::stroke_mask(w, h, &boundary, spec.corner_radius as f32, spec.width as f32);

    Ok(RasterImage::from_fn(w, h, |x, y| {
        let cov = alpha[y as usize * w as usize + x as usize];
        over_pixel(stroke_color(color, cov), image.pixel(x, y))
    }))
}

/// Applies a coverage value to a stroke color's alpha.
#[inline]
fn stroke_color(color: Color, coverage: u8) -> Color {
    let a = ((u32::from(color.a) * u32::from(coverage) + 127) / 255) as u8;
    Color::new(color.r, color.g, color.b, a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_atop_pixel() {
        let red = Color::rgb(200, 16, 16);
        // Opaque source over a graduated white mask keeps the source
        // color and inherits the mask alpha.
        let out = source_atop_pixel(red, Color::new(255, 255, 255, 128));
        assert_eq!(out, Color::new(200, 16, 16, 128));
        // Transparent mask clips the source away entirely.
        assert_eq!(source_atop_pixel(red, Color::TRANSPARENT), Color::TRANSPARENT);
    }

    #[test]
    fn test_source_atop_size_mismatch() {
        let a = RasterImage::filled(4, 4, Color::WHITE);
        let b = RasterImage::filled(5, 4, Color::WHITE);
        assert!(matches!(
            source_atop(&a, &b),
            Err(OpsError::SizeMismatch(_))
        ));
    }

    #[test]
    fn test_rounded_corners_radius_zero_keeps_corners_opaque() {
        let src = RasterImage::filled(16, 16, Color::rgb(200, 16, 16));
        let out = rounded_corners(&src, 0).unwrap();
        for &(x, y) in &[(0, 0), (15, 0), (0, 15), (15, 15)] {
            assert_eq!(out.pixel(x, y).a, 255);
            assert_eq!(out.pixel(x, y), Color::rgb(200, 16, 16));
        }
    }

    #[test]
    fn test_rounded_corners_positive_radius_softens_corners() {
        let src = RasterImage::filled(16, 16, Color::rgb(200, 16, 16));
        let out = rounded_corners(&src, 4).unwrap();
        for &(x, y) in &[(0, 0), (15, 0), (0, 15), (15, 15)] {
            assert!(out.pixel(x, y).a < 255, "corner ({x},{y}) still opaque");
        }
        // Interior keeps the source exactly.
        assert_eq!(out.pixel(8, 8), Color::rgb(200, 16, 16));
    }

    #[test]
    fn test_add_border_dimensions_and_ring() {
        let red = Color::rgb(200, 16, 16);
        let src = RasterImage::filled(100, 100, red);
        let spec = BorderSpec::new(Color::BLACK, 5);
        let out = add_border(&src, &spec).unwrap();
        assert_eq!(out.dimensions(), (110, 110));
        // Inside the stroke band.
        assert_eq!(out.pixel(2, 2), Color::BLACK);
        // Interior shows the inset source.
        assert_eq!(out.pixel(55, 55), red);
    }

    #[test]
    fn test_add_border_zero_width_is_identity() {
        let src = RasterImage::filled(9, 7, Color::rgb(1, 2, 3));
        let out = add_border(&src, &BorderSpec::new(Color::BLACK, 0)).unwrap();
        assert_eq!(out.dimensions(), (9, 7));
        assert_eq!(out.as_bytes(), src.as_bytes());
    }

    #[test]
    fn test_draw_rectangle_explicit_color() {
        let src = RasterImage::filled(20, 20, Color::WHITE);
        let spec = OutlineSpec {
            color: Some(Color::BLACK),
            width: 2,
            corner_radius: 0,
        };
        let out = draw_rectangle(&src, Rect::new(5, 5, 10, 10), &spec).unwrap();
        // On the outline.
        assert_eq!(out.pixel(5, 10), Color::BLACK);
        // Inside and outside the outline stay white.
        assert_eq!(out.pixel(10, 10), Color::WHITE);
        assert_eq!(out.pixel(1, 1), Color::WHITE);
    }

    #[test]
    fn test_draw_rectangle_auto_contrast_inverts_center() {
        let teal = Color::rgb(0x12, 0x34, 0x56);
        let src = RasterImage::filled(20, 20, teal);
        let spec = OutlineSpec {
            color: None,
            width: 2,
            corner_radius: 0,
        };
        let out = draw_rectangle(&src, Rect::new(4, 4, 8, 8), &spec).unwrap();
        // Center of the rect is (8, 8); its inverse is the stroke color.
        assert_eq!(out.pixel(4, 8), Color::rgb(0xED, 0xCB, 0xA9));
    }

    #[test]
    fn test_draw_rectangle_center_out_of_bounds() {
        let src = RasterImage::filled(10, 10, Color::WHITE);
        let spec = OutlineSpec {
            color: None,
            width: 1,
            corner_radius: 0,
        };
        let result = draw_rectangle(&src, Rect::new(8, 8, 10, 10), &spec);
        assert!(matches!(result, Err(OpsError::Region(_))));
    }
}
