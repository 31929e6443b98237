//! Image resampling to new dimensions.
//!
//! Applies a 2-D affine scale with independent X/Y factors using a
//! selectable interpolation kernel.
//!
//! # Kernels
//!
//! - [`Kernel::Nearest`] - Fastest, no interpolation (blocky)
//! - [`Kernel::Bilinear`] - Linear interpolation (smooth, the default)
//! - [`Kernel::Bicubic`] - Catmull-Rom cubic (sharper than bilinear)
//!
//! # Example
//!
//! ```rust
//! use docraster_core::{Color, RasterImage};
//! use docraster_ops::scale::{scale, Kernel, ScaleRequest};
//!
//! let src = RasterImage::filled(10, 10, Color::rgb(200, 16, 16));
//! let out = scale(&src, &ScaleRequest::new(20, 20)).unwrap();
//! assert_eq!(out.dimensions(), (20, 20));
//! ```

use crate::{OpsError, OpsResult};
use docraster_core::RasterImage;

/// Interpolation kernel for resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Kernel {
    /// Nearest-neighbor (fastest, no interpolation).
    Nearest,
    /// Bilinear interpolation (smooth, fast).
    #[default]
    Bilinear,
    /// Bicubic interpolation (sharper than bilinear).
    Bicubic,
}

impl Kernel {
    /// Returns the support radius for this kernel.
    #[inline]
    pub fn support(&self) -> f32 {
        match self {
            Kernel::Nearest => 0.5,
            Kernel::Bilinear => 1.0,
            Kernel::Bicubic => 2.0,
        }
    }

    /// Evaluates the kernel at position x.
    #[inline]
    pub fn weight(&self, x: f32) -> f32 {
        match self {
            Kernel::Nearest => nearest_weight(x),
            Kernel::Bilinear => bilinear_weight(x),
            Kernel::Bicubic => bicubic_weight(x),
        }
    }
}

/// Nearest-neighbor weight function.
#[inline]
fn nearest_weight(x: f32) -> f32 {
    if x.abs() < 0.5 { 1.0 } else { 0.0 }
}

/// Bilinear (triangle) weight function.
#[inline]
fn bilinear_weight(x: f32) -> f32 {
    let ax = x.abs();
    if ax < 1.0 { 1.0 - ax } else { 0.0 }
}

/// Bicubic (Catmull-Rom) weight function.
#[inline]
fn bicubic_weight(x: f32) -> f32 {
    // Catmull-Rom: B=0, C=0.5
    const B: f32 = 0.0;
    const C: f32 = 0.5;

    let ax = x.abs();
    if ax < 1.0 {
        ((12.0 - 9.0 * B - 6.0 * C) * ax * ax * ax
            + (-18.0 + 12.0 * B + 6.0 * C) * ax * ax
            + (6.0 - 2.0 * B))
            / 6.0
    } else if ax < 2.0 {
        ((-B - 6.0 * C) * ax * ax * ax
            + (6.0 * B + 30.0 * C) * ax * ax
            + (-12.0 * B - 48.0 * C) * ax
            + (8.0 * B + 24.0 * C))
            / 6.0
    } else {
        0.0
    }
}

/// Target dimensions and kernel for a scale operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleRequest {
    /// Output width in pixels, must be > 0.
    pub target_width: u32,
    /// Output height in pixels, must be > 0.
    pub target_height: u32,
    /// Interpolation kernel.
    pub kernel: Kernel,
}

impl ScaleRequest {
    /// Creates a request with the default (bilinear) kernel.
    pub const fn new(target_width: u32, target_height: u32) -> Self {
        ScaleRequest {
            target_width,
            target_height,
            kernel: Kernel::Bilinear,
        }
    }

    /// Sets the interpolation kernel.
    pub const fn with_kernel(mut self, kernel: Kernel) -> Self {
        self.kernel = kernel;
        self
    }
}

/// Resamples an image to the requested dimensions.
///
/// Scale factors are computed independently per axis as
/// `target / source`. The output buffer dimensions equal the request's
/// target dimensions exactly.
///
/// # Errors
///
/// [`OpsError::InvalidDimensions`] when either target dimension is zero
/// or the source image is empty.
pub fn scale(image: &RasterImage, request: &ScaleRequest) -> OpsResult<RasterImage> {
    let (src_w, src_h) = image.dimensions();
    let (dst_w, dst_h) = (request.target_width, request.target_height);

    if dst_w == 0 || dst_h == 0 {
        return Err(OpsError::InvalidDimensions(
            "target size must be > 0".into(),
        ));
    }
    if src_w == 0 || src_h == 0 {
        return Err(OpsError::InvalidDimensions("source image is empty".into()));
    }

    tracing::debug!(src_w, src_h, dst_w, dst_h, kernel = ?request.kernel, "scale");

    let src: Vec<f32> = image.as_bytes().iter().map(|&b| b as f32).collect();

    // Two-pass separable resample: horizontal then vertical.
    let temp = resample_axis(
        &src,
        src_w as usize,
        src_h as usize,
        dst_w as usize,
        request.kernel,
        Axis::Horizontal,
    );
    let out = resample_axis(
        &temp,
        dst_w as usize,
        src_h as usize,
        dst_h as usize,
        request.kernel,
        Axis::Vertical,
    );

    let bytes: Vec<u8> = out
        .iter()
        .map(|&v| v.round().clamp(0.0, 255.0) as u8)
        .collect();
    Ok(RasterImage::from_raw(dst_w, dst_h, bytes)?)
}

/// Scale directions for the separable passes.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

/// Resamples one axis of an interleaved RGBA f32 buffer.
///
/// For [`Axis::Horizontal`] the buffer is `src_len x rows`, resampled to
/// `dst_len x rows`. For [`Axis::Vertical`] it is `rows x src_len`
/// (width x height), resampled to `rows x dst_len`.
fn resample_axis(
    src: &[f32],
    width: usize,
    height: usize,
    dst_len: usize,
    kernel: Kernel,
    axis: Axis,
) -> Vec<f32> {
    let src_len = match axis {
        Axis::Horizontal => width,
        Axis::Vertical => height,
    };
    let (dst_w, dst_h) = match axis {
        Axis::Horizontal => (dst_len, height),
        Axis::Vertical => (width, dst_len),
    };

    let scale = src_len as f32 / dst_len as f32;
    let support = kernel.support() * scale.max(1.0);
    let filter_scale = scale.max(1.0);

    let mut dst = vec![0.0f32; dst_w * dst_h * 4];
    for_each_row(&mut dst, dst_w * 4, |out_y, row| {
        for out_x in 0..dst_w {
            let (row_idx, pos) = match axis {
                Axis::Horizontal => (out_y, out_x),
                Axis::Vertical => (out_x, out_y),
            };

            // Map destination position to source position.
            let center = (pos as f32 + 0.5) * scale - 0.5;
            let left = ((center - support).floor().max(0.0)) as usize;
            let right = ((center + support).ceil() as usize).min(src_len - 1);

            let mut sum = [0.0f32; 4];
            let mut weight_sum = 0.0f32;
            for tap in left..=right {
                let w = kernel.weight((tap as f32 - center) / filter_scale);
                if w == 0.0 {
                    continue;
                }
                weight_sum += w;
                let src_idx = match axis {
                    Axis::Horizontal => (row_idx * width + tap) * 4,
                    Axis::Vertical => (tap * width + row_idx) * 4,
                };
                for c in 0..4 {
                    sum[c] += src[src_idx + c] * w;
                }
            }

            let dst_idx = out_x * 4;
            if weight_sum > 0.0 {
                for c in 0..4 {
                    row[dst_idx + c] = sum[c] / weight_sum;
                }
            } else {
                // Degenerate tap window (exact half-texel tie): fall back
                // to the nearest source sample.
                let tap = (center.round().max(0.0) as usize).min(src_len - 1);
                let src_idx = match axis {
                    Axis::Horizontal => (row_idx * width + tap) * 4,
                    Axis::Vertical => (tap * width + row_idx) * 4,
                };
                row[dst_idx..dst_idx + 4].copy_from_slice(&src[src_idx..src_idx + 4]);
            }
        }
    });
    dst
}

/// Applies `f` to every `row_len` chunk of `dst`, in parallel when the
/// `parallel` feature is enabled.
fn for_each_row<F>(dst: &mut [f32], row_len: usize, f: F)
where
    F: Fn(usize, &mut [f32]) + Sync,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        dst.par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| f(y, row));
    }
    #[cfg(not(feature = "parallel"))]
    {
        for (y, row) in dst.chunks_mut(row_len).enumerate() {
            f(y, row);
        }
    }
}

/// Calculates dimensions that fit inside a bounding box while keeping
/// the source aspect ratio.
///
/// # Example
///
/// ```rust
/// use docraster_ops::scale::fit_dimensions;
///
/// assert_eq!(fit_dimensions(1920, 1080, 640, 640), (640, 360));
/// ```
pub fn fit_dimensions(src_w: u32, src_h: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    let scale_w = max_w as f32 / src_w as f32;
    let scale_h = max_h as f32 / src_h as f32;
    let scale = scale_w.min(scale_h);

    let new_w = ((src_w as f32 * scale).round() as u32).max(1);
    let new_h = ((src_h as f32 * scale).round() as u32).max(1);

    (new_w, new_h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use docraster_core::Color;

    #[test]
    fn test_kernel_weights() {
        assert_abs_diff_eq!(Kernel::Nearest.weight(0.0), 1.0);
        assert_abs_diff_eq!(Kernel::Nearest.weight(0.6), 0.0);

        assert_abs_diff_eq!(Kernel::Bilinear.weight(0.0), 1.0);
        assert_abs_diff_eq!(Kernel::Bilinear.weight(0.5), 0.5);

        // Catmull-Rom interpolates: 1 at 0, 0 at integer offsets.
        assert_abs_diff_eq!(Kernel::Bicubic.weight(0.0), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(Kernel::Bicubic.weight(1.0), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(Kernel::Bicubic.weight(2.0), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_target_fails() {
        let src = RasterImage::filled(4, 4, Color::WHITE);
        assert!(scale(&src, &ScaleRequest::new(0, 8)).is_err());
        assert!(scale(&src, &ScaleRequest::new(8, 0)).is_err());
    }

    #[test]
    fn test_output_dimensions_exact() {
        let src = RasterImage::filled(10, 7, Color::rgb(1, 2, 3));
        for kernel in [Kernel::Nearest, Kernel::Bilinear, Kernel::Bicubic] {
            let out = scale(&src, &ScaleRequest::new(23, 5).with_kernel(kernel)).unwrap();
            assert_eq!(out.dimensions(), (23, 5));
        }
    }

    #[test]
    fn test_uniform_upscale_preserves_color() {
        let red = Color::rgb(200, 16, 16);
        let src = RasterImage::filled(10, 10, red);
        let out = scale(&src, &ScaleRequest::new(20, 20)).unwrap();
        assert_eq!(out.dimensions(), (20, 20));
        // Every pixel of a uniform source stays exact, corners included.
        assert_eq!(out.pixel(0, 0), red);
        assert_eq!(out.pixel(19, 0), red);
        assert_eq!(out.pixel(0, 19), red);
        assert_eq!(out.pixel(19, 19), red);
    }

    #[test]
    fn test_downscale_averages() {
        // 2x1 black/white downscaled to 1x1 lands mid-gray under bilinear.
        let src = RasterImage::from_fn(2, 1, |x, _| {
            if x == 0 { Color::BLACK } else { Color::WHITE }
        });
        let out = scale(&src, &ScaleRequest::new(1, 1)).unwrap();
        let p = out.pixel(0, 0);
        assert!((i32::from(p.r) - 128).abs() <= 1);
    }

    #[test]
    fn test_fit_dimensions() {
        assert_eq!(fit_dimensions(1920, 1080, 640, 640), (640, 360));
        assert_eq!(fit_dimensions(1080, 1920, 640, 640), (360, 640));
        assert_eq!(fit_dimensions(320, 240, 640, 480), (640, 480));
    }
}
