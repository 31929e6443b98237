//! The owned RGBA8 image buffer.
//!
//! [`RasterImage`] is the single pixel container every component of the
//! toolkit operates on. It is immutable once constructed: transforms
//! consume a borrowed image and return a fresh, independently owned
//! buffer, so no shared mutable pixel state ever crosses a component
//! boundary.
//!
//! # Memory Layout
//!
//! Pixels are stored interleaved in row-major order, top-to-bottom:
//!
//! ```text
//! Memory: [R G B A R G B A ...]  <- Row 0
//!         [R G B A R G B A ...]  <- Row 1
//!         ...
//! ```
//!
//! The buffer length invariant is `data.len() == width * height * 4`,
//! enforced by every constructor.
//!
//! # Usage
//!
//! ```rust
//! use docraster_core::{Color, RasterImage};
//!
//! let img = RasterImage::filled(4, 4, Color::rgb(200, 16, 16));
//! assert_eq!(img.dimensions(), (4, 4));
//! assert_eq!(img.pixel(2, 2), Color::rgb(200, 16, 16));
//! assert!(img.is_opaque());
//! ```

use crate::{Color, Error, Result};
use std::sync::Arc;

/// An immutable, owned RGBA8 raster image.
///
/// The pixel buffer lives in an [`Arc`], so cloning an image is cheap
/// and never copies pixel data. There is no mutable access: producing a
/// modified image means building a new buffer through one of the
/// constructors.
#[derive(Clone)]
pub struct RasterImage {
    /// Pixel data, `width * height * 4` bytes.
    data: Arc<Vec<u8>>,
    /// Image width in pixels.
    width: u32,
    /// Image height in pixels.
    height: u32,
}

impl RasterImage {
    /// Creates a fully transparent image of the given dimensions.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let len = buffer_len(width, height)?;
        Ok(RasterImage {
            data: Arc::new(vec![0u8; len]),
            width,
            height,
        })
    }

    /// Creates an image filled with a single color.
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let count = width as usize * height as usize;
        let mut data = Vec::with_capacity(count * 4);
        for _ in 0..count {
            data.extend_from_slice(&color.to_array());
        }
        RasterImage {
            data: Arc::new(data),
            width,
            height,
        }
    }

    /// Builds an image by evaluating `f` at every pixel coordinate.
    ///
    /// `f` is called in row-major order. This is the primary way
    /// transforms materialize derived images without mutating a shared
    /// buffer.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> Color,
    {
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y).to_array());
            }
        }
        RasterImage {
            data: Arc::new(data),
            width,
            height,
        }
    }

    /// Wraps a raw interleaved RGBA8 buffer.
    ///
    /// Returns [`Error::BufferSizeMismatch`] when the buffer length does
    /// not equal `width * height * 4`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = buffer_len(width, height)?;
        if data.len() != expected {
            return Err(Error::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(RasterImage {
            data: Arc::new(data),
            width,
            height,
        })
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width and height as a tuple.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The raw interleaved RGBA8 bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics when (x, y) is outside the image. Use [`try_pixel`]
    /// (Self::try_pixel) for a checked variant.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) out of bounds for image {}x{}",
            self.width,
            self.height
        );
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        Color::new(
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        )
    }

    /// Returns the pixel at (x, y), or [`Error::OutOfBounds`].
    pub fn try_pixel(&self, x: u32, y: u32) -> Result<Color> {
        if x >= self.width || y >= self.height {
            return Err(Error::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.pixel(x, y))
    }

    /// Iterates over rows as raw `width * 4` byte slices.
    #[inline]
    pub fn rows(&self) -> std::slice::ChunksExact<'_, u8> {
        self.data.chunks_exact(self.width as usize * 4)
    }

    /// Iterates over all pixels in row-major order.
    #[inline]
    pub fn pixels(&self) -> impl Iterator<Item = Color> + '_ {
        self.data
            .chunks_exact(4)
            .map(|p| Color::new(p[0], p[1], p[2], p[3]))
    }

    /// True when every pixel has full alpha.
    pub fn is_opaque(&self) -> bool {
        self.data.chunks_exact(4).all(|p| p[3] == 255)
    }
}

impl std::fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Computes `width * height * 4` with overflow checking.
fn buffer_len(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| Error::InvalidDimensions(format!("image dimensions {width}x{height} overflow")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_invariant() {
        let img = RasterImage::new(3, 2).unwrap();
        assert_eq!(img.as_bytes().len(), 3 * 2 * 4);

        assert!(RasterImage::from_raw(3, 2, vec![0u8; 23]).is_err());
        assert!(RasterImage::from_raw(3, 2, vec![0u8; 24]).is_ok());
    }

    #[test]
    fn test_filled_and_pixel_access() {
        let c = Color::new(10, 20, 30, 40);
        let img = RasterImage::filled(4, 3, c);
        assert_eq!(img.pixel(0, 0), c);
        assert_eq!(img.pixel(3, 2), c);
        assert!(img.try_pixel(4, 0).is_err());
        assert!(!img.is_opaque());
    }

    #[test]
    fn test_from_fn_row_major() {
        let img = RasterImage::from_fn(2, 2, |x, y| Color::new(x as u8, y as u8, 0, 255));
        assert_eq!(img.pixel(1, 0), Color::new(1, 0, 0, 255));
        assert_eq!(img.pixel(0, 1), Color::new(0, 1, 0, 255));
        assert_eq!(img.rows().count(), 2);
    }

    #[test]
    fn test_clone_shares_buffer() {
        let img = RasterImage::filled(8, 8, Color::WHITE);
        let copy = img.clone();
        assert_eq!(img.as_bytes().as_ptr(), copy.as_bytes().as_ptr());
    }
}
