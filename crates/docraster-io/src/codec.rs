//! Serialization of images to encoded byte sequences and files.
//!
//! PNG is the embedding format (lossless, alpha-capable); JPEG is
//! supported for callers that ask for it and carries no alpha, so
//! non-opaque input is composited onto white during encoding.
//!
//! Write failures are logged and returned as typed errors; callers can
//! always distinguish success from failure.

use crate::{IoError, IoResult};
use docraster_core::RasterImage;
use std::path::Path;
use tracing::warn;

/// JPEG quality used by [`save_to_file`].
const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Encoder-supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// Lossless PNG with alpha.
    Png,
    /// Lossy JPEG, no alpha.
    Jpeg,
}

impl ImageFormat {
    /// Maps a file extension (case-insensitive) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            _ => None,
        }
    }
}

/// Picks the output format from a path's extension.
///
/// # Errors
///
/// [`IoError::UnsupportedFormat`] for extensions no encoder supports.
pub fn format_for_path(path: &Path) -> IoResult<ImageFormat> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    ImageFormat::from_extension(ext).ok_or_else(|| IoError::UnsupportedFormat(ext.to_string()))
}

/// Serializes the canonical RGBA8 buffer to a PNG byte sequence.
///
/// # Errors
///
/// [`IoError::EncodeError`] on encoder failure; the failure is logged
/// before it is returned.
pub fn encode_png(image: &RasterImage) -> IoResult<Vec<u8>> {
    let mut out = Vec::new();
    let mut encoder = png::Encoder::new(&mut out, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::default());
    encoder.set_source_srgb(png::SrgbRenderingIntent::Perceptual);

    let result = encoder
        .write_header()
        .and_then(|mut writer| {
            writer.write_image_data(image.as_bytes())?;
            writer.finish()
        })
        .map_err(|e| IoError::EncodeError(e.to_string()));

    if let Err(err) = result {
        warn!(error = %err, "PNG encode failed");
        return Err(err);
    }
    Ok(out)
}

/// Serializes the image to a JPEG byte sequence.
///
/// JPEG has no alpha channel, so pixels are composited onto opaque
/// white as they are converted to RGB.
pub fn encode_jpeg(image: &RasterImage, quality: u8) -> IoResult<Vec<u8>> {
    let (w, h) = image.dimensions();
    if w > u32::from(u16::MAX) || h > u32::from(u16::MAX) {
        return Err(IoError::EncodeError(format!(
            "image {w}x{h} exceeds JPEG dimension limit"
        )));
    }

    let rgb: Vec<u8> = image
        .as_bytes()
        .chunks_exact(4)
        .flat_map(|p| {
            let a = u32::from(p[3]);
            let inv = 255 - a;
            let ch = |c: u8| ((u32::from(c) * a + 255 * inv + 127) / 255) as u8;
            [ch(p[0]), ch(p[1]), ch(p[2])]
        })
        .collect();

    let mut out = Vec::new();
    let encoder = jpeg_encoder::Encoder::new(&mut out, quality);
    encoder
        .encode(&rgb, w as u16, h as u16, jpeg_encoder::ColorType::Rgb)
        .map_err(|e| {
            warn!(error = %e, "JPEG encode failed");
            IoError::EncodeError(e.to_string())
        })?;
    Ok(out)
}

/// Encodes the image in the requested format and writes it to `path`.
///
/// Returns an explicit result: encode and write failures are logged at
/// warn and propagated as typed errors rather than being swallowed.
pub fn save_to_file<P: AsRef<Path>>(
    image: &RasterImage,
    path: P,
    format: ImageFormat,
) -> IoResult<()> {
    let path = path.as_ref();
    let bytes = match format {
        ImageFormat::Png => encode_png(image)?,
        ImageFormat::Jpeg => encode_jpeg(image, DEFAULT_JPEG_QUALITY)?,
    };

    std::fs::write(path, bytes).map_err(|e| {
        warn!(path = %path.display(), error = %e, "image write failed");
        IoError::Io(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquire::decode_png;
    use docraster_core::Color;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ImageFormat::from_extension("png"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_extension("PNG"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_extension("jpg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("bmp"), None);
    }

    #[test]
    fn test_format_for_path() {
        let path = std::path::Path::new("/tmp/out.JPG");
        assert_eq!(format_for_path(path).unwrap(), ImageFormat::Jpeg);

        let bad = std::path::Path::new("/tmp/out.tiff");
        assert!(matches!(
            format_for_path(bad),
            Err(IoError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_png_roundtrip() {
        let src = RasterImage::from_fn(5, 3, |x, y| {
            Color::new(x as u8 * 50, y as u8 * 80, 7, 200)
        });
        let bytes = encode_png(&src).unwrap();
        // PNG signature.
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n']);

        let back = decode_png(&bytes).unwrap();
        assert_eq!(back.dimensions(), (5, 3));
        assert_eq!(back.as_bytes(), src.as_bytes());
    }

    #[test]
    fn test_jpeg_encode_flattens_alpha() {
        let src = RasterImage::filled(4, 4, Color::new(0, 0, 0, 0));
        let bytes = encode_jpeg(&src, 90).unwrap();
        // JPEG SOI marker.
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_save_to_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let src = RasterImage::filled(6, 6, Color::rgb(9, 8, 7));
        save_to_file(&src, &path, ImageFormat::Png).unwrap();

        let back = crate::acquire::from_file(&path).unwrap();
        assert_eq!(back.as_bytes(), src.as_bytes());
    }

    #[test]
    fn test_save_to_unwritable_path_reports_error() {
        let src = RasterImage::filled(2, 2, Color::WHITE);
        let result = save_to_file(&src, "/nonexistent-dir/out.png", ImageFormat::Png);
        assert!(matches!(result, Err(IoError::Io(_))));
    }
}
