//! Image acquisition from a file, a URL, or the platform clipboard.
//!
//! Every acquisition path normalizes its input to the canonical RGBA8
//! [`RasterImage`] buffer, so downstream transforms never see another
//! representation.
//!
//! File decoding tolerates transient decoder faults on malformed files
//! by retrying up to [`DECODE_RETRY_ATTEMPTS`] times. URL fetches run
//! with a bounded deadline and are not retried. The clipboard is
//! accessed through the injectable [`ClipboardProvider`] capability so
//! the acquisition path stays testable without a display session; each
//! call takes a fresh snapshot, nothing is cached.

use crate::{IoError, IoResult};
use docraster_core::RasterImage;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Sequential decode attempts for a file before giving up.
pub const DECODE_RETRY_ATTEMPTS: usize = 3;

/// Default deadline for a URL fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Loads an image from a local file path.
///
/// Decoding is retried up to [`DECODE_RETRY_ATTEMPTS`] times,
/// sequentially and without backoff, which covers known transient
/// decoder faults on malformed files. Retries abort early on success.
///
/// # Errors
///
/// - [`IoError::NotAFile`] when the path does not reference an existing
///   regular file (no decode is attempted)
/// - [`IoError::DecodeError`] when every decode attempt fails
pub fn from_file<P: AsRef<Path>>(path: P) -> IoResult<RasterImage> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(IoError::NotAFile(path.to_path_buf()));
    }

    let bytes = std::fs::read(path)?;
    let mut last_err = IoError::DecodeError("empty file".into());
    for attempt in 1..=DECODE_RETRY_ATTEMPTS {
        match decode_png(&bytes) {
            Ok(image) => {
                if attempt > 1 {
                    debug!(attempt, path = %path.display(), "decode recovered after retry");
                }
                return Ok(image);
            }
            Err(err) => {
                debug!(attempt, path = %path.display(), error = %err, "decode attempt failed");
                last_err = err;
            }
        }
    }
    Err(last_err)
}

/// Checks whether the input string looks like a fetchable URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Loads an image from a URL with the default deadline.
///
/// Malformed URLs fail immediately; network and decode failures are not
/// retried.
pub fn from_url(url: &str) -> IoResult<RasterImage> {
    from_url_with_timeout(url, DEFAULT_FETCH_TIMEOUT)
}

/// Loads an image from a URL, bounding the whole fetch by `timeout`.
pub fn from_url_with_timeout(url: &str, timeout: Duration) -> IoResult<RasterImage> {
    if !is_url(url) {
        return Err(IoError::InvalidUrl(url.to_string()));
    }

    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| IoError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client
        .get(url)
        .send()
        .map_err(|e| IoError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    if !response.status().is_success() {
        return Err(IoError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response.bytes().map_err(|e| IoError::DownloadFailed {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    decode_png(&bytes)
}

/// Decodes PNG bytes into the canonical RGBA8 buffer.
///
/// Grayscale, gray-alpha, and RGB inputs at 8 or 16 bits are all
/// normalized to interleaved 8-bit RGBA.
pub fn decode_png(bytes: &[u8]) -> IoResult<RasterImage> {
    let decoder = png::Decoder::new(std::io::Cursor::new(bytes));
    let mut reader = decoder
        .read_info()
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

    let width = info.width;
    let height = info.height;
    let data = &buf[..info.buffer_size()];

    let rgba: Vec<u8> = match (info.color_type, info.bit_depth) {
        (png::ColorType::Rgba, png::BitDepth::Eight) => data.to_vec(),
        (png::ColorType::Rgb, png::BitDepth::Eight) => {
            data.chunks(3).flat_map(|p| [p[0], p[1], p[2], 255]).collect()
        }
        (png::ColorType::Grayscale, png::BitDepth::Eight) => {
            data.iter().flat_map(|&g| [g, g, g, 255]).collect()
        }
        (png::ColorType::GrayscaleAlpha, png::BitDepth::Eight) => {
            data.chunks(2).flat_map(|ga| [ga[0], ga[0], ga[0], ga[1]]).collect()
        }
        (png::ColorType::Rgba, png::BitDepth::Sixteen) => take_high_bytes(data),
        (png::ColorType::Rgb, png::BitDepth::Sixteen) => {
            let rgb = take_high_bytes(data);
            rgb.chunks(3).flat_map(|p| [p[0], p[1], p[2], 255]).collect()
        }
        (color_type, bit_depth) => {
            return Err(IoError::DecodeError(format!(
                "unsupported PNG layout: {color_type:?} {bit_depth:?}"
            )));
        }
    };

    Ok(RasterImage::from_raw(width, height, rgba)?)
}

/// Reduces big-endian 16-bit samples to their high bytes.
fn take_high_bytes(data: &[u8]) -> Vec<u8> {
    data.chunks(2).map(|s| s[0]).collect()
}

/// An image payload lifted off the platform clipboard.
#[derive(Debug, Clone)]
pub struct ClipboardPayload {
    /// Payload width in pixels.
    pub width: u32,
    /// Payload height in pixels.
    pub height: u32,
    /// Interleaved RGBA8 bytes, `width * height * 4` of them.
    pub bytes: Vec<u8>,
}

/// Capability for reading an image representation off a clipboard.
///
/// The platform clipboard is a process-wide shared resource; hiding it
/// behind this trait keeps the acquisition path testable without a real
/// display session and lets callers inject fakes.
pub trait ClipboardProvider {
    /// Takes a fresh snapshot of the clipboard's image content.
    ///
    /// # Errors
    ///
    /// [`IoError::UnsupportedPayload`] when the clipboard does not
    /// expose an image representation or extraction fails.
    fn image_payload(&self) -> IoResult<ClipboardPayload>;
}

/// Acquires an image from the given clipboard provider.
pub fn from_clipboard(provider: &dyn ClipboardProvider) -> IoResult<RasterImage> {
    let payload = provider.image_payload()?;
    RasterImage::from_raw(payload.width, payload.height, payload.bytes).map_err(|e| {
        IoError::UnsupportedPayload(format!("clipboard image layout invalid: {e}"))
    })
}

/// The real system clipboard, read through arboard.
#[cfg(feature = "clipboard")]
#[derive(Debug, Default)]
pub struct SystemClipboard;

#[cfg(feature = "clipboard")]
impl ClipboardProvider for SystemClipboard {
    fn image_payload(&self) -> IoResult<ClipboardPayload> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| IoError::UnsupportedPayload(format!("clipboard unavailable: {e}")))?;
        let image = clipboard
            .get_image()
            .map_err(|e| IoError::UnsupportedPayload(format!("no image representation: {e}")))?;
        Ok(ClipboardPayload {
            width: image.width as u32,
            height: image.height as u32,
            bytes: image.bytes.into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docraster_core::Color;

    struct FakeClipboard(Option<ClipboardPayload>);

    impl ClipboardProvider for FakeClipboard {
        fn image_payload(&self) -> IoResult<ClipboardPayload> {
            self.0
                .clone()
                .ok_or_else(|| IoError::UnsupportedPayload("no image on clipboard".into()))
        }
    }

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/a.png"));
        assert!(is_url("http://example.com/a.png"));
        assert!(!is_url("ftp://example.com/a.png"));
        assert!(!is_url("/tmp/a.png"));
        assert!(!is_url("not a url"));
    }

    #[test]
    fn test_from_url_rejects_malformed() {
        assert!(matches!(
            from_url("definitely not a url"),
            Err(IoError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_from_file_missing_path() {
        let err = from_file("/nonexistent/image.png");
        assert!(matches!(err, Err(IoError::NotAFile(_))));
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(matches!(
            decode_png(b"this is not a png"),
            Err(IoError::DecodeError(_))
        ));
    }

    #[test]
    fn test_from_clipboard_payload() {
        let red = Color::rgb(200, 16, 16);
        let bytes: Vec<u8> = std::iter::repeat_n(red.to_array(), 4).flatten().collect();
        let provider = FakeClipboard(Some(ClipboardPayload {
            width: 2,
            height: 2,
            bytes,
        }));
        let image = from_clipboard(&provider).unwrap();
        assert_eq!(image.dimensions(), (2, 2));
        assert_eq!(image.pixel(1, 1), red);
    }

    #[test]
    fn test_from_clipboard_without_image() {
        let provider = FakeClipboard(None);
        assert!(matches!(
            from_clipboard(&provider),
            Err(IoError::UnsupportedPayload(_))
        ));
    }

    #[test]
    fn test_from_clipboard_bad_length() {
        let provider = FakeClipboard(Some(ClipboardPayload {
            width: 2,
            height: 2,
            bytes: vec![0u8; 15],
        }));
        assert!(matches!(
            from_clipboard(&provider),
            Err(IoError::UnsupportedPayload(_))
        ));
    }
}
