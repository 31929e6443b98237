//! Sub-region extraction.

use crate::OpsResult;
use docraster_core::{CropMargins, RasterImage};

/// Extracts the sub-rectangle left after trimming the given margins.
///
/// The retained region is `[left, width - right) x [top, height - bottom)`.
///
/// # Errors
///
/// Reports the out-of-range condition when the margins violate the
/// invariant `left + right < width`, `top + bottom < height`.
pub fn crop(image: &RasterImage, margins: &CropMargins) -> OpsResult<RasterImage> {
    let (w, h) = image.dimensions();
    let region = margins.to_rect(w, h)?;

    let row_bytes = region.width as usize * 4;
    let src_row_bytes = w as usize * 4;
    let x_offset = region.x as usize * 4;

    let mut data = Vec::with_capacity(region.height as usize * row_bytes);
    let src = image.as_bytes();
    for y in region.y..region.bottom() {
        let start = y as usize * src_row_bytes + x_offset;
        data.extend_from_slice(&src[start..start + row_bytes]);
    }

    Ok(RasterImage::from_raw(region.width, region.height, data)?)
}
