use crate::{config::RenderSettings, error::RenderError};
use lithovision_image::{Image, ImageSize};
use lithovision_imgproc::{color, interpolation::InterpolationMode, resize};
use lithovision_io::jpeg;

/// Target size of an upload after normalization.
///
/// Photos within bounds keep their size. Oversized photos are scaled by the
/// smaller of the two per-axis ratios so the result fits both bounds while
/// preserving aspect ratio. Fractional targets are floored.
pub fn normalized_size(size: ImageSize, max_width: usize, max_height: usize) -> ImageSize {
    if size.width <= max_width && size.height <= max_height {
        return size;
    }

    let ratio = (max_width as f64 / size.width as f64).min(max_height as f64 / size.height as f64);

    ImageSize {
        width: ((size.width as f64 * ratio) as usize).max(1),
        height: ((size.height as f64 * ratio) as usize).max(1),
    }
}

/// Normalize a freshly uploaded photo into the working copy.
///
/// Oversized photos are downscaled per [`normalized_size`]. The photo is
/// then passed through a lossy JPEG round trip at `normalize_quality`
/// whether or not it was resized, so downstream stages always see the same
/// compression texture regardless of the upload format.
pub fn normalize_photo(
    photo: &Image<u8, 4>,
    settings: &RenderSettings,
) -> Result<Image<u8, 4>, RenderError> {
    let target = normalized_size(photo.size(), settings.max_width, settings.max_height);

    let scaled = if target != photo.size() {
        log::debug!("downscaling upload {} -> {}", photo.size(), target);
        let mut dst = Image::from_size_val(target, 0)?;
        resize::resize_fast(photo, &mut dst, InterpolationMode::Bilinear)?;
        dst
    } else {
        photo.clone()
    };

    let mut rgb = Image::from_size_val(scaled.size(), 0)?;
    color::rgb_from_rgba(&scaled, &mut rgb)?;

    let encoded = jpeg::encode_image_jpeg_rgb8(&rgb, settings.normalize_quality)?;
    let decoded = jpeg::decode_image_jpeg_rgb8(&encoded)?;

    let mut working = Image::from_size_val(decoded.size(), 0)?;
    color::rgba_from_rgb(&decoded, &mut working)?;
    Ok(working)
}
