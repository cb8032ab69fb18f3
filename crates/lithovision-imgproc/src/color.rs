use crate::parallel;
use lithovision_image::{Image, ImageError};

/// Convert a RGB8 image to RGBA8 with a fully opaque alpha channel.
///
/// # Arguments
///
/// * `src` - The input RGB8 image.
/// * `dst` - The output RGBA8 image with the same size.
pub fn rgba_from_rgb(src: &Image<u8, 3>, dst: &mut Image<u8, 4>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        dst_pixel[..3].copy_from_slice(src_pixel);
        dst_pixel[3] = 255;
    });

    Ok(())
}

/// Convert a RGBA8 image to RGB8 by dropping the alpha channel.
///
/// # Arguments
///
/// * `src` - The input RGBA8 image.
/// * `dst` - The output RGB8 image with the same size.
pub fn rgb_from_rgba(src: &Image<u8, 4>, dst: &mut Image<u8, 3>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        dst_pixel.copy_from_slice(&src_pixel[..3]);
    });

    Ok(())
}
