use crate::interpolation::{interpolate_pixel, InterpolationMode};
use crate::parallel;
use fast_image_resize as fr;
use lithovision_image::{Image, ImageDtype, ImageError};

/// Resize an image to a new size.
///
/// The function resizes an image to a new size using the specified
/// interpolation mode. It supports any number of channels and data types.
///
/// # Arguments
///
/// * `src` - The input image container.
/// * `dst` - The output image container, pre-allocated with the target size.
/// * `interpolation` - The interpolation mode to use.
///
/// # Example
///
/// ```
/// use lithovision_image::{Image, ImageSize};
/// use lithovision_imgproc::resize::resize_native;
/// use lithovision_imgproc::interpolation::InterpolationMode;
///
/// let image = Image::<u8, 3>::new(
///     ImageSize {
///         width: 4,
///         height: 5,
///     },
///     vec![0u8; 4 * 5 * 3],
/// )
/// .unwrap();
///
/// let new_size = ImageSize {
///     width: 2,
///     height: 3,
/// };
///
/// let mut image_resized = Image::<u8, 3>::from_size_val(new_size, 0).unwrap();
///
/// resize_native(&image, &mut image_resized, InterpolationMode::Nearest).unwrap();
///
/// assert_eq!(image_resized.num_channels(), 3);
/// assert_eq!(image_resized.size().width, 2);
/// assert_eq!(image_resized.size().height, 3);
/// ```
pub fn resize_native<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    interpolation: InterpolationMode,
) -> Result<(), ImageError>
where
    T: ImageDtype,
{
    if src.as_slice().is_empty() || dst.as_slice().is_empty() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    // map each destination coordinate to the source grid; a single
    // row/column maps to the origin
    let step_x = if dst.width() > 1 {
        (src.width() - 1) as f32 / (dst.width() - 1) as f32
    } else {
        0.0
    };
    let step_y = if dst.height() > 1 {
        (src.height() - 1) as f32 / (dst.height() - 1) as f32
    } else {
        0.0
    };

    parallel::par_iter_rows_indexed(dst, |x, y, dst_pixel| {
        let u = x as f32 * step_x;
        let v = y as f32 * step_y;
        let pixel = interpolate_pixel(src, u, v, interpolation);
        dst_pixel.copy_from_slice(&pixel);
    });

    Ok(())
}

/// Resize a RGBA8 image using the [fast_image_resize](https://crates.io/crates/fast_image_resize) crate.
///
/// # Arguments
///
/// * `src` - The input image container with 4 channels.
/// * `dst` - The output image container, pre-allocated with the target size.
/// * `interpolation` - The interpolation mode to use.
///
/// # Errors
///
/// The function returns an error if the image cannot be resized.
pub fn resize_fast(
    src: &Image<u8, 4>,
    dst: &mut Image<u8, 4>,
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    if src.as_slice().is_empty() || dst.as_slice().is_empty() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let src_len = src.width() * src.height() * 4;
    let src_image = fr::images::ImageRef::new(
        src.width() as u32,
        src.height() as u32,
        src.as_slice(),
        fr::PixelType::U8x4,
    )
    .map_err(|_| ImageError::InvalidChannelShape(src.as_slice().len(), src_len))?;

    let dst_len = dst.width() * dst.height() * 4;
    let (dst_cols, dst_rows) = (dst.cols(), dst.rows());
    let mut dst_image = fr::images::Image::from_slice_u8(
        dst_cols as u32,
        dst_rows as u32,
        dst.as_slice_mut(),
        fr::PixelType::U8x4,
    )
    .map_err(|_| ImageError::InvalidChannelShape(dst_len, dst_len))?;

    let options = fr::ResizeOptions::new().resize_alg(match interpolation {
        InterpolationMode::Bilinear => fr::ResizeAlg::Convolution(fr::FilterType::Bilinear),
        InterpolationMode::Nearest => fr::ResizeAlg::Nearest,
    });

    let mut resizer = fr::Resizer::new();
    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|_| ImageError::CastError)?;

    Ok(())
}
