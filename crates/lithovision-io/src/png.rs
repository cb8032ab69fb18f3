use crate::error::IoError;
use lithovision_image::{Image, ImageSize};
use png::{BitDepth, ColorType, Decoder};

/// Decodes a PNG image with three channels (rgb8) from raw bytes.
///
/// The output size is taken from the PNG header.
///
/// # Arguments
///
/// - `bytes` - Raw bytes of the PNG file.
pub fn decode_image_png_rgb8(bytes: &[u8]) -> Result<Image<u8, 3>, IoError> {
    let (buf, size) = decode_png_impl(bytes, ColorType::Rgb)?;
    Ok(Image::new(size, buf)?)
}

/// Decodes a PNG image with four channels (rgba8) from raw bytes.
///
/// The output size is taken from the PNG header.
///
/// # Arguments
///
/// - `bytes` - Raw bytes of the PNG file.
pub fn decode_image_png_rgba8(bytes: &[u8]) -> Result<Image<u8, 4>, IoError> {
    let (buf, size) = decode_png_impl(bytes, ColorType::Rgba)?;
    Ok(Image::new(size, buf)?)
}

/// Reads the color type of a PNG byte stream from its header.
pub fn png_color_type(bytes: &[u8]) -> Result<ColorType, IoError> {
    let reader = Decoder::new(bytes)
        .read_info()
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;
    Ok(reader.info().color_type)
}

// utility function to decode png files from raw bytes
fn decode_png_impl(bytes: &[u8], color_type: ColorType) -> Result<(Vec<u8>, ImageSize), IoError> {
    let mut reader = Decoder::new(bytes)
        .read_info()
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;

    if info.color_type != color_type {
        return Err(IoError::PngDecodeError(format!(
            "Unexpected color type. Expected {:?}, found {:?}",
            color_type, info.color_type
        )));
    }

    if info.bit_depth != BitDepth::Eight {
        return Err(IoError::PngDecodeError(format!(
            "Unexpected bit depth. Expected Eight, found {:?}",
            info.bit_depth
        )));
    }

    buf.truncate(info.buffer_size());

    Ok((
        buf,
        ImageSize {
            width: info.width as usize,
            height: info.height as usize,
        },
    ))
}
