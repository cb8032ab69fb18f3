use crate::{error::IoError, jpeg, png};
use lithovision_image::Image;

/// PNG file signature.
const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// JPEG start of image marker.
const JPEG_MAGIC: [u8; 2] = [0xFF, 0xD8];

/// Decodes an image of unknown format (JPEG or PNG) into an rgba8 image.
///
/// The format is sniffed from the magic bytes at the start of the stream.
/// Opaque sources (JPEG, rgb PNG) get a fully opaque alpha channel.
///
/// # Arguments
///
/// - `bytes` - Raw bytes of the encoded image.
pub fn decode_image_bytes_rgba8(bytes: &[u8]) -> Result<Image<u8, 4>, IoError> {
    if bytes.starts_with(&PNG_MAGIC) {
        match png::png_color_type(bytes)? {
            ::png::ColorType::Rgba => png::decode_image_png_rgba8(bytes),
            ::png::ColorType::Rgb => {
                let rgb = png::decode_image_png_rgb8(bytes)?;
                rgba_from_rgb(&rgb)
            }
            other => Err(IoError::PngDecodeError(format!(
                "Unsupported color type {other:?}"
            ))),
        }
    } else if bytes.starts_with(&JPEG_MAGIC) {
        let rgb = jpeg::decode_image_jpeg_rgb8(bytes)?;
        rgba_from_rgb(&rgb)
    } else {
        Err(IoError::UnsupportedFormat)
    }
}

// expand an rgb8 buffer with an opaque alpha channel
fn rgba_from_rgb(rgb: &Image<u8, 3>) -> Result<Image<u8, 4>, IoError> {
    let mut data = Vec::with_capacity(rgb.width() * rgb.height() * 4);
    for px in rgb.as_slice().chunks_exact(3) {
        data.extend_from_slice(&[px[0], px[1], px[2], 255]);
    }
    Ok(Image::new(rgb.size(), data)?)
}
