use crate::{catalog::Slab, config::RenderSettings, error::RenderError};
use lithovision_image::Image;
use lithovision_imgproc::color;
use lithovision_io::jpeg;
use std::path::Path;

/// Encode a composited frame into JPEG bytes at the export quality.
///
/// One-shot synchronous encode; there are no cancellation semantics.
pub fn export_frame(
    frame: &Image<u8, 4>,
    settings: &RenderSettings,
) -> Result<Vec<u8>, RenderError> {
    let mut rgb = Image::from_size_val(frame.size(), 0)?;
    color::rgb_from_rgba(frame, &mut rgb)?;
    Ok(jpeg::encode_image_jpeg_rgb8(&rgb, settings.export_quality)?)
}

/// Encode a composited frame straight to a file at the export quality.
pub fn export_frame_to_file(
    file_path: impl AsRef<Path>,
    frame: &Image<u8, 4>,
    settings: &RenderSettings,
) -> Result<(), RenderError> {
    let mut rgb = Image::from_size_val(frame.size(), 0)?;
    color::rgb_from_rgba(frame, &mut rgb)?;
    jpeg::write_image_jpeg_rgb8(file_path, &rgb, settings.export_quality)?;
    Ok(())
}

/// Suggested download filename for an export: the product name, then the
/// selected slab's sku (or `render` when none is selected).
pub fn export_filename(settings: &RenderSettings, slab: Option<&Slab>) -> String {
    let id = slab.map_or("render", |slab| slab.sku.as_str());
    format!("{}-{}.jpg", settings.product_name, id)
}
