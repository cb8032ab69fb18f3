use crate::{
    config::RenderSettings,
    context::ProjectContext,
    error::RenderError,
    loader::TextureLoader,
    normalize,
    segment::{self, SegmentationError, SegmentationService, COUNTERTOP_LABELS},
};
use lithovision_image::Image;
use lithovision_imgproc::{
    compose, edge,
    mask::{self, MASK_THRESHOLD},
    warp,
};
use lithovision_io::functional;

/// What the next produced frame will show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    /// No photo loaded; nothing to render.
    Empty,
    /// Photo present but no composite possible (or before view forced).
    PhotoOnly,
    /// Photo, slab, mask and texture all present; after view active.
    Composited,
}

/// Classify what [`compose_frame`] would produce for the current state.
pub fn render_state(ctx: &ProjectContext, texture_ready: bool) -> RenderState {
    if ctx.photo().is_none() {
        return RenderState::Empty;
    }
    let composited = texture_ready
        && ctx.selected_slab().is_some()
        && ctx.mask().is_some()
        && !ctx.show_before();
    if composited {
        RenderState::Composited
    } else {
        RenderState::PhotoOnly
    }
}

/// Decode an uploaded byte stream and load it as the project photo.
pub fn load_photo_bytes(
    ctx: &mut ProjectContext,
    bytes: &[u8],
    settings: &RenderSettings,
) -> Result<(), RenderError> {
    let upload = functional::decode_image_bytes_rgba8(bytes)?;
    load_photo(ctx, upload, settings)
}

/// Load a decoded upload as the project photo, normalizing it into the
/// working copy. Replaces any previous photo, mask and perspective quad.
pub fn load_photo(
    ctx: &mut ProjectContext,
    upload: Image<u8, 4>,
    settings: &RenderSettings,
) -> Result<(), RenderError> {
    let working = normalize::normalize_photo(&upload, settings)?;
    log::info!("photo loaded: {} -> working {}", upload.size(), working.size());
    ctx.set_photo(upload, working);
    Ok(())
}

/// Produce one output frame from the current project state.
///
/// Without a slab selection, a mask or a decoded texture the working photo
/// is returned as-is. Otherwise the slab texture is tiled and blended onto
/// the photo through the mask, with edge darkening along the selection
/// boundary. Every parameter change goes through a full recomposition;
/// there is no dirty-region tracking.
pub fn compose_frame(
    ctx: &ProjectContext,
    texture: Option<&Image<u8, 4>>,
    settings: &RenderSettings,
) -> Result<Image<u8, 4>, RenderError> {
    let photo = ctx.photo().ok_or(RenderError::NoPhoto)?;

    let (texture, sel_mask) = match (texture, ctx.mask()) {
        (Some(texture), Some(sel_mask)) if ctx.selected_slab().is_some() => (texture, sel_mask),
        _ => return Ok(photo.clone()),
    };

    if sel_mask.size() != photo.size() {
        return Err(RenderError::MaskSizeMismatch(
            sel_mask.width(),
            sel_mask.height(),
            photo.width(),
            photo.height(),
        ));
    }

    let ring = edge::boundary_ring(sel_mask, settings.edge_ring_width)?;

    let mut frame = Image::from_size_val(photo.size(), 0)?;
    compose::compose(
        photo,
        texture,
        sel_mask,
        &ring,
        &ctx.transform().tile(),
        &ctx.compose_options(),
        &mut frame,
    )?;
    Ok(frame)
}

/// Produce one output frame, sourcing the texture from the loader.
///
/// A failed fetch for the current selection is a user-visible error, not a
/// silent photo-only fallback.
pub fn render(
    ctx: &ProjectContext,
    loader: &TextureLoader,
    settings: &RenderSettings,
) -> Result<Image<u8, 4>, RenderError> {
    if let Some(message) = loader.failure() {
        return Err(RenderError::TextureUnavailable(message.to_owned()));
    }
    compose_frame(ctx, loader.texture(), settings)
}

/// Warp an image so the quad given by the project's corner points maps onto
/// its full canonical rectangle.
///
/// With a corner count other than 4 this is an identity passthrough;
/// callers needing strict geometry must validate the count themselves.
pub fn warp_to_selection(
    ctx: &ProjectContext,
    image: &Image<u8, 4>,
) -> Result<Image<u8, 4>, RenderError> {
    Ok(warp::warp_quad(image, ctx.corners())?)
}

/// Fill the mask from the segmentation backend and derive the perspective
/// quad from its bounding box.
///
/// On failure the existing mask is left untouched and the error is
/// returned for a non-fatal notice; manual brushing remains available.
pub fn auto_segment(
    ctx: &mut ProjectContext,
    service: &dyn SegmentationService,
) -> Result<(), RenderError> {
    let photo = ctx.photo().ok_or(RenderError::NoPhoto)?;

    let labels = match service.segment(photo) {
        Ok(labels) => labels,
        Err(e) => {
            log::warn!("segmentation failed, keeping existing mask: {e}");
            return Err(e.into());
        }
    };

    if labels.size() != photo.size() {
        return Err(SegmentationError::LabelSizeMismatch(
            labels.width(),
            labels.height(),
            photo.width(),
            photo.height(),
        )
        .into());
    }

    let raw = segment::mask_from_labels(&labels, &COUNTERTOP_LABELS)?;
    let refined = mask::refine_mask(&raw, MASK_THRESHOLD)?;
    let corners = mask::bounding_corners(&refined);

    ctx.set_mask(refined)?;
    ctx.set_corners(corners.map(|c| c.to_vec()).unwrap_or_default());
    Ok(())
}
