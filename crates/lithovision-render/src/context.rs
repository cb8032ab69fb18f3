use crate::catalog::Slab;
use crate::error::RenderError;
use lithovision_image::Image;
use lithovision_imgproc::compose::{ComposeOptions, TileTransform, VeinDirection};
use lithovision_imgproc::mask::{self, BrushMode};

/// Allowed range for tiling offsets, in texture-repeat units.
pub const OFFSET_RANGE: [f32; 2] = [-2.0, 2.0];

/// Allowed range for the tiling scale.
pub const SCALE_RANGE: [f32; 2] = [0.1, 3.0];

/// Allowed range for the brush radius, in photo pixels.
pub const BRUSH_RANGE: [f64; 2] = [1.0, 200.0];

/// Default brush radius.
pub const DEFAULT_BRUSH_SIZE: f64 = 30.0;

/// Default slab opacity.
pub const DEFAULT_OPACITY: f32 = 0.85;

/// Tiling transform of the selected slab texture.
///
/// Fields are private so every write path goes through the clamped setters.
#[derive(Debug, Clone, PartialEq)]
pub struct SlabTransform {
    offset_x: f32,
    offset_y: f32,
    scale: f32,
    vein_direction: VeinDirection,
    direction_locked: bool,
}

impl Default for SlabTransform {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 1.0,
            vein_direction: VeinDirection::Horizontal,
            direction_locked: false,
        }
    }
}

impl SlabTransform {
    /// Horizontal tiling offset.
    pub fn offset_x(&self) -> f32 {
        self.offset_x
    }

    /// Vertical tiling offset.
    pub fn offset_y(&self) -> f32 {
        self.offset_y
    }

    /// Tiling scale. The texture repeats with period `1/scale`.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Current vein direction.
    pub fn vein_direction(&self) -> VeinDirection {
        self.vein_direction
    }

    /// Whether the vein direction is locked against edits.
    pub fn direction_locked(&self) -> bool {
        self.direction_locked
    }

    /// Set the horizontal tiling offset, clamped to the allowed range.
    pub fn set_offset_x(&mut self, offset: f32) {
        self.offset_x = offset.clamp(OFFSET_RANGE[0], OFFSET_RANGE[1]);
    }

    /// Set the vertical tiling offset, clamped to the allowed range.
    pub fn set_offset_y(&mut self, offset: f32) {
        self.offset_y = offset.clamp(OFFSET_RANGE[0], OFFSET_RANGE[1]);
    }

    /// Set the tiling scale, clamped to the allowed range.
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale.clamp(SCALE_RANGE[0], SCALE_RANGE[1]);
    }

    /// Set the vein direction. Ignored while the direction is locked.
    pub fn set_vein_direction(&mut self, direction: VeinDirection) {
        if !self.direction_locked {
            self.vein_direction = direction;
        }
    }

    /// Lock or unlock the vein direction.
    pub fn set_direction_locked(&mut self, locked: bool) {
        self.direction_locked = locked;
    }

    /// The tiling transform consumed by the compositor.
    pub fn tile(&self) -> TileTransform {
        TileTransform {
            offset_x: self.offset_x,
            offset_y: self.offset_y,
            scale: self.scale,
            vein: self.vein_direction,
        }
    }
}

/// Active editing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    /// No tool active, pointer input is ignored.
    #[default]
    View,
    /// Brush paints pixels into the selection.
    MaskBrush,
    /// Brush removes pixels from the selection.
    MaskErase,
    /// Corner handles of the perspective quad are draggable.
    Perspective,
}

/// Externally owned mutable state of one preview project.
///
/// All mutation happens on the presentation thread; components receive the
/// context by reference and return new values to be stored back rather than
/// mutating shared buffers in place.
#[derive(Debug)]
pub struct ProjectContext {
    original_photo: Option<Image<u8, 4>>,
    photo: Option<Image<u8, 4>>,
    mask: Option<Image<u8, 1>>,
    corners: Vec<[f64; 2]>,
    selected: Option<Slab>,
    transform: SlabTransform,
    mode: EditMode,
    opacity: f32,
    show_before: bool,
    show_edge_wrap: bool,
    brush_size: f64,
}

impl Default for ProjectContext {
    fn default() -> Self {
        Self {
            original_photo: None,
            photo: None,
            mask: None,
            corners: Vec::new(),
            selected: None,
            transform: SlabTransform::default(),
            mode: EditMode::default(),
            opacity: DEFAULT_OPACITY,
            show_before: false,
            show_edge_wrap: true,
            brush_size: DEFAULT_BRUSH_SIZE,
        }
    }
}

impl ProjectContext {
    /// Create an empty project.
    pub fn new() -> Self {
        Self::default()
    }

    /// The working (normalized) photo, if one is loaded.
    pub fn photo(&self) -> Option<&Image<u8, 4>> {
        self.photo.as_ref()
    }

    /// The photo as uploaded, before normalization.
    pub fn original_photo(&self) -> Option<&Image<u8, 4>> {
        self.original_photo.as_ref()
    }

    /// The current selection mask, if any.
    pub fn mask(&self) -> Option<&Image<u8, 1>> {
        self.mask.as_ref()
    }

    /// The perspective quad corner points, in photo pixel coordinates.
    pub fn corners(&self) -> &[[f64; 2]] {
        &self.corners
    }

    /// The currently selected slab, if any.
    pub fn selected_slab(&self) -> Option<&Slab> {
        self.selected.as_ref()
    }

    /// The slab tiling transform.
    pub fn transform(&self) -> &SlabTransform {
        &self.transform
    }

    /// Mutable access to the slab tiling transform.
    pub fn transform_mut(&mut self) -> &mut SlabTransform {
        &mut self.transform
    }

    /// Active editing tool.
    pub fn mode(&self) -> EditMode {
        self.mode
    }

    /// Switch the editing tool.
    pub fn set_mode(&mut self, mode: EditMode) {
        self.mode = mode;
    }

    /// Slab blend opacity in `[0, 1]`.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Set the slab blend opacity, clamped to `[0, 1]`.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    /// Whether the before view (photo only) is forced.
    pub fn show_before(&self) -> bool {
        self.show_before
    }

    /// Toggle the before view.
    pub fn set_show_before(&mut self, show: bool) {
        self.show_before = show;
    }

    /// Whether edge-wrap darkening is applied along the selection boundary.
    pub fn show_edge_wrap(&self) -> bool {
        self.show_edge_wrap
    }

    /// Toggle edge-wrap darkening.
    pub fn set_show_edge_wrap(&mut self, show: bool) {
        self.show_edge_wrap = show;
    }

    /// Brush radius in photo pixels.
    pub fn brush_size(&self) -> f64 {
        self.brush_size
    }

    /// Set the brush radius, clamped to the allowed range.
    pub fn set_brush_size(&mut self, size: f64) {
        self.brush_size = size.clamp(BRUSH_RANGE[0], BRUSH_RANGE[1]);
    }

    /// Store a freshly uploaded photo and its normalized working copy.
    ///
    /// Replacing the photo invalidates the mask and the perspective quad,
    /// since both are expressed in working-photo pixel coordinates.
    pub fn set_photo(&mut self, original: Image<u8, 4>, normalized: Image<u8, 4>) {
        self.original_photo = Some(original);
        self.photo = Some(normalized);
        self.mask = None;
        self.corners.clear();
    }

    /// Store a new selection mask.
    ///
    /// The mask dimensions must equal the working photo's dimensions.
    pub fn set_mask(&mut self, mask: Image<u8, 1>) -> Result<(), RenderError> {
        let photo = self.photo.as_ref().ok_or(RenderError::NoPhoto)?;
        if mask.size() != photo.size() {
            return Err(RenderError::MaskSizeMismatch(
                mask.width(),
                mask.height(),
                photo.width(),
                photo.height(),
            ));
        }
        self.mask = Some(mask);
        Ok(())
    }

    /// Reset the mask to fully unselected and drop the perspective quad.
    pub fn clear_mask(&mut self) -> Result<(), RenderError> {
        let photo = self.photo.as_ref().ok_or(RenderError::NoPhoto)?;
        self.mask = Some(mask::clear_mask(photo.size())?);
        self.corners.clear();
        Ok(())
    }

    /// Replace the perspective quad corner points.
    pub fn set_corners(&mut self, corners: Vec<[f64; 2]>) {
        self.corners = corners;
    }

    /// Select a slab for compositing. Resets the tiling transform so the
    /// previous slab's placement does not leak onto the new material.
    pub fn select_slab(&mut self, slab: Slab) {
        self.selected = Some(slab);
        self.transform = SlabTransform::default();
    }

    /// Deselect the current slab.
    pub fn clear_slab(&mut self) {
        self.selected = None;
    }

    /// Apply a brush drag segment to the mask with the active tool.
    ///
    /// Returns `true` when an edit occurred. In `View` and `Perspective`
    /// modes pointer input is ignored and the mask is untouched. A missing
    /// mask is created on first paint.
    pub fn stroke(&mut self, p0: [f64; 2], p1: [f64; 2]) -> Result<bool, RenderError> {
        let brush_mode = match self.mode {
            EditMode::MaskBrush => BrushMode::Paint,
            EditMode::MaskErase => BrushMode::Erase,
            EditMode::View | EditMode::Perspective => return Ok(false),
        };

        let photo = self.photo.as_ref().ok_or(RenderError::NoPhoto)?;
        let mask = match self.mask.take() {
            Some(mask) => mask,
            None => mask::clear_mask(photo.size())?,
        };

        let radius = self.brush_size();
        self.mask = Some(mask::apply_stroke(&mask, p0, p1, radius, brush_mode));
        Ok(true)
    }

    /// The blend options consumed by the compositor.
    pub fn compose_options(&self) -> ComposeOptions {
        ComposeOptions {
            opacity: self.opacity,
            show_before: self.show_before,
            show_edge_wrap: self.show_edge_wrap,
        }
    }

    /// Reset the project to its initial empty state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lithovision_image::ImageSize;
    use lithovision_imgproc::mask::MASK_SELECTED;

    fn photo(width: usize, height: usize) -> Image<u8, 4> {
        Image::from_size_val(ImageSize { width, height }, 100).unwrap()
    }

    #[test]
    fn defaults() {
        let ctx = ProjectContext::new();
        assert_eq!(ctx.opacity(), DEFAULT_OPACITY);
        assert_eq!(ctx.brush_size(), DEFAULT_BRUSH_SIZE);
        assert!(ctx.show_edge_wrap());
        assert!(!ctx.show_before());
        assert_eq!(ctx.mode(), EditMode::View);
        assert_eq!(ctx.transform(), &SlabTransform::default());
    }

    #[test]
    fn transform_clamps() {
        let mut transform = SlabTransform::default();
        transform.set_offset_x(10.0);
        transform.set_scale(0.0);
        assert_eq!(transform.offset_x(), OFFSET_RANGE[1]);
        assert_eq!(transform.scale(), SCALE_RANGE[0]);
    }

    #[test]
    fn vein_direction_lock() {
        let mut transform = SlabTransform::default();
        transform.set_direction_locked(true);
        transform.set_vein_direction(VeinDirection::Vertical);
        assert_eq!(transform.vein_direction(), VeinDirection::Horizontal);

        transform.set_direction_locked(false);
        transform.set_vein_direction(VeinDirection::Vertical);
        assert_eq!(transform.vein_direction(), VeinDirection::Vertical);
    }

    #[test]
    fn mask_must_match_photo() {
        let mut ctx = ProjectContext::new();
        ctx.set_photo(photo(10, 10), photo(10, 10));

        let wrong = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 5,
                height: 5,
            },
            0,
        )
        .unwrap();
        let result = ctx.set_mask(wrong);
        assert!(matches!(
            result,
            Err(RenderError::MaskSizeMismatch(5, 5, 10, 10))
        ));
    }

    #[test]
    fn new_photo_invalidates_mask_and_corners() {
        let mut ctx = ProjectContext::new();
        ctx.set_photo(photo(10, 10), photo(10, 10));
        ctx.clear_mask().unwrap();
        ctx.set_corners(vec![[0.0, 0.0], [9.0, 0.0], [9.0, 9.0], [0.0, 9.0]]);

        ctx.set_photo(photo(20, 20), photo(20, 20));
        assert!(ctx.mask().is_none());
        assert!(ctx.corners().is_empty());
    }

    #[test]
    fn stroke_respects_mode() {
        let mut ctx = ProjectContext::new();
        ctx.set_photo(photo(50, 50), photo(50, 50));

        // view mode ignores pointer input
        assert!(!ctx.stroke([25.0, 25.0], [25.0, 25.0]).unwrap());
        assert!(ctx.mask().is_none());

        ctx.set_mode(EditMode::MaskBrush);
        ctx.set_brush_size(5.0);
        assert!(ctx.stroke([25.0, 25.0], [25.0, 25.0]).unwrap());
        let mask = ctx.mask().expect("mask created on first paint");
        assert_eq!(mask.get([25, 25, 0]), Some(&MASK_SELECTED));
    }

    #[test]
    fn select_slab_resets_transform() {
        let mut ctx = ProjectContext::new();
        ctx.transform_mut().set_scale(2.0);

        let slab: Slab = serde_json::from_str(
            r#"{
                "sku": "CAL-001",
                "name": "Calacatta Gold",
                "finish": "Polished",
                "texture_ref": "textures/calacatta-gold.jpg",
                "quarry": "Carrara, Italy"
            }"#,
        )
        .unwrap();
        ctx.select_slab(slab);

        assert_eq!(ctx.transform().scale(), 1.0);
        assert_eq!(ctx.selected_slab().map(|s| s.sku.as_str()), Some("CAL-001"));
    }
}
