use lithovision_image::{Image, ImageError};
use lithovision_imgproc::mask::{MASK_SELECTED, MASK_UNSELECTED};
use lithovision_imgproc::parallel;

/// Semantic labels that count as countertop surfaces in the label map
/// produced by the segmentation backend (table, shelf and counter classes).
pub const COUNTERTOP_LABELS: [u8; 3] = [12, 14, 15];

/// An error type for the segmentation boundary.
#[derive(thiserror::Error, Debug)]
pub enum SegmentationError {
    /// The backend failed to produce a label map.
    #[error("Segmentation backend failed: {0}")]
    Backend(String),

    /// The label map dimensions do not match the photo.
    #[error("Label map size {0}x{1} does not match the photo size {2}x{3}")]
    LabelSizeMismatch(usize, usize, usize, usize),
}

/// Produces a per-pixel semantic label map for a photo.
///
/// Implementations wrap an ML backend; the engine itself only consumes the
/// label map. Failure is non-fatal: the caller keeps the existing mask and
/// falls back to manual brushing.
pub trait SegmentationService {
    /// Segment the photo into a label map of the same dimensions.
    fn segment(&self, photo: &Image<u8, 4>) -> Result<Image<u8, 1>, SegmentationError>;
}

/// Build a binary selection mask from a label map, selecting every pixel
/// whose label is in `targets`.
pub fn mask_from_labels(
    labels: &Image<u8, 1>,
    targets: &[u8],
) -> Result<Image<u8, 1>, ImageError> {
    let mut mask = Image::from_size_val(labels.size(), MASK_UNSELECTED)?;

    parallel::par_iter_rows_val(labels, &mut mask, move |label, dst| {
        *dst = if targets.contains(label) {
            MASK_SELECTED
        } else {
            MASK_UNSELECTED
        };
    });

    Ok(mask)
}
