use crate::parallel;
use lithovision_image::{Image, ImageError, ImageSize};

/// Pixel value of a selected mask pixel.
pub const MASK_SELECTED: u8 = 255;

/// Pixel value of an unselected mask pixel.
pub const MASK_UNSELECTED: u8 = 0;

/// Threshold above which a mask pixel counts as selected.
pub const MASK_THRESHOLD: u8 = 128;

/// Whether a brush stroke selects or deselects pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrushMode {
    /// Mark pixels under the brush as selected.
    Paint,
    /// Mark pixels under the brush as unselected.
    Erase,
}

/// Create a fully-unselected mask of the given dimensions.
///
/// This is the only way to reset a mask without a segmentation fill.
pub fn clear_mask(size: ImageSize) -> Result<Image<u8, 1>, ImageError> {
    Image::from_size_val(size, MASK_UNSELECTED)
}

/// Apply a circular brush to the mask, returning a new buffer.
///
/// Every pixel within `radius` of `center` (squared-distance test, no
/// square root per pixel) is set fully selected (paint) or fully unselected
/// (erase); pixels outside the disk are untouched. The result is built from
/// a copy of the prior state so a renderer holding the old buffer never
/// observes a partial edit.
///
/// # Examples
///
/// ```
/// use lithovision_image::{Image, ImageSize};
/// use lithovision_imgproc::mask::{apply_brush, clear_mask, BrushMode};
///
/// let mask = clear_mask(ImageSize { width: 100, height: 100 }).unwrap();
/// let mask = apply_brush(&mask, [50.0, 50.0], 20.0, BrushMode::Paint);
///
/// assert_eq!(mask.get([50, 50, 0]), Some(&255u8));
/// assert_eq!(mask.get([71, 50, 0]), Some(&0u8));
/// ```
pub fn apply_brush(
    mask: &Image<u8, 1>,
    center: [f64; 2],
    radius: f64,
    mode: BrushMode,
) -> Image<u8, 1> {
    let mut new_mask = mask.clone();

    let value = match mode {
        BrushMode::Paint => MASK_SELECTED,
        BrushMode::Erase => MASK_UNSELECTED,
    };

    let (width, height) = (mask.width() as i64, mask.height() as i64);
    let r = radius.ceil() as i64;
    let data = new_mask.as_slice_mut();

    for dy in -r..=r {
        for dx in -r..=r {
            if (dx * dx + dy * dy) as f64 <= radius * radius {
                let px = (center[0] + dx as f64).floor() as i64;
                let py = (center[1] + dy as f64).floor() as i64;

                if px >= 0 && px < width && py >= 0 && py < height {
                    data[(py * width + px) as usize] = value;
                }
            }
        }
    }

    new_mask
}

/// Interpolated sample positions along a brush drag segment.
///
/// Pointer events arrive as discrete samples; to guarantee a gapless stroke
/// the segment from `p0` to `p1` is subdivided into
/// `max(1, floor(|p1 - p0| / (radius / 2)))` steps and both endpoints are
/// included.
pub fn stroke_points(p0: [f64; 2], p1: [f64; 2], radius: f64) -> Vec<[f64; 2]> {
    let dx = p1[0] - p0[0];
    let dy = p1[1] - p0[1];
    let distance = (dx * dx + dy * dy).sqrt();

    let steps = ((distance / (radius / 2.0)).floor() as usize).max(1);

    (0..=steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            [p0[0] + dx * t, p0[1] + dy * t]
        })
        .collect()
}

/// Apply a brush along a drag segment, interpolating between the two
/// pointer samples. Returns a new buffer; the input is untouched.
pub fn apply_stroke(
    mask: &Image<u8, 1>,
    p0: [f64; 2],
    p1: [f64; 2],
    radius: f64,
    mode: BrushMode,
) -> Image<u8, 1> {
    let mut new_mask = mask.clone();
    for point in stroke_points(p0, p1, radius) {
        new_mask = apply_brush(&new_mask, point, radius, mode);
    }
    new_mask
}

/// Binarize a soft selection at the given threshold, returning a new buffer.
///
/// Values above the threshold become fully selected, the rest fully
/// unselected. Used to clean up fractional values from an upstream
/// segmentation result.
pub fn refine_mask(mask: &Image<u8, 1>, threshold: u8) -> Result<Image<u8, 1>, ImageError> {
    let mut refined = Image::from_size_val(mask.size(), MASK_UNSELECTED)?;

    parallel::par_iter_rows_val(mask, &mut refined, move |src, dst| {
        *dst = if *src > threshold {
            MASK_SELECTED
        } else {
            MASK_UNSELECTED
        };
    });

    Ok(refined)
}

/// Tight axis-aligned bounding box of the selected pixels, returned as four
/// corners in TL, TR, BR, BL order.
///
/// Returns `None` when no pixel is selected.
pub fn bounding_corners(mask: &Image<u8, 1>) -> Option<[[f64; 2]; 4]> {
    let (width, height) = (mask.width(), mask.height());
    let data = mask.as_slice();

    let mut min_x = width;
    let mut max_x = 0usize;
    let mut min_y = height;
    let mut max_y = 0usize;
    let mut any = false;

    for y in 0..height {
        for x in 0..width {
            if data[y * width + x] > MASK_THRESHOLD {
                any = true;
                min_x = min_x.min(x);
                max_x = max_x.max(x);
                min_y = min_y.min(y);
                max_y = max_y.max(y);
            }
        }
    }

    if !any {
        return None;
    }

    let (min_x, max_x) = (min_x as f64, max_x as f64);
    let (min_y, max_y) = (min_y as f64, max_y as f64);

    Some([
        [min_x, min_y],
        [max_x, min_y],
        [max_x, max_y],
        [min_x, max_y],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use lithovision_image::{ImageError, ImageSize};

    #[test]
    fn brush_disk_membership() -> Result<(), ImageError> {
        let mask = clear_mask(ImageSize {
            width: 100,
            height: 100,
        })?;
        let mask = apply_brush(&mask, [50.0, 50.0], 20.0, BrushMode::Paint);

        // center selected
        assert_eq!(mask.get([50, 50, 0]), Some(&MASK_SELECTED));
        // 19 px away: inside
        assert_eq!(mask.get([69, 50, 0]), Some(&MASK_SELECTED));
        // exactly 20 px away: inside (<=)
        assert_eq!(mask.get([70, 50, 0]), Some(&MASK_SELECTED));
        // 21 px away: outside
        assert_eq!(mask.get([71, 50, 0]), Some(&MASK_UNSELECTED));

        Ok(())
    }

    #[test]
    fn brush_erase_and_untouched_outside() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 40,
            height: 40,
        };
        let full = Image::<u8, 1>::from_size_val(size, MASK_SELECTED)?;
        let erased = apply_brush(&full, [20.0, 20.0], 5.0, BrushMode::Erase);

        assert_eq!(erased.get([20, 20, 0]), Some(&MASK_UNSELECTED));
        // outside the disk is untouched
        assert_eq!(erased.get([0, 0, 0]), Some(&MASK_SELECTED));
        // the input buffer is not aliased by the edit
        assert_eq!(full.get([20, 20, 0]), Some(&MASK_SELECTED));

        Ok(())
    }

    #[test]
    fn brush_clipped_at_raster_bounds() -> Result<(), ImageError> {
        let mask = clear_mask(ImageSize {
            width: 10,
            height: 10,
        })?;
        let mask = apply_brush(&mask, [0.0, 0.0], 5.0, BrushMode::Paint);
        assert_eq!(mask.get([0, 0, 0]), Some(&MASK_SELECTED));
        assert_eq!(mask.get([9, 9, 0]), Some(&MASK_UNSELECTED));
        Ok(())
    }

    #[test]
    fn stroke_has_no_gaps() -> Result<(), ImageError> {
        let mask = clear_mask(ImageSize {
            width: 200,
            height: 50,
        })?;
        let radius = 4.0;
        let mask = apply_stroke(&mask, [10.0, 25.0], [180.0, 25.0], radius, BrushMode::Paint);

        // every pixel on the segment axis must be covered
        for x in 10..=180 {
            assert_eq!(
                mask.get([25, x, 0]),
                Some(&MASK_SELECTED),
                "gap at x={x}"
            );
        }
        Ok(())
    }

    #[test]
    fn stroke_points_step_rule() {
        let points = stroke_points([0.0, 0.0], [10.0, 0.0], 4.0);
        // floor(10 / 2) = 5 steps -> 6 samples including both endpoints
        assert_eq!(points.len(), 6);
        assert_eq!(points[0], [0.0, 0.0]);
        assert_eq!(points[5], [10.0, 0.0]);

        // shorter than half a radius still yields one step
        let points = stroke_points([0.0, 0.0], [1.0, 0.0], 30.0);
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn refine_binarizes() -> Result<(), ImageError> {
        let soft = Image::<u8, 1>::new(
            ImageSize {
                width: 4,
                height: 1,
            },
            vec![0, 127, 129, 255],
        )?;
        let refined = refine_mask(&soft, MASK_THRESHOLD)?;
        assert_eq!(refined.as_slice(), &[0, 0, 255, 255]);
        Ok(())
    }

    #[test]
    fn bounding_corners_order() -> Result<(), ImageError> {
        let mut mask = clear_mask(ImageSize {
            width: 20,
            height: 20,
        })?;
        let width = mask.width();
        let data = mask.as_slice_mut();
        for y in 5..10 {
            for x in 3..12 {
                data[y * width + x] = MASK_SELECTED;
            }
        }

        let corners = bounding_corners(&mask).expect("selection present");
        assert_eq!(
            corners,
            [
                [3.0, 5.0],
                [11.0, 5.0],
                [11.0, 9.0],
                [3.0, 9.0],
            ]
        );
        Ok(())
    }

    #[test]
    fn bounding_corners_empty() -> Result<(), ImageError> {
        let mask = clear_mask(ImageSize {
            width: 8,
            height: 8,
        })?;
        assert!(bounding_corners(&mask).is_none());
        Ok(())
    }
}
