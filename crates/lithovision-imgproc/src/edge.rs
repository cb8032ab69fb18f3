use crate::mask::{MASK_SELECTED, MASK_THRESHOLD, MASK_UNSELECTED};
use crate::parallel;
use lithovision_image::{Image, ImageError};

/// Derive the boundary ring of a binary selection mask.
///
/// A selected pixel is classified as boundary if any pixel in its square
/// neighborhood of half-width `ring_width` is unselected. Neighbor positions
/// outside the raster bounds count as unselected, so a selection touching the
/// image border is ringed there too. Unselected pixels are never boundary.
///
/// The output is a same-dimension binary raster used as a rendering hint
/// (simulated seam darkening at the selection perimeter), not for mask
/// geometry.
///
/// # Arguments
///
/// * `mask` - The binary selection mask.
/// * `ring_width` - Half-width of the square neighborhood to inspect.
pub fn boundary_ring(mask: &Image<u8, 1>, ring_width: usize) -> Result<Image<u8, 1>, ImageError> {
    let mut ring = Image::from_size_val(mask.size(), MASK_UNSELECTED)?;

    let (width, height) = (mask.width() as i64, mask.height() as i64);
    let data = mask.as_slice();
    let k = ring_width as i64;

    parallel::par_iter_rows_indexed(&mut ring, |x, y, dst_pixel| {
        if data[y * width as usize + x] <= MASK_THRESHOLD {
            return;
        }

        let (x, y) = (x as i64, y as i64);
        let mut is_edge = false;

        'scan: for dy in -k..=k {
            for dx in -k..=k {
                let nx = x + dx;
                let ny = y + dy;

                if nx < 0 || nx >= width || ny < 0 || ny >= height {
                    is_edge = true;
                    break 'scan;
                }
                if data[(ny * width + nx) as usize] <= MASK_THRESHOLD {
                    is_edge = true;
                    break 'scan;
                }
            }
        }

        if is_edge {
            dst_pixel[0] = MASK_SELECTED;
        }
    });

    Ok(ring)
}
