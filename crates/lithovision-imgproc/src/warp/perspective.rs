use crate::parallel;
use lithovision_image::{Image, ImageSize};

/// Pivot magnitudes below this value mean the corner correspondences are
/// collinear or duplicated and the linear system has no stable solution.
const PIVOT_EPS: f64 = 1e-8;

/// The 4-point correspondences are degenerate (three collinear points or a
/// duplicate point), so no homography can be computed from them.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("degenerate perspective geometry: corner points are collinear or duplicated")]
pub struct DegenerateGeometryError;

/// The four corners of an axis-aligned rectangle of the given size, in
/// TL, TR, BR, BL order.
pub fn rect_corners(size: ImageSize) -> [[f64; 2]; 4] {
    let (w, h) = (size.width as f64, size.height as f64);
    [[0.0, 0.0], [w, 0.0], [w, h], [0.0, h]]
}

/// Compute the 3x3 planar homography mapping 4 source points to 4
/// destination points.
///
/// The 8 unknown coefficients are recovered from the homogeneous projective
/// equations with the ninth coefficient fixed to 1 to remove the scale
/// ambiguity. The system is solved by Gaussian elimination with partial
/// pivoting; a pivot magnitude below epsilon is reported as
/// [`DegenerateGeometryError`] instead of propagating near-infinite
/// coefficients.
///
/// The returned matrix is row-major: `[h00, h01, h02, h10, h11, h12, h20,
/// h21, h22]`.
///
/// # Example
///
/// ```
/// use lithovision_imgproc::warp::get_perspective_transform;
///
/// let src = [[0.0, 0.0], [4.0, 0.0], [4.0, 3.0], [0.0, 3.0]];
/// let m = get_perspective_transform(&src, &src).unwrap();
///
/// // identity correspondences yield the identity matrix
/// assert!((m[0] - 1.0).abs() < 1e-9);
/// assert!(m[2].abs() < 1e-9);
/// ```
pub fn get_perspective_transform(
    src: &[[f64; 2]; 4],
    dst: &[[f64; 2]; 4],
) -> Result<[f64; 9], DegenerateGeometryError> {
    // augmented 8x9 system: two rows per correspondence
    let mut a = [[0.0f64; 9]; 8];
    for i in 0..4 {
        let [sx, sy] = src[i];
        let [dx, dy] = dst[i];

        a[2 * i] = [sx, sy, 1.0, 0.0, 0.0, 0.0, -dx * sx, -dx * sy, dx];
        a[2 * i + 1] = [0.0, 0.0, 0.0, sx, sy, 1.0, -dy * sx, -dy * sy, dy];
    }

    // forward elimination with partial pivoting
    for i in 0..8 {
        let mut max_row = i;
        for k in (i + 1)..8 {
            if a[k][i].abs() > a[max_row][i].abs() {
                max_row = k;
            }
        }

        if a[max_row][i].abs() < PIVOT_EPS {
            return Err(DegenerateGeometryError);
        }

        a.swap(i, max_row);

        for k in (i + 1)..8 {
            let factor = a[k][i] / a[i][i];
            for j in i..9 {
                a[k][j] -= factor * a[i][j];
            }
        }
    }

    // back substitution
    let mut x = [0.0f64; 8];
    for i in (0..8).rev() {
        x[i] = a[i][8];
        for j in (i + 1)..8 {
            x[i] -= a[i][j] * x[j];
        }
        x[i] /= a[i][i];
    }

    Ok([x[0], x[1], x[2], x[3], x[4], x[5], x[6], x[7], 1.0])
}

/// Project a point through a homography: `(x', y', w') = H * (x, y, 1)`,
/// then `(x'/w', y'/w')`.
pub fn transform_point(x: f64, y: f64, m: &[f64; 9]) -> (f64, f64) {
    let w = m[6] * x + m[7] * y + m[8];
    (
        (m[0] * x + m[1] * y + m[2]) / w,
        (m[3] * x + m[4] * y + m[5]) / w,
    )
}

/// Warp the region delimited by an arbitrary 4-corner quadrilateral onto the
/// canonical axis-aligned rectangle of the source image size.
///
/// Each destination pixel is mapped through the homography computed from the
/// quadrilateral-to-rectangle correspondences and sampled at the floored
/// integer source coordinate (nearest-neighbor; an accepted aliasing tradeoff
/// for preview rendering). Destination pixels whose mapped source coordinate
/// falls outside the source bounds are left fully transparent.
///
/// If the corner count is not exactly 4 the operation is an identity
/// passthrough rather than an error; callers that require strict geometry
/// must pre-validate the count.
pub fn warp_quad(
    src: &Image<u8, 4>,
    corners: &[[f64; 2]],
) -> Result<Image<u8, 4>, DegenerateGeometryError> {
    if corners.len() != 4 {
        return Ok(src.clone());
    }

    let quad = [corners[0], corners[1], corners[2], corners[3]];
    let m = get_perspective_transform(&quad, &rect_corners(src.size()))?;

    let (width, height) = (src.width(), src.height());
    let src_data = src.as_slice();

    // cannot fail: same size as src, which is a valid image
    let mut dst = Image::from_size_val(src.size(), 0u8).expect("valid source size");

    parallel::par_iter_rows_indexed(&mut dst, |x, y, dst_pixel| {
        let (sx, sy) = transform_point(x as f64, y as f64, &m);
        let (sx, sy) = (sx.floor(), sy.floor());

        if sx >= 0.0 && sx < width as f64 && sy >= 0.0 && sy < height as f64 {
            let src_idx = (sy as usize * width + sx as usize) * 4;
            dst_pixel.copy_from_slice(&src_data[src_idx..src_idx + 4]);
        }
    });

    Ok(dst)
}
