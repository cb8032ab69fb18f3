use crate::mask::MASK_THRESHOLD;
use crate::parallel;
use lithovision_image::{Image, ImageDtype, ImageError};

/// Discrete orientation hint for the tiled material texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VeinDirection {
    /// Texture used as-is.
    #[default]
    Horizontal,
    /// Texture rotated 90 degrees about its own center before tiling.
    Vertical,
}

/// Tiling transform of the material texture over the photo plane.
///
/// The texture repeats with period `1/scale` in both axes, panned by
/// `(offset_x, offset_y)` in texture-repeat units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileTransform {
    /// Horizontal pan, in repeat units.
    pub offset_x: f32,
    /// Vertical pan, in repeat units.
    pub offset_y: f32,
    /// Texture repeat factor.
    pub scale: f32,
    /// Vein orientation.
    pub vein: VeinDirection,
}

impl Default for TileTransform {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 1.0,
            vein: VeinDirection::Horizontal,
        }
    }
}

/// View options of a single composition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComposeOptions {
    /// Blend strength of the slab plane, in `[0, 1]`.
    pub opacity: f32,
    /// When set, the unmodified photo is produced (before view).
    pub show_before: bool,
    /// Gates the seam darkening at the selection perimeter.
    pub show_edge_wrap: bool,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            opacity: 0.85,
            show_before: false,
            show_edge_wrap: true,
        }
    }
}

/// Sample the tiled texture at normalized photo coordinates `(u, v)`.
fn sample_tiled(texture: &Image<u8, 4>, u: f32, v: f32, tile: &TileTransform) -> [u8; 4] {
    let mut tu = (u * tile.scale + tile.offset_x).rem_euclid(1.0);
    let mut tv = (v * tile.scale + tile.offset_y).rem_euclid(1.0);

    if tile.vein == VeinDirection::Vertical {
        // 90 degree rotation about the tile center
        (tu, tv) = (tv, 1.0 - tu);
    }

    let (tex_w, tex_h) = (texture.width(), texture.height());
    let tx = ((tu * tex_w as f32) as usize).min(tex_w - 1);
    let ty = ((tv * tex_h as f32) as usize).min(tex_h - 1);

    let base = (ty * tex_w + tx) * 4;
    let data = texture.as_slice();

    [data[base], data[base + 1], data[base + 2], data[base + 3]]
}

/// Composite the tiled material texture onto the photo through the selection
/// mask.
///
/// Per output pixel:
///
/// ```text
/// edge_factor = ring(pixel) ? 0.5 : 1.0        (1.0 when edge wrap is off)
/// slab        = sample_tiled(pixel) * edge_factor
/// out         = show_before ? photo : photo * (1 - a) + slab * a
///               where a = mask / 255 * opacity
/// ```
///
/// The output frame is always fully opaque; the slab contribution is
/// alpha-blended onto the photo, not onto the frame itself.
///
/// # Arguments
///
/// * `photo` - The normalized working photo.
/// * `texture` - The decoded material texture, tiled per `tile`.
/// * `mask` - The binary selection mask, same size as the photo.
/// * `edge_ring` - The boundary ring derived from the mask, same size.
/// * `tile` - The tiling transform.
/// * `opts` - Opacity and view toggles.
/// * `dst` - The output frame, same size as the photo.
pub fn compose(
    photo: &Image<u8, 4>,
    texture: &Image<u8, 4>,
    mask: &Image<u8, 1>,
    edge_ring: &Image<u8, 1>,
    tile: &TileTransform,
    opts: &ComposeOptions,
    dst: &mut Image<u8, 4>,
) -> Result<(), ImageError> {
    for size in [mask.size(), edge_ring.size(), dst.size()] {
        if size != photo.size() {
            return Err(ImageError::InvalidImageSize(
                size.width,
                size.height,
                photo.width(),
                photo.height(),
            ));
        }
    }
    if texture.as_slice().is_empty() {
        return Err(ImageError::InvalidImageSize(
            texture.width(),
            texture.height(),
            1,
            1,
        ));
    }

    let (width, height) = (photo.width(), photo.height());
    let photo_data = photo.as_slice();
    let mask_data = mask.as_slice();
    let ring_data = edge_ring.as_slice();
    let opacity = opts.opacity.clamp(0.0, 1.0);

    parallel::par_iter_rows_indexed(dst, |x, y, dst_pixel| {
        let idx = y * width + x;
        let photo_pixel = &photo_data[idx * 4..idx * 4 + 4];

        if opts.show_before {
            dst_pixel[..3].copy_from_slice(&photo_pixel[..3]);
            dst_pixel[3] = 255;
            return;
        }

        let u = x as f32 / width as f32;
        let v = y as f32 / height as f32;
        let slab = sample_tiled(texture, u, v, tile);

        let edge_factor = if opts.show_edge_wrap && ring_data[idx] > MASK_THRESHOLD {
            0.5
        } else {
            1.0
        };

        let alpha = mask_data[idx] as f32 / 255.0 * opacity;

        for k in 0..3 {
            let slab_shaded = slab[k] as f32 * edge_factor;
            dst_pixel[k] =
                u8::from_f32(photo_pixel[k] as f32 * (1.0 - alpha) + slab_shaded * alpha);
        }
        dst_pixel[3] = 255;
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::boundary_ring;
    use crate::mask::{clear_mask, MASK_SELECTED};
    use lithovision_image::{Image, ImageError, ImageSize};

    fn solid(size: ImageSize, rgba: [u8; 4]) -> Image<u8, 4> {
        let mut data = Vec::with_capacity(size.width * size.height * 4);
        for _ in 0..size.width * size.height {
            data.extend_from_slice(&rgba);
        }
        Image::new(size, data).unwrap()
    }

    #[test]
    fn half_opacity_blend_is_exact() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 200,
            height: 100,
        };
        let photo = solid(size, [80, 120, 160, 255]);
        let texture = solid(
            ImageSize {
                width: 4,
                height: 4,
            },
            [200, 40, 60, 255],
        );
        let mask = Image::<u8, 1>::from_size_val(size, MASK_SELECTED)?;
        let ring = clear_mask(size)?;

        let opts = ComposeOptions {
            opacity: 0.5,
            show_before: false,
            show_edge_wrap: false,
        };

        let mut frame = Image::from_size_val(size, 0u8)?;
        compose(
            &photo,
            &texture,
            &mask,
            &ring,
            &TileTransform::default(),
            &opts,
            &mut frame,
        )?;

        let expected = [
            u8::from_f32(80.0 * 0.5 + 200.0 * 0.5),
            u8::from_f32(120.0 * 0.5 + 40.0 * 0.5),
            u8::from_f32(160.0 * 0.5 + 60.0 * 0.5),
            255,
        ];
        for pixel in frame.as_slice().chunks_exact(4) {
            assert_eq!(pixel, expected);
        }
        Ok(())
    }

    #[test]
    fn before_view_reproduces_photo() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 8,
            height: 8,
        };
        let photo = solid(size, [10, 20, 30, 255]);
        let texture = solid(size, [255, 255, 255, 255]);
        let mask = Image::<u8, 1>::from_size_val(size, MASK_SELECTED)?;
        let ring = boundary_ring(&mask, 2)?;

        let opts = ComposeOptions {
            show_before: true,
            ..Default::default()
        };

        let mut frame = Image::from_size_val(size, 0u8)?;
        compose(
            &photo,
            &texture,
            &mask,
            &ring,
            &TileTransform::default(),
            &opts,
            &mut frame,
        )?;

        assert_eq!(frame.as_slice(), photo.as_slice());
        Ok(())
    }

    #[test]
    fn unselected_pixels_keep_photo_color() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 6,
            height: 6,
        };
        let photo = solid(size, [50, 60, 70, 255]);
        let texture = solid(size, [255, 0, 0, 255]);
        let mask = clear_mask(size)?;
        let ring = clear_mask(size)?;

        let mut frame = Image::from_size_val(size, 0u8)?;
        compose(
            &photo,
            &texture,
            &mask,
            &ring,
            &TileTransform::default(),
            &ComposeOptions::default(),
            &mut frame,
        )?;

        assert_eq!(frame.as_slice(), photo.as_slice());
        Ok(())
    }

    #[test]
    fn edge_ring_darkens_slab() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 4,
            height: 1,
        };
        let photo = solid(size, [0, 0, 0, 255]);
        let texture = solid(size, [200, 200, 200, 255]);
        let mask = Image::<u8, 1>::from_size_val(size, MASK_SELECTED)?;
        // ring on the first two pixels only
        let ring = Image::<u8, 1>::new(size, vec![255, 255, 0, 0])?;

        let opts = ComposeOptions {
            opacity: 1.0,
            show_before: false,
            show_edge_wrap: true,
        };

        let mut frame = Image::from_size_val(size, 0u8)?;
        compose(
            &photo,
            &texture,
            &mask,
            &ring,
            &TileTransform::default(),
            &opts,
            &mut frame,
        )?;

        let data = frame.as_slice();
        assert_eq!(&data[0..4], &[100, 100, 100, 255]);
        assert_eq!(&data[8..12], &[200, 200, 200, 255]);

        // edge wrap off: no darkening anywhere
        let opts = ComposeOptions {
            show_edge_wrap: false,
            ..opts
        };
        compose(
            &photo,
            &texture,
            &mask,
            &ring,
            &TileTransform::default(),
            &opts,
            &mut frame,
        )?;
        assert!(frame.as_slice().chunks_exact(4).all(|p| p == [200, 200, 200, 255]));
        Ok(())
    }

    #[test]
    fn vertical_vein_rotates_texture() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 4,
            height: 4,
        };
        let photo = solid(size, [0, 0, 0, 255]);
        // 2x2 texture: top row red, bottom row green
        let texture = Image::<u8, 4>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![
                255, 0, 0, 255, 255, 0, 0, 255, //
                0, 255, 0, 255, 0, 255, 0, 255,
            ],
        )?;
        let mask = Image::<u8, 1>::from_size_val(size, MASK_SELECTED)?;
        let ring = clear_mask(size)?;

        let opts = ComposeOptions {
            opacity: 1.0,
            show_before: false,
            show_edge_wrap: false,
        };

        let tile = TileTransform {
            vein: VeinDirection::Vertical,
            ..Default::default()
        };

        let mut frame = Image::from_size_val(size, 0u8)?;
        compose(&photo, &texture, &mask, &ring, &tile, &opts, &mut frame)?;

        // after a 90 degree rotation the color varies along x instead of y:
        // tv = 1 - u, so columns 0..3 hit the green row and column 3 the red
        let pixel = |x: usize, y: usize| &frame.as_slice()[(y * 4 + x) * 4..(y * 4 + x) * 4 + 4];
        assert_eq!(pixel(0, 0), &[0, 255, 0, 255]);
        assert_eq!(pixel(3, 0), &[255, 0, 0, 255]);
        // constant along y
        assert_eq!(pixel(0, 0), pixel(0, 3));
        assert_eq!(pixel(3, 0), pixel(3, 3));
        Ok(())
    }

    #[test]
    fn tiling_wraps_with_scale() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 4,
            height: 1,
        };
        let photo = solid(size, [0, 0, 0, 255]);
        // 2x1 texture: black, white
        let texture = Image::<u8, 4>::new(
            ImageSize {
                width: 2,
                height: 1,
            },
            vec![0, 0, 0, 255, 255, 255, 255, 255],
        )?;
        let mask = Image::<u8, 1>::from_size_val(size, MASK_SELECTED)?;
        let ring = clear_mask(size)?;

        let opts = ComposeOptions {
            opacity: 1.0,
            show_before: false,
            show_edge_wrap: false,
        };

        // scale 2: the texture repeats twice across the photo
        let tile = TileTransform {
            scale: 2.0,
            ..Default::default()
        };

        let mut frame = Image::from_size_val(size, 0u8)?;
        compose(&photo, &texture, &mask, &ring, &tile, &opts, &mut frame)?;

        let pixel = |i: usize| frame.as_slice()[i * 4];
        assert_eq!(pixel(0), 0);
        assert_eq!(pixel(1), 255);
        assert_eq!(pixel(2), 0);
        assert_eq!(pixel(3), 255);
        Ok(())
    }
}
