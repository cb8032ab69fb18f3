//! Planar homography estimation and perspective warping.

mod perspective;

pub use perspective::{
    get_perspective_transform, rect_corners, transform_point, warp_quad, DegenerateGeometryError,
};
