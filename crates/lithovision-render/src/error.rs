/// An error type for the render module.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// Error when the image buffer cannot be created or is malformed.
    #[error(transparent)]
    ImageError(#[from] lithovision_image::ImageError),

    /// Error while decoding or encoding image bytes.
    #[error(transparent)]
    IoError(#[from] lithovision_io::IoError),

    /// The selection corners do not admit a perspective transform.
    #[error(transparent)]
    DegenerateGeometry(#[from] lithovision_imgproc::warp::DegenerateGeometryError),

    /// The segmentation backend failed.
    #[error(transparent)]
    Segmentation(#[from] crate::segment::SegmentationError),

    /// The mask dimensions do not match the working photo.
    #[error("Mask size {0}x{1} does not match the photo size {2}x{3}")]
    MaskSizeMismatch(usize, usize, usize, usize),

    /// The selected slab's texture could not be acquired.
    #[error("Slab texture is unavailable: {0}")]
    TextureUnavailable(String),

    /// An operation that needs a working photo was called before one was loaded.
    #[error("No photo loaded")]
    NoPhoto,

    /// The engine settings are invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),
}
