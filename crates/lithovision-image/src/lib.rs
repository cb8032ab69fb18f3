#![deny(missing_docs)]
//! Raster container types for the lithovision preview engine.

/// Raster image representation.
pub mod image;

/// Error types for the image module.
pub mod error;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageDtype, ImageSize};
