#![deny(missing_docs)]
//! Pixel-space operations for the lithovision preview engine.

/// color conversion helpers.
pub mod color;

/// composite a tiled material texture onto a photo through a mask.
pub mod compose;

/// selection boundary-ring detection.
pub mod edge;

/// utilities for interpolation.
pub mod interpolation;

/// binary selection mask editing.
pub mod mask;

/// module containing parallelization utilities.
pub mod parallel;

/// utility functions for resizing images.
pub mod resize;

/// image geometric transformations module.
pub mod warp;
