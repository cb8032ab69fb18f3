#![deny(missing_docs)]
//! Preview pipeline for the lithovision engine.
//!
//! Owns the project state (photo, mask, selection, tiling transform),
//! acquires slab textures asynchronously and produces composited frames.

/// Slab catalog records.
pub mod catalog;

/// Engine settings.
pub mod config;

/// Externally owned project state.
pub mod context;

/// Error types for the render module.
pub mod error;

/// Frame export encoding.
pub mod export;

/// Asynchronous slab texture acquisition.
pub mod loader;

/// Photo normalization on upload.
pub mod normalize;

/// Frame production.
pub mod pipeline;

/// Segmentation service boundary.
pub mod segment;

pub use crate::error::RenderError;
