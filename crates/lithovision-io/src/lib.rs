#![deny(missing_docs)]
//! JPEG and PNG encode/decode for the lithovision preview engine.

/// Error types for the io module.
pub mod error;

/// High-level image decoding from raw bytes.
pub mod functional;

/// JPEG encoding/decoding.
pub mod jpeg;

/// PNG decoding.
pub mod png;

pub use crate::error::IoError;
