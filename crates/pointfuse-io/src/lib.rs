#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
///
/// Defines [`IoError`] variants for file access, decoding failures
/// and unexpected pixel formats.
pub mod error;

/// High-level image reading functions.
///
/// See [`functional::read_image_any_rgb8`] for automatic format detection.
pub mod functional;

/// PNG image encoding and decoding.
///
/// Read and write PNG images keeping their native bit depth, which is what
/// 16-bit depth maps need.
pub mod png;

/// Internal utility functions for image bit depth conversion.
mod conv_utils;

pub use crate::error::IoError;
