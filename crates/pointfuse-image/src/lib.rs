#![deny(missing_docs)]
//! Image types for holding decoded color and depth frames

/// image representation for reconstruction purposes.
pub mod image;

/// Error types for the image module.
pub mod error;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
