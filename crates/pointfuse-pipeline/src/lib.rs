#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Reconstruction configuration.
pub mod config;

/// Error types of the pipeline.
pub mod error;

/// Loading and validating the images of a frame.
pub mod frame_loader;

/// The reconstruction controller.
pub mod reconstruction;

pub use crate::config::ReconstructionConfig;
pub use crate::error::{ConfigError, FrameError, MissingData, ReconstructionError};
pub use crate::reconstruction::{FrameSelection, ReconstructionReport, Reconstructor, SkippedFrame};
