use std::path::PathBuf;

use pointfuse_3d::rgbd::RgbdError;
use pointfuse_io::IoError;

/// An error type for loading a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error reading the configuration file.
    #[error("Failed to read the configuration file. {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing the configuration file.
    #[error("Failed to parse the configuration file. {0}")]
    Json(#[from] serde_json::Error),

    /// A value of the configuration is not usable.
    #[error("Invalid configuration: {0}")]
    InvalidValue(String),
}

/// The piece of per-frame metadata a requested frame is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingData {
    /// No pose at this position of the trajectory.
    Pose,
    /// No color image path in the association table.
    ColorPath,
    /// No depth image path in the association table.
    DepthPath,
}

impl std::fmt::Display for MissingData {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            MissingData::Pose => write!(f, "pose"),
            MissingData::ColorPath => write!(f, "color image path"),
            MissingData::DepthPath => write!(f, "depth image path"),
        }
    }
}

/// The reason a frame did not contribute any point.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The trajectory or the association table has no entry for the frame.
    #[error("Frame {index} has no {missing}")]
    MissingFrameData {
        /// The requested frame index.
        index: usize,
        /// What is missing.
        missing: MissingData,
    },

    /// The color image could not be decoded.
    #[error("Failed to load color image {path:?}. {source}")]
    ColorDecode {
        /// The resolved image path.
        path: PathBuf,
        /// The decoding error.
        source: IoError,
    },

    /// The depth image could not be decoded.
    #[error("Failed to load depth image {path:?}. {source}")]
    DepthDecode {
        /// The resolved image path.
        path: PathBuf,
        /// The decoding error.
        source: IoError,
    },

    /// The depth image is not a single channel 16-bit image.
    #[error("Depth image {path:?} is not 16-bit single channel: found {found}")]
    DepthFormat {
        /// The resolved image path.
        path: PathBuf,
        /// The pixel format stored in the file.
        found: String,
    },

    /// The color and depth images have different sizes.
    #[error(transparent)]
    SizeMismatch(#[from] RgbdError),
}

/// An error type for the reconstruction controller.
#[derive(Debug, thiserror::Error)]
pub enum ReconstructionError {
    /// The configuration is not usable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The worker pool could not be created.
    #[error("Failed to build the worker pool. {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
