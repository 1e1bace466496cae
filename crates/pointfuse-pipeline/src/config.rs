use std::path::{Path, PathBuf};

use pointfuse_3d::camera::{PinholeIntrinsics, DEFAULT_DEPTH_SCALE};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_depth_scale() -> f32 {
    DEFAULT_DEPTH_SCALE
}

/// The configuration of a reconstruction.
///
/// Only the dataset paths and the frame count are required in a JSON file;
/// the camera calibration defaults to the ICL-NUIM sensor and the worker
/// count to the available parallelism.
///
/// # Examples
///
/// ```
/// use pointfuse_pipeline::ReconstructionConfig;
///
/// let config = ReconstructionConfig::new("office_kt0", "office_kt0/traj0.txt", "office_kt0/associations.txt", 1508)
///     .with_num_threads(4);
///
/// assert_eq!(config.frame_count, 1508);
/// assert_eq!(config.num_threads(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconstructionConfig {
    /// The directory the association paths are relative to.
    pub images_dir: PathBuf,
    /// The trajectory file with one pose per frame.
    pub trajectory_path: PathBuf,
    /// The association file mapping frame indices to image paths.
    pub associations_path: PathBuf,
    /// The number of frames processed by [`crate::FrameSelection::AllFrames`].
    pub frame_count: usize,
    /// The pinhole calibration of the depth camera.
    #[serde(default)]
    pub intrinsics: PinholeIntrinsics,
    /// The factor from raw depth samples to scene units.
    #[serde(default = "default_depth_scale")]
    pub depth_scale: f32,
    /// The number of worker threads, `None` to use all available cores.
    #[serde(default)]
    pub threads: Option<usize>,
}

impl ReconstructionConfig {
    /// Create a configuration with the default calibration.
    pub fn new(
        images_dir: impl Into<PathBuf>,
        trajectory_path: impl Into<PathBuf>,
        associations_path: impl Into<PathBuf>,
        frame_count: usize,
    ) -> Self {
        Self {
            images_dir: images_dir.into(),
            trajectory_path: trajectory_path.into(),
            associations_path: associations_path.into(),
            frame_count,
            intrinsics: PinholeIntrinsics::default(),
            depth_scale: DEFAULT_DEPTH_SCALE,
            threads: None,
        }
    }

    /// Set the camera intrinsics.
    pub fn with_intrinsics(mut self, intrinsics: PinholeIntrinsics) -> Self {
        self.intrinsics = intrinsics;
        self
    }

    /// Set the depth scale.
    pub fn with_depth_scale(mut self, depth_scale: f32) -> Self {
        self.depth_scale = depth_scale;
        self
    }

    /// Set the number of worker threads.
    pub fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.threads = Some(num_threads);
        self
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// The number of worker threads the reconstruction runs on.
    pub fn num_threads(&self) -> usize {
        self.threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// Check that the values can be used for a reconstruction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threads == Some(0) {
            return Err(ConfigError::InvalidValue(
                "the number of threads must be positive".to_string(),
            ));
        }
        if !self.depth_scale.is_finite() {
            return Err(ConfigError::InvalidValue(format!(
                "depth scale must be finite, got {}",
                self.depth_scale
            )));
        }
        let k = &self.intrinsics;
        if k.fx == 0.0 || k.fy == 0.0 {
            return Err(ConfigError::InvalidValue(format!(
                "focal lengths must be non zero, got fx={} fy={}",
                k.fx, k.fy
            )));
        }
        Ok(())
    }
}
