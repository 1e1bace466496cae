use pointfuse_3d::{
    io::tum::{read_associations, read_trajectory, Associations},
    pointcloud::PointBuffer,
    pose::{camera_path, Pose},
    unproject::unproject_frame,
};
use rayon::prelude::*;

use crate::{
    config::ReconstructionConfig,
    error::{FrameError, MissingData, ReconstructionError},
    frame_loader::load_frame,
};

/// The frames a reconstruction processes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameSelection {
    /// Every frame index in `0..frame_count` of the configuration, ascending.
    AllFrames,
    /// Exactly these frame indices, in this order. Repeated indices are
    /// processed again.
    Indices(Vec<usize>),
}

impl FrameSelection {
    fn resolve(&self, frame_count: usize) -> Vec<usize> {
        match self {
            FrameSelection::AllFrames => (0..frame_count).collect(),
            FrameSelection::Indices(indices) => indices.clone(),
        }
    }
}

impl From<Vec<usize>> for FrameSelection {
    fn from(indices: Vec<usize>) -> Self {
        FrameSelection::Indices(indices)
    }
}

/// A frame that did not contribute any point.
#[derive(Debug)]
pub struct SkippedFrame {
    /// The requested frame index.
    pub index: usize,
    /// Why the frame was skipped.
    pub error: FrameError,
}

/// The outcome of a call to [`Reconstructor::reconstruct`].
#[derive(Debug, Default)]
pub struct ReconstructionReport {
    /// The frame indices whose points are in the buffer, in output order.
    pub processed: Vec<usize>,
    /// The frames that were skipped, in selection order.
    pub skipped: Vec<SkippedFrame>,
    /// The number of points in the buffer.
    pub num_points: usize,
}

impl ReconstructionReport {
    /// Check if every selected frame was processed.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    /// The indices of the skipped frames.
    pub fn skipped_indices(&self) -> Vec<usize> {
        self.skipped.iter().map(|s| s.index).collect()
    }
}

/// Reconstruct a colored point cloud from a sequence of RGB-D frames.
///
/// The trajectory and association tables are loaded once at construction.
/// Each call to [`Reconstructor::reconstruct`] replaces the accumulated
/// points with the points of the selected frames, concatenated in selection
/// order.
///
/// # Examples
///
/// ```no_run
/// use pointfuse_pipeline::{FrameSelection, ReconstructionConfig, Reconstructor};
///
/// let config = ReconstructionConfig::new(
///     "office_kt0",
///     "office_kt0/traj0.txt",
///     "office_kt0/associations.txt",
///     1508,
/// );
/// let mut reconstructor = Reconstructor::new(config)?;
///
/// let report = reconstructor.reconstruct(&FrameSelection::Indices(vec![2, 0, 1]));
/// assert_eq!(reconstructor.points().len(), report.num_points * 6);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Reconstructor {
    config: ReconstructionConfig,
    trajectory: Vec<Pose>,
    associations: Associations,
    points: PointBuffer,
    pool: rayon::ThreadPool,
}

impl Reconstructor {
    /// Create a reconstructor and load the dataset metadata.
    ///
    /// An unreadable trajectory or association file is logged and leaves the
    /// corresponding table empty; every frame that needs it is then skipped.
    ///
    /// # Errors
    ///
    /// An invalid configuration or a worker pool that cannot be created.
    pub fn new(config: ReconstructionConfig) -> Result<Self, ReconstructionError> {
        let trajectory = read_trajectory(&config.trajectory_path).unwrap_or_else(|err| {
            log::warn!(
                "could not load trajectory {}: {}",
                config.trajectory_path.display(),
                err
            );
            Vec::new()
        });

        let associations = read_associations(&config.associations_path).unwrap_or_else(|err| {
            log::warn!(
                "could not load associations {}: {}",
                config.associations_path.display(),
                err
            );
            Associations::default()
        });

        log::info!(
            "loaded {} poses, {} color and {} depth associations",
            trajectory.len(),
            associations.color.len(),
            associations.depth.len()
        );

        Self::from_parts(config, trajectory, associations)
    }

    /// Create a reconstructor from metadata already in memory.
    pub fn from_parts(
        config: ReconstructionConfig,
        trajectory: Vec<Pose>,
        associations: Associations,
    ) -> Result<Self, ReconstructionError> {
        config.validate()?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.num_threads())
            .build()?;

        Ok(Self {
            config,
            trajectory,
            associations,
            points: PointBuffer::new(),
            pool,
        })
    }

    /// Reconstruct the selected frames.
    ///
    /// The previous points are discarded. Frames are unprojected in parallel
    /// and their points are concatenated in selection order, so the result
    /// does not depend on the number of threads. Frames that fail are skipped
    /// and reported.
    pub fn reconstruct(&mut self, selection: &FrameSelection) -> ReconstructionReport {
        let indices = selection.resolve(self.config.frame_count);

        self.points.clear();

        log::debug!(
            "reconstructing {} frames on {} threads",
            indices.len(),
            self.pool.current_num_threads()
        );

        let config = &self.config;
        let trajectory = &self.trajectory;
        let associations = &self.associations;

        let segments: Vec<Result<PointBuffer, FrameError>> = self.pool.install(|| {
            indices
                .par_iter()
                .map(|&index| reconstruct_frame(config, trajectory, associations, index))
                .collect()
        });

        let num_points = segments
            .iter()
            .filter_map(|segment| segment.as_ref().ok())
            .map(PointBuffer::len)
            .sum();
        self.points.reserve(num_points);

        let mut report = ReconstructionReport::default();

        // each segment is released once copied
        for (index, segment) in indices.into_iter().zip(segments) {
            match segment {
                Ok(segment) => {
                    self.points.extend_from(&segment);
                    report.processed.push(index);
                }
                Err(error) => {
                    log::warn!("skipping frame {}: {}", index, error);
                    report.skipped.push(SkippedFrame { index, error });
                }
            }
        }

        report.num_points = self.points.len();

        log::info!(
            "reconstructed {} points from {} frames, {} skipped",
            report.num_points,
            report.processed.len(),
            report.skipped.len()
        );

        report
    }

    /// A copy of the accumulated points as `[x, y, z, r, g, b, ...]`.
    pub fn points(&self) -> Vec<f32> {
        self.points.to_vec()
    }

    /// The accumulated points.
    pub fn point_buffer(&self) -> &PointBuffer {
        &self.points
    }

    /// The loaded trajectory.
    pub fn trajectory(&self) -> &[Pose] {
        &self.trajectory
    }

    /// The loaded association table.
    pub fn associations(&self) -> &Associations {
        &self.associations
    }

    /// The configuration.
    pub fn config(&self) -> &ReconstructionConfig {
        &self.config
    }

    /// The camera positions of the trajectory as `[x, y, z, ...]`.
    pub fn camera_path(&self) -> Vec<f32> {
        camera_path(&self.trajectory)
    }
}

fn reconstruct_frame(
    config: &ReconstructionConfig,
    trajectory: &[Pose],
    associations: &Associations,
    index: usize,
) -> Result<PointBuffer, FrameError> {
    let pose = trajectory.get(index).ok_or(FrameError::MissingFrameData {
        index,
        missing: MissingData::Pose,
    })?;

    let frame = load_frame(&config.images_dir, associations, index)?;

    let mut segment = PointBuffer::with_capacity(frame.size().num_pixels());
    unproject_frame(
        &frame,
        pose,
        &config.intrinsics,
        config.depth_scale,
        &mut segment,
    );

    Ok(segment)
}
