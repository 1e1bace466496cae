/// PLY writer module.
pub mod ply;

/// Trajectory and association readers for TUM/ICL-NUIM style datasets.
pub mod tum;
