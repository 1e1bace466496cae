#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Pinhole camera intrinsics.
pub mod camera;

/// I/O utilities for reading dataset metadata and writing point clouds.
pub mod io;

/// Flat colored point buffer.
pub mod pointcloud;

/// Camera poses and rigid transforms.
pub mod pose;

/// Paired color and depth images of one frame.
pub mod rgbd;

/// Depth unprojection into world space.
pub mod unproject;
