use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Default scale from raw 16-bit depth samples to scene units.
///
/// A sample `d` maps to `d * 1000 / 65536`.
pub const DEFAULT_DEPTH_SCALE: f32 = 1000.0 / 65536.0;

/// A struct representing the intrinsic parameters of a pinhole camera.
///
/// The defaults are the calibration of the ICL-NUIM synthetic sensor, whose
/// vertical focal length is negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PinholeIntrinsics {
    /// The focal length in pixels along x
    pub fx: f32,
    /// The focal length in pixels along y
    pub fy: f32,
    /// The principal point in pixels along x
    pub cx: f32,
    /// The principal point in pixels along y
    pub cy: f32,
}

impl Default for PinholeIntrinsics {
    fn default() -> Self {
        Self {
            fx: 481.2,
            fy: -480.0,
            cx: 319.5,
            cy: 239.5,
        }
    }
}

impl PinholeIntrinsics {
    /// Creates a new PinholeIntrinsics with the given parameters.
    pub fn new(fx: f32, fy: f32, cx: f32, cy: f32) -> Self {
        Self { fx, fy, cx, cy }
    }

    /// Unproject the pixel at column `u` and row `v` with depth `z` into camera space.
    ///
    /// With `x = -(u - cx) / fx * z` and `y = (v - cy) / fy * z`, the returned
    /// point is `(y, x, z)`. The first two axes are swapped on purpose: this is
    /// the camera frame the trajectories of the dataset are expressed in.
    ///
    /// Example:
    ///
    /// ```
    /// use pointfuse_3d::camera::PinholeIntrinsics;
    ///
    /// let intrinsics = PinholeIntrinsics::new(1.0, 1.0, 0.0, 0.0);
    /// let p = intrinsics.unproject(2.0, 3.0, 1.0);
    /// assert_eq!(p.to_array(), [3.0, -2.0, 1.0]);
    /// ```
    #[inline]
    pub fn unproject(&self, u: f32, v: f32, z: f32) -> Vec3 {
        let x = -(u - self.cx) / self.fx * z;
        let y = (v - self.cy) / self.fy * z;
        Vec3::new(y, x, z)
    }
}
