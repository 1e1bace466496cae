use glam::{Mat4, Vec3, Vec4};

/// A camera pose at capture time, as stored in a trajectory file.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pose {
    /// The frame id written in the trajectory file.
    pub id: i64,
    /// The camera position in world coordinates (x, y, z).
    pub position: [f32; 3],
    /// The camera orientation as a quaternion (qx, qy, qz, qw).
    pub orientation: [f32; 4],
}

impl Pose {
    /// Creates a new Pose.
    pub fn new(id: i64, position: [f32; 3], orientation: [f32; 4]) -> Self {
        Self {
            id,
            position,
            orientation,
        }
    }

    /// Compute the rotation block of the pose from its quaternion.
    ///
    /// The matrix is row-major and built with the expression
    ///
    /// ```text
    /// [ 2(qx²+qy²)-1   2(qyqz-qxqw)   2(qyqw+qxqz) ]
    /// [ 2(qyqz+qxqw)   2(qx²+qz²)-1   2(qzqw-qxqy) ]
    /// [ 2(qyqw-qxqz)   2(qzqw+qxqy)   2(qx²+qw²)-1 ]
    /// ```
    ///
    /// which matches the dataset trajectories together with the axis order of
    /// [`crate::camera::PinholeIntrinsics::unproject`]. It is not the textbook
    /// quaternion rotation: `(0, 0, 0, 1)` maps to `diag(-1, -1, 1)`.
    ///
    /// Example:
    ///
    /// ```
    /// use pointfuse_3d::pose::Pose;
    ///
    /// let pose = Pose::new(0, [0.0; 3], [0.0, 0.0, 0.0, 1.0]);
    /// assert_eq!(
    ///     pose.rotation_matrix(),
    ///     [[-1.0, 0.0, 0.0], [0.0, -1.0, 0.0], [0.0, 0.0, 1.0]]
    /// );
    /// ```
    pub fn rotation_matrix(&self) -> [[f32; 3]; 3] {
        let [qx, qy, qz, qw] = self.orientation;

        let m00 = 2.0 * (qx * qx + qy * qy) - 1.0;
        let m01 = 2.0 * (qy * qz - qx * qw);
        let m02 = 2.0 * (qy * qw + qx * qz);

        let m10 = 2.0 * (qy * qz + qx * qw);
        let m11 = 2.0 * (qx * qx + qz * qz) - 1.0;
        let m12 = 2.0 * (qz * qw - qx * qy);

        let m20 = 2.0 * (qy * qw - qx * qz);
        let m21 = 2.0 * (qz * qw + qx * qy);
        let m22 = 2.0 * (qx * qx + qw * qw) - 1.0;

        [[m00, m01, m02], [m10, m11, m12], [m20, m21, m22]]
    }

    /// The 4x4 rigid transform from camera to world coordinates.
    ///
    /// Rotation block from [`Pose::rotation_matrix`], translation column from
    /// the position and `(0, 0, 0, 1)` as the bottom row.
    pub fn transform(&self) -> Mat4 {
        let r = self.rotation_matrix();
        let [tx, ty, tz] = self.position;

        // glam is column-major
        Mat4::from_cols(
            Vec4::new(r[0][0], r[1][0], r[2][0], 0.0),
            Vec4::new(r[0][1], r[1][1], r[2][1], 0.0),
            Vec4::new(r[0][2], r[1][2], r[2][2], 0.0),
            Vec4::new(tx, ty, tz, 1.0),
        )
    }

    /// Transform a camera-space point into world coordinates.
    pub fn transform_point(&self, point: [f32; 3]) -> [f32; 3] {
        let p = self.transform() * Vec3::from_array(point).extend(1.0);
        p.truncate().to_array()
    }
}

/// Flatten the camera positions of a trajectory into `[x, y, z, x, y, z, ...]`.
///
/// The order follows the trajectory, which is what a renderer needs to draw
/// the camera path as a line strip.
pub fn camera_path(poses: &[Pose]) -> Vec<f32> {
    poses.iter().flat_map(|pose| pose.position).collect()
}
