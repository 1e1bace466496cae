use crate::{camera::PinholeIntrinsics, pointcloud::PointBuffer, pose::Pose, rgbd::RgbdFrame};

/// Unproject every pixel of a frame into world space and append it to a point buffer.
///
/// For the pixel at row `v` and column `u` the raw depth `d` is scaled to
/// `z = d * depth_scale`, unprojected with [`PinholeIntrinsics::unproject`]
/// and moved to world coordinates with [`Pose::transform`]. The point
/// `(x, y, z, r, g, b)` is then appended to `dst`.
///
/// Pixels are visited row by row, so exactly `width * height` points are
/// appended in raster order. Invalid depth values (zero or saturated) are not
/// filtered out.
///
/// # Arguments
///
/// * `frame` - The color and depth images of the frame.
/// * `pose` - The camera pose of the frame.
/// * `intrinsics` - The camera intrinsics.
/// * `depth_scale` - The factor from raw depth samples to scene units.
/// * `dst` - The buffer the points are appended to.
///
/// Example:
///
/// ```
/// use pointfuse_3d::{
///     camera::{PinholeIntrinsics, DEFAULT_DEPTH_SCALE},
///     pointcloud::PointBuffer,
///     pose::Pose,
///     rgbd::RgbdFrame,
///     unproject::unproject_frame,
/// };
/// use pointfuse_image::Image;
///
/// let color = Image::<u8, 3>::from_size_val([4, 3].into(), 0).unwrap();
/// let depth = Image::<u16, 1>::from_size_val([4, 3].into(), 1000).unwrap();
/// let frame = RgbdFrame::new(color, depth).unwrap();
/// let pose = Pose::new(0, [0.0; 3], [0.0, 0.0, 0.0, 1.0]);
///
/// let mut points = PointBuffer::new();
/// unproject_frame(&frame, &pose, &PinholeIntrinsics::default(), DEFAULT_DEPTH_SCALE, &mut points);
/// assert_eq!(points.len(), 12);
/// ```
pub fn unproject_frame(
    frame: &RgbdFrame,
    pose: &Pose,
    intrinsics: &PinholeIntrinsics,
    depth_scale: f32,
    dst: &mut PointBuffer,
) {
    let world_from_camera = pose.transform();

    let width = frame.width();

    dst.reserve(frame.size().num_pixels());

    let samples = frame.depth().as_slice().iter().zip(frame.color().pixels());
    for (idx, (&d, rgb)) in samples.enumerate() {
        let (u, v) = (idx % width, idx / width);

        let z = d as f32 * depth_scale;
        let point_camera = intrinsics.unproject(u as f32, v as f32, z);
        let point_world = world_from_camera * point_camera.extend(1.0);

        dst.push(point_world.truncate().to_array(), [rgb[0], rgb[1], rgb[2]]);
    }
}
