use std::path::Path;

use approx::assert_relative_eq;
use pointfuse_3d::{camera::DEFAULT_DEPTH_SCALE, io::ply::write_ply_ascii, pointcloud::POINT_STRIDE};
use pointfuse_image::Image;
use pointfuse_io::png::{write_image_png_gray16, write_image_png_gray8, write_image_png_rgb8};
use pointfuse_pipeline::{
    FrameError, FrameSelection, MissingData, ReconstructionConfig, Reconstructor,
};

const WIDTH: usize = 4;
const HEIGHT: usize = 3;
const NUM_PIXELS: usize = WIDTH * HEIGHT;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn frame_color(index: usize) -> [u8; 3] {
    [30 + 50 * index as u8, 20, 10]
}

fn frame_depth(index: usize) -> u16 {
    1000 * index as u16
}

fn frame_translation(index: usize) -> [f32; 3] {
    let i = index as f32 + 1.0;
    [i, -i, 2.0 * i]
}

// frames 0..3 are valid, 3 has an 8-bit depth, 4 has mismatched sizes and
// 5 has no depth association
fn write_dataset(root: &Path) -> Result<ReconstructionConfig, Box<dyn std::error::Error>> {
    std::fs::create_dir_all(root.join("rgb"))?;
    std::fs::create_dir_all(root.join("depth"))?;

    let size = [WIDTH, HEIGHT].into();
    for index in 0..3 {
        let color = Image::<u8, 3>::new(size, frame_color(index).repeat(NUM_PIXELS))?;
        let depth = Image::<u16, 1>::from_size_val(size, frame_depth(index))?;
        write_image_png_rgb8(root.join(format!("rgb/{index}.png")), &color)?;
        write_image_png_gray16(root.join(format!("depth/{index}.png")), &depth)?;
    }

    let color = Image::<u8, 3>::from_size_val(size, 0)?;
    write_image_png_rgb8(root.join("rgb/3.png"), &color)?;
    write_image_png_rgb8(root.join("rgb/4.png"), &color)?;
    write_image_png_gray8(
        root.join("depth/3.png"),
        &Image::<u8, 1>::from_size_val(size, 1)?,
    )?;
    write_image_png_gray16(
        root.join("depth/4.png"),
        &Image::<u16, 1>::from_size_val([WIDTH + 1, HEIGHT].into(), 1)?,
    )?;

    let mut trajectory = String::from("# id tx ty tz qx qy qz qw\n");
    for index in 0..6 {
        let [x, y, z] = frame_translation(index);
        trajectory.push_str(&format!("{index} {x} {y} {z} 0 0 0 1\n"));
    }
    std::fs::write(root.join("traj.txt"), trajectory)?;

    let mut associations = String::new();
    for index in 0..5 {
        associations.push_str(&format!("{index} rgb/{index}.png {index} depth/{index}.png\n"));
    }
    associations.push_str("5 rgb/0.png\n");
    associations.push_str("not an association\n");
    std::fs::write(root.join("associations.txt"), associations)?;

    Ok(ReconstructionConfig::new(
        root,
        root.join("traj.txt"),
        root.join("associations.txt"),
        3,
    ))
}

#[test]
fn test_reconstruct_selected_order() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();
    let tmp_dir = tempfile::tempdir()?;
    let config = write_dataset(tmp_dir.path())?.with_num_threads(2);

    let mut reconstructor = Reconstructor::new(config)?;
    let report = reconstructor.reconstruct(&FrameSelection::Indices(vec![2, 0, 1]));

    assert!(report.is_complete());
    assert_eq!(report.processed, vec![2, 0, 1]);
    assert_eq!(report.num_points, 3 * NUM_PIXELS);

    let points = reconstructor.points();
    assert_eq!(points.len(), 3 * NUM_PIXELS * POINT_STRIDE);

    for (group, index) in [2usize, 0, 1].into_iter().enumerate() {
        let [r, g, b] = frame_color(index);
        let segment = &points[group * NUM_PIXELS * POINT_STRIDE..][..NUM_PIXELS * POINT_STRIDE];
        for p in segment.chunks_exact(POINT_STRIDE) {
            assert_eq!(p[3], r as f32);
            assert_eq!(p[4], g as f32);
            assert_eq!(p[5], b as f32);
        }
    }

    Ok(())
}

#[test]
fn test_reconstruct_zero_depth_is_translation() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;
    let config = write_dataset(tmp_dir.path())?.with_num_threads(1);

    let mut reconstructor = Reconstructor::new(config)?;
    let report = reconstructor.reconstruct(&FrameSelection::Indices(vec![0]));
    assert_eq!(report.num_points, NUM_PIXELS);

    let [tx, ty, tz] = frame_translation(0);
    for p in reconstructor.point_buffer().points() {
        assert_eq!([p[0], p[1], p[2]], [tx, ty, tz]);
        assert_eq!([p[3], p[4], p[5]], [30.0, 20.0, 10.0]);
    }

    Ok(())
}

#[test]
fn test_reconstruct_depth_geometry() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;
    let config = write_dataset(tmp_dir.path())?.with_num_threads(1);
    let intrinsics = config.intrinsics;

    let mut reconstructor = Reconstructor::new(config)?;
    reconstructor.reconstruct(&FrameSelection::Indices(vec![1]));

    let z = frame_depth(1) as f32 * DEFAULT_DEPTH_SCALE;
    let [tx, ty, tz] = frame_translation(1);

    for (idx, p) in reconstructor.point_buffer().points().enumerate() {
        let (u, v) = ((idx % WIDTH) as f32, (idx / WIDTH) as f32);
        let x_cam = -(u - intrinsics.cx) / intrinsics.fx * z;
        let y_cam = (v - intrinsics.cy) / intrinsics.fy * z;

        // unit quaternion rotates by diag(-1, -1, 1) on (y_cam, x_cam, z)
        assert_relative_eq!(p[0], -y_cam + tx, epsilon = 1e-4);
        assert_relative_eq!(p[1], -x_cam + ty, epsilon = 1e-4);
        assert_relative_eq!(p[2], z + tz, epsilon = 1e-4);
    }

    Ok(())
}

#[test]
fn test_reconstruct_all_frames_and_clear() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;
    let config = write_dataset(tmp_dir.path())?;

    let mut reconstructor = Reconstructor::new(config)?;

    let report = reconstructor.reconstruct(&FrameSelection::AllFrames);
    assert_eq!(report.processed, vec![0, 1, 2]);
    assert_eq!(reconstructor.point_buffer().len(), 3 * NUM_PIXELS);

    // the output is allocated once for all the frames
    assert_eq!(reconstructor.point_buffer().capacity(), 3 * NUM_PIXELS);

    let report = reconstructor.reconstruct(&FrameSelection::Indices(vec![1]));
    assert_eq!(report.processed, vec![1]);
    assert_eq!(reconstructor.point_buffer().len(), NUM_PIXELS);

    let report = reconstructor.reconstruct(&FrameSelection::Indices(vec![]));
    assert_eq!(report.num_points, 0);
    assert!(reconstructor.points().is_empty());

    // repeated indices are processed again
    let report = reconstructor.reconstruct(&FrameSelection::Indices(vec![0, 0]));
    assert_eq!(report.processed, vec![0, 0]);
    assert_eq!(report.num_points, 2 * NUM_PIXELS);

    Ok(())
}

#[test]
fn test_reconstruct_skips_bad_frames() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();
    let tmp_dir = tempfile::tempdir()?;
    let config = write_dataset(tmp_dir.path())?;

    let mut reconstructor = Reconstructor::new(config)?;
    let report = reconstructor.reconstruct(&FrameSelection::Indices(vec![3, 0, 4, 5, 9, 2]));

    assert_eq!(report.processed, vec![0, 2]);
    assert_eq!(report.skipped_indices(), vec![3, 4, 5, 9]);
    assert_eq!(report.num_points, 2 * NUM_PIXELS);

    assert!(matches!(report.skipped[0].error, FrameError::DepthFormat { .. }));
    assert!(matches!(report.skipped[1].error, FrameError::SizeMismatch(_)));
    assert!(matches!(
        report.skipped[2].error,
        FrameError::MissingFrameData {
            index: 5,
            missing: MissingData::DepthPath
        }
    ));
    assert!(matches!(
        report.skipped[3].error,
        FrameError::MissingFrameData {
            index: 9,
            missing: MissingData::Pose
        }
    ));

    // skipped frames leave no trace in the output
    let points = reconstructor.points();
    assert_eq!(points[3], frame_color(0)[0] as f32);
    assert_eq!(points[NUM_PIXELS * POINT_STRIDE + 3], frame_color(2)[0] as f32);

    Ok(())
}

#[test]
fn test_malformed_associations() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;
    let config = write_dataset(tmp_dir.path())?;

    let reconstructor = Reconstructor::new(config)?;
    let associations = reconstructor.associations();

    assert_eq!(associations.color_path(5), Some("rgb/0.png"));
    assert_eq!(associations.depth_path(5), None);
    assert_eq!(associations.color.len(), 6);
    assert_eq!(associations.depth.len(), 5);
    assert_eq!(reconstructor.trajectory().len(), 6);

    Ok(())
}

#[test]
fn test_parallel_matches_serial() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;
    let config = write_dataset(tmp_dir.path())?;
    let selection = FrameSelection::Indices(vec![1, 2, 0, 2, 4, 1]);

    let mut serial = Reconstructor::new(config.clone().with_num_threads(1))?;
    let mut parallel = Reconstructor::new(config.with_num_threads(4))?;

    let serial_report = serial.reconstruct(&selection);
    let parallel_report = parallel.reconstruct(&selection);

    assert_eq!(serial_report.processed, parallel_report.processed);
    assert_eq!(serial_report.skipped_indices(), parallel_report.skipped_indices());
    assert_eq!(serial.points(), parallel.points());

    Ok(())
}

#[test]
fn test_export_ply() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;
    let config = write_dataset(tmp_dir.path())?;

    let mut reconstructor = Reconstructor::new(config)?;
    reconstructor.reconstruct(&FrameSelection::AllFrames);

    let path = tmp_dir.path().join("cloud.ply");
    write_ply_ascii(&path, reconstructor.point_buffer())?;

    let content = std::fs::read_to_string(&path)?;
    assert!(content.contains(&format!("element vertex {}", 3 * NUM_PIXELS)));
    assert_eq!(content.lines().count(), 10 + 3 * NUM_PIXELS);

    Ok(())
}
