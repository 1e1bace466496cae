use std::path::Path;

use pointfuse_3d::{io::tum::Associations, rgbd::RgbdFrame};
use pointfuse_io::{functional::read_image_any_rgb8, png::read_image_png_mono16, IoError};

use crate::error::{FrameError, MissingData};

/// Load the color and depth images of a frame.
///
/// The paths come from the association table and are resolved against
/// `images_dir`. The color image may be in any format the image crate reads
/// and is converted to rgb8; the depth image must be a single channel 16-bit
/// PNG.
///
/// # Arguments
///
/// * `images_dir` - The directory the association paths are relative to.
/// * `associations` - The association table of the dataset.
/// * `index` - The frame index.
///
/// # Errors
///
/// Any missing path, decoding failure, format mismatch or size mismatch
/// between the two images is reported, and no frame is returned.
pub fn load_frame(
    images_dir: &Path,
    associations: &Associations,
    index: usize,
) -> Result<RgbdFrame, FrameError> {
    let color_rel = associations
        .color_path(index)
        .ok_or(FrameError::MissingFrameData {
            index,
            missing: MissingData::ColorPath,
        })?;
    let depth_rel = associations
        .depth_path(index)
        .ok_or(FrameError::MissingFrameData {
            index,
            missing: MissingData::DepthPath,
        })?;

    let color_path = images_dir.join(color_rel);
    let depth_path = images_dir.join(depth_rel);

    let color = read_image_any_rgb8(&color_path).map_err(|source| FrameError::ColorDecode {
        path: color_path.clone(),
        source,
    })?;

    let depth = read_image_png_mono16(&depth_path).map_err(|source| match source {
        IoError::UnsupportedPixelFormat { found, .. } => FrameError::DepthFormat {
            path: depth_path.clone(),
            found,
        },
        source => FrameError::DepthDecode {
            path: depth_path.clone(),
            source,
        },
    })?;

    log::trace!(
        "loaded frame {} ({}x{}) from {} and {}",
        index,
        depth.width(),
        depth.height(),
        color_path.display(),
        depth_path.display()
    );

    Ok(RgbdFrame::new(color, depth)?)
}
