use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::pointcloud::PointBuffer;

/// Error types for the PLY module.
#[derive(Debug, thiserror::Error)]
pub enum PlyError {
    /// Failed to write PLY file
    #[error("Failed to write PLY file")]
    Io(#[from] std::io::Error),
}

/// Write a point buffer as an ASCII PLY file.
///
/// Positions are written as `float x y z` and colors as `uchar red green blue`.
///
/// # Arguments
///
/// * `path` - The path to the output file.
/// * `points` - The points to write.
pub fn write_ply_ascii(path: impl AsRef<Path>, points: &PointBuffer) -> Result<(), PlyError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_ply_ascii_to(&mut writer, points)?;
    writer.flush()?;
    Ok(())
}

/// Write a point buffer as ASCII PLY into any writer.
pub fn write_ply_ascii_to<W: Write>(writer: &mut W, points: &PointBuffer) -> Result<(), PlyError> {
    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "element vertex {}", points.len())?;
    writeln!(writer, "property float x")?;
    writeln!(writer, "property float y")?;
    writeln!(writer, "property float z")?;
    writeln!(writer, "property uchar red")?;
    writeln!(writer, "property uchar green")?;
    writeln!(writer, "property uchar blue")?;
    writeln!(writer, "end_header")?;

    for p in points.points() {
        writeln!(
            writer,
            "{} {} {} {} {} {}",
            p[0],
            p[1],
            p[2],
            to_u8(p[3]),
            to_u8(p[4]),
            to_u8(p[5])
        )?;
    }

    Ok(())
}

#[inline]
fn to_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
