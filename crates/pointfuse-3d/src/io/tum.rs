use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::pose::Pose;

/// Error types for the trajectory and association readers.
#[derive(Debug, thiserror::Error)]
pub enum TumError {
    /// Error reading the file
    #[error("error reading file {0}")]
    IoError(#[from] std::io::Error),
}

/// The per-frame image paths of a dataset.
///
/// Color and depth entries are indexed independently: a frame index may be
/// present in one map and missing in the other.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Associations {
    /// Frame index to color image path, relative to the images directory.
    pub color: BTreeMap<usize, String>,
    /// Frame index to depth image path, relative to the images directory.
    pub depth: BTreeMap<usize, String>,
}

impl Associations {
    /// The relative color image path of a frame.
    pub fn color_path(&self, index: usize) -> Option<&str> {
        self.color.get(&index).map(String::as_str)
    }

    /// The relative depth image path of a frame.
    pub fn depth_path(&self, index: usize) -> Option<&str> {
        self.depth.get(&index).map(String::as_str)
    }

    /// Check if neither map has any entry.
    pub fn is_empty(&self) -> bool {
        self.color.is_empty() && self.depth.is_empty()
    }
}

/// Read a trajectory file and return its poses in file order.
///
/// Each line holds `id x y z qx qy qz qw` separated by whitespace. Blank lines
/// and lines starting with `#` are skipped.
///
/// A malformed line is not an error: the fields parsed before the first
/// missing or invalid token are kept, the remaining ones are left at zero and
/// a warning is logged. Invalid UTF-8 is replaced before parsing, and a read
/// error in the middle of the file ends it with the poses read so far.
///
/// # Arguments
///
/// * `path` - The path to the trajectory file.
pub fn read_trajectory(path: impl AsRef<Path>) -> Result<Vec<Pose>, TumError> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);

    let mut poses = Vec::new();
    for_each_record(path, reader, |line_no, line| {
        let (pose, complete) = parse_pose_line(line);
        if !complete {
            log::warn!(
                "{}:{}: incomplete trajectory record `{}`",
                path.display(),
                line_no,
                line
            );
        }
        poses.push(pose);
    });

    log::debug!("read {} poses from {}", poses.len(), path.display());

    Ok(poses)
}

/// Read an association file and return the color and depth path tables.
///
/// Each line holds `color_index color_path depth_index depth_path` separated
/// by whitespace. Blank lines and lines starting with `#` are skipped. The two
/// pairs are inserted independently; a later entry for the same index
/// overwrites an earlier one.
///
/// A pair is inserted only when both its tokens are present and the index is
/// an unsigned integer. A line with fewer than four tokens therefore inserts
/// at most its color pair. Malformed lines are logged and never fail the read;
/// invalid UTF-8 and mid-file read errors are handled as in [`read_trajectory`].
///
/// # Arguments
///
/// * `path` - The path to the association file.
pub fn read_associations(path: impl AsRef<Path>) -> Result<Associations, TumError> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);

    let mut associations = Associations::default();
    for_each_record(path, reader, |line_no, line| {
        let parts = line.split_whitespace().collect::<Vec<_>>();
        if parts.len() != 4 {
            log::warn!(
                "{}:{}: expected 4 fields, found {}",
                path.display(),
                line_no,
                parts.len()
            );
        }

        let color_ok = insert_pair(&mut associations.color, &parts, 0);
        let depth_ok = insert_pair(&mut associations.depth, &parts, 2);
        if parts.len() >= 4 && !(color_ok && depth_ok) {
            log::warn!(
                "{}:{}: invalid frame index in `{}`",
                path.display(),
                line_no,
                line
            );
        }
    });

    log::debug!(
        "read {} color and {} depth associations from {}",
        associations.color.len(),
        associations.depth.len(),
        path.display()
    );

    Ok(associations)
}

// feed the non blank, non comment lines to `parse`, numbered from 1. Invalid
// utf-8 is replaced and a read error ends the file, keeping what came before.
fn for_each_record<R: BufRead>(path: &Path, reader: R, mut parse: impl FnMut(usize, &str)) {
    for (line_no, bytes) in reader.split(b'\n').enumerate() {
        let bytes = match bytes {
            Ok(bytes) => bytes,
            Err(err) => {
                log::warn!(
                    "{}:{}: stopped reading: {}",
                    path.display(),
                    line_no + 1,
                    err
                );
                break;
            }
        };

        let line = match String::from_utf8(bytes) {
            Ok(line) => line,
            Err(err) => {
                log::warn!("{}:{}: invalid utf-8", path.display(), line_no + 1);
                String::from_utf8_lossy(err.as_bytes()).into_owned()
            }
        };

        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        parse(line_no + 1, line);
    }
}

// parse the fields in order, stopping at the first missing or invalid one
fn parse_pose_line(line: &str) -> (Pose, bool) {
    let mut parts = line.split_whitespace();
    let mut pose = Pose::default();

    let Some(id) = parts.next().and_then(|s| s.parse::<i64>().ok()) else {
        return (pose, false);
    };
    pose.id = id;

    // x y z qx qy qz qw
    let mut values = [0.0f32; 7];
    let mut complete = true;
    for value in values.iter_mut() {
        match parts.next().and_then(|s| s.parse::<f32>().ok()) {
            Some(v) => *value = v,
            None => {
                complete = false;
                break;
            }
        }
    }

    pose.position = [values[0], values[1], values[2]];
    pose.orientation = [values[3], values[4], values[5], values[6]];

    (pose, complete)
}

fn insert_pair(map: &mut BTreeMap<usize, String>, parts: &[&str], offset: usize) -> bool {
    match (parts.get(offset), parts.get(offset + 1)) {
        (Some(index), Some(path)) => match index.parse::<usize>() {
            Ok(index) => {
                map.insert(index, path.to_string());
                true
            }
            Err(_) => false,
        },
        _ => false,
    }
}
