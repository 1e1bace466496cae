use glam::Vec3;

/// Number of `f32` values stored per point: `x, y, z, r, g, b`.
pub const POINT_STRIDE: usize = 6;

/// A flat, append-only buffer of colored points.
///
/// Each point takes [`POINT_STRIDE`] consecutive values `(x, y, z, r, g, b)`,
/// with the color channels kept as raw `0..=255` magnitudes. The layout is the
/// one a renderer uploads as an interleaved vertex buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointBuffer {
    data: Vec<f32>,
}

impl PointBuffer {
    /// Create an empty point buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty point buffer with room for `num_points` points.
    pub fn with_capacity(num_points: usize) -> Self {
        Self {
            data: Vec::with_capacity(num_points * POINT_STRIDE),
        }
    }

    /// Append one point.
    #[inline]
    pub fn push(&mut self, position: [f32; 3], color: [u8; 3]) {
        self.data.extend_from_slice(&[
            position[0],
            position[1],
            position[2],
            color[0] as f32,
            color[1] as f32,
            color[2] as f32,
        ]);
    }

    /// Append all the points of another buffer.
    pub fn extend_from(&mut self, other: &PointBuffer) {
        self.data.extend_from_slice(&other.data);
    }

    /// Reserve room for at least `num_points` more points.
    pub fn reserve(&mut self, num_points: usize) {
        self.data.reserve(num_points * POINT_STRIDE);
    }

    /// The number of points the buffer holds without reallocating.
    pub fn capacity(&self) -> usize {
        self.data.capacity() / POINT_STRIDE
    }

    /// Remove all points, keeping the allocation.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Get the number of points in the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len() / POINT_STRIDE
    }

    /// Check if the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The flat `[x, y, z, r, g, b, ...]` values.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Copy the flat values out of the buffer.
    pub fn to_vec(&self) -> Vec<f32> {
        self.data.clone()
    }

    /// Iterate over the points, each one as a `[x, y, z, r, g, b]` slice.
    pub fn points(&self) -> std::slice::ChunksExact<'_, f32> {
        self.data.chunks_exact(POINT_STRIDE)
    }

    /// Get the axis aligned bounds `(min, max)` of the point positions.
    ///
    /// Returns `None` for an empty buffer.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut points = self.points().map(|p| Vec3::new(p[0], p[1], p[2]));
        let first = points.next()?;
        Some(points.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }
}
