use pointfuse_image::{Image, ImageSize};

/// Error types for the RGB-D frame module.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RgbdError {
    /// The color and depth images do not cover the same pixels.
    #[error("Color image size {color} does not match depth image size {depth}")]
    SizeMismatch {
        /// The size of the color image.
        color: ImageSize,
        /// The size of the depth image.
        depth: ImageSize,
    },
}

/// A registered color and depth image pair of a single frame.
#[derive(Debug, Clone)]
pub struct RgbdFrame {
    color: Image<u8, 3>,
    depth: Image<u16, 1>,
}

impl RgbdFrame {
    /// Creates a new RgbdFrame from a rgb8 color image and a mono16 depth image.
    ///
    /// # Errors
    ///
    /// Both images must have the same width and height.
    pub fn new(color: Image<u8, 3>, depth: Image<u16, 1>) -> Result<Self, RgbdError> {
        if color.size() != depth.size() {
            return Err(RgbdError::SizeMismatch {
                color: color.size(),
                depth: depth.size(),
            });
        }
        Ok(Self { color, depth })
    }

    /// Returns the dimensions of the frame.
    pub fn size(&self) -> ImageSize {
        self.depth.size()
    }

    /// The width of the frame in pixels.
    pub fn width(&self) -> usize {
        self.depth.width()
    }

    /// The height of the frame in pixels.
    pub fn height(&self) -> usize {
        self.depth.height()
    }

    /// The color image, in RGB channel order.
    pub fn color(&self) -> &Image<u8, 3> {
        &self.color
    }

    /// The raw 16-bit depth image.
    pub fn depth(&self) -> &Image<u16, 1> {
        &self.depth
    }
}
