use std::{fs, fs::File, io::Read, path::Path};

use png::{BitDepth, ColorType, Decoder, Encoder};
use pointfuse_image::{Image, ImageSize};

use crate::{
    conv_utils::{convert_buf_u16_u8, convert_buf_u8_u16},
    error::IoError,
};

/// Read a PNG image with a single channel (mono16).
///
/// The native bit depth is preserved, so this is the reader for depth maps.
///
/// # Arguments
///
/// * `file_path` - The path to the PNG file.
///
/// # Returns
///
/// A grayscale image with a single channel (mono16).
///
/// # Errors
///
/// Fails with [`IoError::UnsupportedPixelFormat`] if the file is not a
/// single channel 16-bit PNG.
pub fn read_image_png_mono16(file_path: impl AsRef<Path>) -> Result<Image<u16, 1>, IoError> {
    let frame = read_png_impl(file_path)?;
    frame.into_mono16()
}

/// Writes the given PNG _(rgb8)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The image to encode.
pub fn write_image_png_rgb8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 3>,
) -> Result<(), IoError> {
    write_png_impl(
        file_path,
        image.as_slice(),
        image.size(),
        BitDepth::Eight,
        ColorType::Rgb,
    )
}

/// Writes the given PNG _(grayscale 8-bit)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The image to encode.
pub fn write_image_png_gray8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 1>,
) -> Result<(), IoError> {
    write_png_impl(
        file_path,
        image.as_slice(),
        image.size(),
        BitDepth::Eight,
        ColorType::Grayscale,
    )
}

/// Writes the given PNG _(grayscale 16-bit)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The image to encode.
pub fn write_image_png_gray16(
    file_path: impl AsRef<Path>,
    image: &Image<u16, 1>,
) -> Result<(), IoError> {
    let image_buf = convert_buf_u16_u8(image.as_slice());

    write_png_impl(
        file_path,
        &image_buf,
        image.size(),
        BitDepth::Sixteen,
        ColorType::Grayscale,
    )
}

// a decoded png frame before it is turned into a typed image
struct PngFrame {
    buf: Vec<u8>,
    size: ImageSize,
    color_type: ColorType,
    bit_depth: BitDepth,
}

impl PngFrame {
    fn check_format(&self, color_type: ColorType, bit_depth: BitDepth) -> Result<(), IoError> {
        if self.color_type != color_type || self.bit_depth != bit_depth {
            return Err(IoError::UnsupportedPixelFormat {
                expected: format!("{:?} {:?}", color_type, bit_depth),
                found: format!("{:?} {:?}", self.color_type, self.bit_depth),
            });
        }
        Ok(())
    }

    fn into_mono16(self) -> Result<Image<u16, 1>, IoError> {
        self.check_format(ColorType::Grayscale, BitDepth::Sixteen)?;
        let buf_u16 = convert_buf_u8_u16(&self.buf);
        Ok(Image::new(self.size, buf_u16)?)
    }
}

// utility function to read the png file
fn read_png_impl(file_path: impl AsRef<Path>) -> Result<PngFrame, IoError> {
    // verify the file exists
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    // verify the file extension
    let is_png = file_path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if !is_png {
        return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
    }

    let file = fs::File::open(file_path)?;
    decode_png_impl(file)
}

// decode a png stream without any transformation, keeping the stored bit depth
fn decode_png_impl<R: Read>(source: R) -> Result<PngFrame, IoError> {
    let mut reader = Decoder::new(source)
        .read_info()
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;
    buf.truncate(info.buffer_size());

    Ok(PngFrame {
        buf,
        size: ImageSize {
            width: info.width as usize,
            height: info.height as usize,
        },
        color_type: info.color_type,
        bit_depth: info.bit_depth,
    })
}

fn write_png_impl(
    file_path: impl AsRef<Path>,
    image_data: &[u8],
    image_size: ImageSize,
    // Make sure you set `depth` correctly
    depth: BitDepth,
    color_type: ColorType,
) -> Result<(), IoError> {
    let file = File::create(file_path)?;

    let mut encoder = Encoder::new(file, image_size.width as u32, image_size.height as u32);
    encoder.set_color(color_type);
    encoder.set_depth(depth);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    writer
        .write_image_data(image_data)
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    Ok(())
}
