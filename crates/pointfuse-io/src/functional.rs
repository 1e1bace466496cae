use std::path::Path;

use pointfuse_image::{Image, ImageSize};

use crate::error::IoError;

/// Reads an image of any format supported by the image crate as rgb8.
///
/// Grayscale, alpha and 16-bit sources are converted to three 8-bit channels,
/// so the result always has RGB channel order.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An image containing the image data.
pub fn read_image_any_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let file_path = file_path.as_ref();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let img = image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;

    if img.color() != image::ColorType::Rgb8 {
        log::debug!(
            "converting {:?} image to rgb8: {}",
            img.color(),
            file_path.display()
        );
    }

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    Ok(Image::new(size, img.into_rgb8().into_raw())?)
}

#[cfg(test)]
mod tests {
    use crate::error::IoError;
    use crate::functional::read_image_any_rgb8;
    use crate::png::{write_image_png_gray8, write_image_png_rgb8};
    use pointfuse_image::Image;

    #[test]
    fn read_any_rgb8() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("color.png");

        let image = Image::<u8, 3>::new([1, 2].into(), vec![30, 20, 10, 4, 5, 6])?;
        write_image_png_rgb8(&file_path, &image)?;

        let image_back = read_image_any_rgb8(&file_path)?;
        assert_eq!(image_back.size().width, 1);
        assert_eq!(image_back.size().height, 2);
        assert_eq!(image_back.as_slice(), &[30, 20, 10, 4, 5, 6]);

        Ok(())
    }

    #[test]
    fn read_any_gray_expands_channels() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("gray.png");

        let image = Image::<u8, 1>::new([2, 1].into(), vec![7, 9])?;
        write_image_png_gray8(&file_path, &image)?;

        let image_back = read_image_any_rgb8(&file_path)?;
        assert_eq!(image_back.as_slice(), &[7, 7, 7, 9, 9, 9]);

        Ok(())
    }

    #[test]
    fn read_any_missing_or_corrupted() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;

        let missing = tmp_dir.path().join("missing.png");
        assert!(matches!(
            read_image_any_rgb8(&missing),
            Err(IoError::FileDoesNotExist(_))
        ));

        let corrupted = tmp_dir.path().join("corrupted.png");
        std::fs::write(&corrupted, b"definitely not a png")?;
        assert!(read_image_any_rgb8(&corrupted).is_err());

        Ok(())
    }
}
