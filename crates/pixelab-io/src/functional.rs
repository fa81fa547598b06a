use std::path::Path;

use image::{ColorType, DynamicImage, GrayImage, ImageFormat, ImageReader, RgbImage};
use pixelab_image::{ImageError, ImageSize, PixelBuffer};

use crate::error::IoError;

/// Reads an image from the given file path.
///
/// The method tries to read from any image format supported by the image crate.
/// 8-bit grayscale images keep a single channel, every other color type is
/// converted to 8-bit RGB.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// A pixel buffer with 1 or 3 channels.
///
/// # Errors
///
/// Returns [`IoError::FileDoesNotExist`] if there is no such file and
/// [`IoError::ImageCodecError`] if its content cannot be decoded.
pub fn read_image_any(file_path: impl AsRef<Path>) -> Result<PixelBuffer, IoError> {
    let file_path = file_path.as_ref();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let img = ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    let image = match img.color() {
        ColorType::L8 => PixelBuffer::new(size, 1, img.into_luma8().into_raw())?,
        ColorType::Rgb8 => PixelBuffer::new(size, 3, img.into_rgb8().into_raw())?,
        other => {
            log::debug!("converting {other:?} from {} to rgb8", file_path.display());
            PixelBuffer::new(size, 3, img.into_rgb8().into_raw())?
        }
    };

    Ok(image)
}

/// Writes a pixel buffer to the given file path.
///
/// The format is chosen from the file extension. Single channel buffers are
/// written as 8-bit grayscale and three channel buffers as 8-bit RGB.
///
/// # Arguments
///
/// * `file_path` - The path to the output file.
/// * `image` - The pixel buffer to encode.
///
/// # Errors
///
/// Returns [`IoError::InvalidFileExtension`] if the extension does not name a known
/// format and [`IoError::ImageCodecError`] if the encoding fails.
pub fn write_image_any(file_path: impl AsRef<Path>, image: &PixelBuffer) -> Result<(), IoError> {
    let file_path = file_path.as_ref();

    let format = ImageFormat::from_path(file_path)
        .map_err(|_| IoError::InvalidFileExtension(file_path.to_path_buf()))?;

    let (width, height) = (image.width() as u32, image.height() as u32);
    let data = image.as_slice().to_vec();
    let mismatch = || {
        ImageError::InvalidChannelShape(
            image.as_slice().len(),
            image.size().area() * image.num_channels(),
        )
    };

    let dynamic = match image.num_channels() {
        1 => {
            let gray = GrayImage::from_raw(width, height, data).ok_or_else(mismatch)?;
            DynamicImage::ImageLuma8(gray)
        }
        _ => {
            let rgb = RgbImage::from_raw(width, height, data).ok_or_else(mismatch)?;
            DynamicImage::ImageRgb8(rgb)
        }
    };

    dynamic.save_with_format(file_path, format)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_read_png_rgb() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("rgb.png");

        let data = (0..4 * 3 * 3).map(|v| (v * 7) as u8).collect();
        let image = PixelBuffer::new(
            ImageSize {
                width: 4,
                height: 3,
            },
            3,
            data,
        )?;

        write_image_any(&file_path, &image)?;
        let read = read_image_any(&file_path)?;

        assert_eq!(read, image);

        Ok(())
    }

    #[test]
    fn write_read_png_gray() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("gray.png");

        let image = PixelBuffer::new([3, 2].into(), 1, vec![0, 50, 100, 150, 200, 250])?;

        write_image_any(&file_path, &image)?;
        let read = read_image_any(&file_path)?;

        assert_eq!(read.num_channels(), 1);
        assert_eq!(read.as_slice(), image.as_slice());

        Ok(())
    }

    #[test]
    fn read_missing_file() {
        let res = read_image_any("does/not/exist.png");
        assert!(matches!(res, Err(IoError::FileDoesNotExist(_))));
    }

    #[test]
    fn write_unknown_extension() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let image = PixelBuffer::from_size_val([2, 2].into(), 3, 0)?;

        let res = write_image_any(tmp_dir.path().join("image.unknown"), &image);
        assert!(matches!(res, Err(IoError::InvalidFileExtension(_))));

        Ok(())
    }
}
