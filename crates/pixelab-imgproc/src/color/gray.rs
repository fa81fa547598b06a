use crate::{core::luma, parallel};
use pixelab_image::{ImageError, PixelBuffer};

/// Convert an RGB image to grayscale using the formula:
///
/// Y = 0.299 * R + 0.587 * G + 0.114 * B
///
/// The result is rounded to the nearest integer.
///
/// # Arguments
///
/// * `src` - The input RGB image.
///
/// # Returns
///
/// A new single channel image of the same size.
///
/// # Errors
///
/// Returns [`ImageError::ChannelCountMismatch`] if the input does not have 3 channels.
///
/// # Example
///
/// ```
/// use pixelab_image::{ImageSize, PixelBuffer};
/// use pixelab_imgproc::color::gray_from_rgb;
///
/// let image = PixelBuffer::new(
///     ImageSize {
///         width: 2,
///         height: 1,
///     },
///     3,
///     vec![255, 0, 0, 10, 10, 10],
/// )
/// .unwrap();
///
/// let gray = gray_from_rgb(&image).unwrap();
/// assert_eq!(gray.num_channels(), 1);
/// assert_eq!(gray.as_slice(), &[76, 10]);
/// ```
pub fn gray_from_rgb(src: &PixelBuffer) -> Result<PixelBuffer, ImageError> {
    if src.num_channels() != 3 {
        return Err(ImageError::ChannelCountMismatch(3, src.num_channels()));
    }

    let mut dst = PixelBuffer::from_size_val(src.size(), 1, 0)?;

    // parallelize the grayscale conversion by rows
    parallel::par_iter_rows(src, &mut dst, |src_pixel, dst_pixel| {
        dst_pixel[0] = luma(src_pixel[0], src_pixel[1], src_pixel[2]);
    });

    Ok(dst)
}

/// Convert a grayscale image to an RGB image by replicating the grayscale value across all three channels.
///
/// # Errors
///
/// Returns [`ImageError::ChannelCountMismatch`] if the input does not have 1 channel.
pub fn rgb_from_gray(src: &PixelBuffer) -> Result<PixelBuffer, ImageError> {
    if src.num_channels() != 1 {
        return Err(ImageError::ChannelCountMismatch(1, src.num_channels()));
    }

    let mut dst = PixelBuffer::from_size_val(src.size(), 3, 0)?;

    parallel::par_iter_rows(src, &mut dst, |src_pixel, dst_pixel| {
        dst_pixel.fill(src_pixel[0]);
    });

    Ok(dst)
}
