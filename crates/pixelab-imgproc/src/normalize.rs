//! Min-max normalization of 8-bit images.
//!
//! The whole buffer is stretched jointly, i.e. a single minimum and maximum are
//! taken over all the samples of all the channels, so the relative balance of the
//! channels is kept.
//!
//! # Example
//!
//! ```
//! use pixelab_image::PixelBuffer;
//! use pixelab_imgproc::normalize::normalize_min_max;
//!
//! let image = PixelBuffer::new([4, 1].into(), 1, vec![50, 60, 70, 100]).unwrap();
//! let stretched = normalize_min_max(&image, 0, 255).unwrap();
//!
//! assert_eq!(stretched.as_slice(), &[0, 51, 102, 255]);
//! ```

use pixelab_image::{ImageError, PixelBuffer};
use rayon::prelude::*;

use crate::{core::saturate_cast, parallel};

/// Find the minimum and maximum sample of an image, across all channels.
///
/// # Errors
///
/// Returns [`ImageError::RangeError`] if the image has no samples.
///
/// # Example
///
/// ```
/// use pixelab_image::PixelBuffer;
/// use pixelab_imgproc::normalize::find_min_max;
///
/// let image = PixelBuffer::new([2, 1].into(), 3, vec![0, 1, 2, 3, 9, 4]).unwrap();
///
/// let (min, max) = find_min_max(&image).unwrap();
/// assert_eq!(min, 0);
/// assert_eq!(max, 9);
/// ```
pub fn find_min_max(image: &PixelBuffer) -> Result<(u8, u8), ImageError> {
    if image.is_empty() {
        return Err(ImageError::RangeError(
            "cannot compute the range of an empty image".to_string(),
        ));
    }

    let (min, max) = image
        .as_slice()
        .par_iter()
        .fold(
            || (u8::MAX, u8::MIN),
            |(min, max), &x| (min.min(x), max.max(x)),
        )
        .reduce(
            || (u8::MAX, u8::MIN),
            |(a_min, a_max), (b_min, b_max)| (a_min.min(b_min), a_max.max(b_max)),
        );

    Ok((min, max))
}

/// Normalize an image using the minimum and maximum values.
///
/// Every sample `v` becomes `round((v - min) * (b - a) / (max - min) + a)`, where
/// `min` and `max` are taken over all samples of all channels. A constant image
/// maps every sample to `a`.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `a` - The value the minimum sample is mapped to.
/// * `b` - The value the maximum sample is mapped to.
///
/// # Returns
///
/// The normalized image, with the same shape as the input.
///
/// # Errors
///
/// Returns [`ImageError::RangeError`] if `a >= b` or the image is empty. The
/// check happens before any work.
pub fn normalize_min_max(src: &PixelBuffer, a: u8, b: u8) -> Result<PixelBuffer, ImageError> {
    if a >= b {
        return Err(ImageError::RangeError(format!(
            "normalization bounds must satisfy a < b, got a = {a}, b = {b}"
        )));
    }

    let (min_val, max_val) = find_min_max(src)?;

    let span = (max_val - min_val) as f32;
    let scale = if span > 0.0 {
        (b - a) as f32 / span
    } else {
        0.0
    };
    let shift = a as f32 - min_val as f32 * scale;

    log::debug!("normalize: [{min_val}, {max_val}] -> [{a}, {b}], scale {scale}");

    let mut dst = PixelBuffer::from_size_val(src.size(), src.num_channels(), 0)?;

    parallel::par_iter_rows_val(src, &mut dst, |&src_val, dst_val| {
        *dst_val = saturate_cast(src_val as f32 * scale + shift);
    });

    Ok(dst)
}
