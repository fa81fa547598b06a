use pixelab_image::{ImageError, PixelBuffer};

use crate::{core::saturate_cast, parallel};

/// Remap every sample of an image through a 256 entry lookup table.
///
/// # Example
///
/// ```
/// use pixelab_image::PixelBuffer;
/// use pixelab_imgproc::enhance::apply_lut;
///
/// let mut lut = [0u8; 256];
/// for (i, v) in lut.iter_mut().enumerate() {
///     *v = 255 - i as u8;
/// }
///
/// let image = PixelBuffer::new([2, 1].into(), 1, vec![0, 200]).unwrap();
/// assert_eq!(apply_lut(&image, &lut).as_slice(), &[255, 55]);
/// ```
pub fn apply_lut(src: &PixelBuffer, lut: &[u8; 256]) -> PixelBuffer {
    let mut dst = src.clone();
    parallel::par_iter_rows_val(src, &mut dst, |&src_val, dst_val| {
        *dst_val = lut[src_val as usize];
    });
    dst
}

/// Build the gamma correction lookup table.
///
/// `lut[i] = round(255 * (i / 255) ^ gamma)`, clamped to [0, 255].
///
/// # Errors
///
/// Returns [`ImageError::InvalidParameter`] if `gamma` is not a positive finite number.
pub fn gamma_lut(gamma: f64) -> Result<[u8; 256], ImageError> {
    if !gamma.is_finite() || gamma <= 0.0 {
        return Err(ImageError::InvalidParameter(
            "gamma",
            format!("must be a positive finite number, got {gamma}"),
        ));
    }

    let mut lut = [0u8; 256];
    for (i, v) in lut.iter_mut().enumerate() {
        *v = saturate_cast(255.0 * (i as f64 / 255.0).powf(gamma));
    }

    Ok(lut)
}

/// Apply a gamma correction to every sample of every channel.
///
/// A gamma greater than 1 darkens the midtones, a gamma smaller than 1 brightens
/// them and a gamma of exactly 1 leaves the image unchanged. The extremes 0 and 255
/// are fixed points for any gamma.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `gamma` - The exponent of the power law.
///
/// # Errors
///
/// Returns [`ImageError::InvalidParameter`] if `gamma` is not a positive finite number.
///
/// # Example
///
/// ```
/// use pixelab_image::PixelBuffer;
/// use pixelab_imgproc::enhance::gamma_correction;
///
/// let image = PixelBuffer::new([3, 1].into(), 1, vec![0, 64, 255]).unwrap();
/// let darker = gamma_correction(&image, 2.0).unwrap();
///
/// assert_eq!(darker.as_slice(), &[0, 16, 255]);
/// ```
pub fn gamma_correction(src: &PixelBuffer, gamma: f64) -> Result<PixelBuffer, ImageError> {
    let lut = gamma_lut(gamma)?;
    Ok(apply_lut(src, &lut))
}
