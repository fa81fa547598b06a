use crate::{
    core::{luma, saturate_cast},
    parallel,
};
use pixelab_image::{ImageError, PixelBuffer};

const CR_W: f32 = 0.713;
const CB_W: f32 = 0.564;
const DELTA: f32 = 128.0;

/// Convert an RGB image to a full range YCrCb image.
///
/// The output channels are stored in the order Y, Cr, Cb:
///
/// * Y = 0.299 * R + 0.587 * G + 0.114 * B
/// * Cr = (R - Y) * 0.713 + 128
/// * Cb = (B - Y) * 0.564 + 128
///
/// Each channel is rounded and clamped to [0, 255].
///
/// # Errors
///
/// Returns [`ImageError::ChannelCountMismatch`] if the input does not have 3 channels.
///
/// # Example
///
/// ```
/// use pixelab_image::PixelBuffer;
/// use pixelab_imgproc::color::ycrcb_from_rgb;
///
/// let image = PixelBuffer::new([1, 1].into(), 3, vec![90, 90, 90]).unwrap();
/// let ycrcb = ycrcb_from_rgb(&image).unwrap();
///
/// assert_eq!(ycrcb.as_slice(), &[90, 128, 128]);
/// ```
pub fn ycrcb_from_rgb(src: &PixelBuffer) -> Result<PixelBuffer, ImageError> {
    if src.num_channels() != 3 {
        return Err(ImageError::ChannelCountMismatch(3, src.num_channels()));
    }

    let mut dst = PixelBuffer::from_size_val(src.size(), 3, 0)?;

    parallel::par_iter_rows(src, &mut dst, |src_pixel, dst_pixel| {
        let (r, g, b) = (src_pixel[0], src_pixel[1], src_pixel[2]);
        let y = luma(r, g, b);
        dst_pixel[0] = y;
        dst_pixel[1] = saturate_cast((r as f32 - y as f32) * CR_W + DELTA);
        dst_pixel[2] = saturate_cast((b as f32 - y as f32) * CB_W + DELTA);
    });

    Ok(dst)
}

/// Convert a full range YCrCb image, channels ordered Y, Cr, Cb, back to RGB.
///
/// * R = Y + 1.403 * (Cr - 128)
/// * G = Y - 0.714 * (Cr - 128) - 0.344 * (Cb - 128)
/// * B = Y + 1.773 * (Cb - 128)
///
/// # Errors
///
/// Returns [`ImageError::ChannelCountMismatch`] if the input does not have 3 channels.
pub fn rgb_from_ycrcb(src: &PixelBuffer) -> Result<PixelBuffer, ImageError> {
    if src.num_channels() != 3 {
        return Err(ImageError::ChannelCountMismatch(3, src.num_channels()));
    }

    let mut dst = PixelBuffer::from_size_val(src.size(), 3, 0)?;

    parallel::par_iter_rows(src, &mut dst, |src_pixel, dst_pixel| {
        let y = src_pixel[0] as f32;
        let cr = src_pixel[1] as f32 - DELTA;
        let cb = src_pixel[2] as f32 - DELTA;

        dst_pixel[0] = saturate_cast(y + 1.403 * cr);
        dst_pixel[1] = saturate_cast(y - 0.714 * cr - 0.344 * cb);
        dst_pixel[2] = saturate_cast(y + 1.773 * cb);
    });

    Ok(dst)
}

#[cfg(test)]
mod tests {
    use pixelab_image::{ImageError, PixelBuffer};

    #[test]
    fn ycrcb_from_rgb_red() -> Result<(), ImageError> {
        let image = PixelBuffer::new([1, 1].into(), 3, vec![255, 0, 0])?;
        let ycrcb = super::ycrcb_from_rgb(&image)?;

        // Cr = 179 * 0.713 + 128 saturates
        assert_eq!(ycrcb.as_slice(), &[76, 255, 85]);

        let rgb = super::rgb_from_ycrcb(&ycrcb)?;
        assert_eq!(rgb.as_slice(), &[254, 0, 0]);

        Ok(())
    }

    #[test]
    fn ycrcb_roundtrip_is_close() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let image = PixelBuffer::new(
            [2, 2].into(),
            3,
            vec![
                10, 20, 30,
                200, 150, 100,
                64, 128, 192,
                0, 0, 0,
            ],
        )?;

        let rgb = super::rgb_from_ycrcb(&super::ycrcb_from_rgb(&image)?)?;

        for (a, b) in rgb.as_slice().iter().zip(image.as_slice()) {
            assert!((*a as i32 - *b as i32).abs() <= 2, "{a} vs {b}");
        }

        Ok(())
    }

    #[test]
    fn ycrcb_requires_rgb() -> Result<(), ImageError> {
        let image = PixelBuffer::from_size_val([1, 1].into(), 1, 0)?;
        assert_eq!(
            super::ycrcb_from_rgb(&image),
            Err(ImageError::ChannelCountMismatch(3, 1))
        );
        assert_eq!(
            super::rgb_from_ycrcb(&image),
            Err(ImageError::ChannelCountMismatch(3, 1))
        );
        Ok(())
    }
}
