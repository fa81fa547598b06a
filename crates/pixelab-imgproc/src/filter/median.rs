use pixelab_image::{ImageError, PixelBuffer};

use crate::{padding::BORDER_MODE, parallel};

/// Replace every sample by the median of its neighborhood.
///
/// Each channel is filtered independently over a `kernel_size` x `kernel_size`
/// window. Borders are reflect-101, as for the linear filters.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `kernel_size` - The side of the window, 3 or 5.
///
/// # Errors
///
/// Returns [`ImageError::InvalidParameter`] for any other kernel size.
///
/// # Example
///
/// ```
/// use pixelab_image::PixelBuffer;
/// use pixelab_imgproc::filter::median_blur;
///
/// // a salt pixel in a dark image
/// let mut image = PixelBuffer::from_size_val([3, 3].into(), 1, 5).unwrap();
/// image.set_pixel(1, 1, &[255]).unwrap();
///
/// let filtered = median_blur(&image, 3).unwrap();
/// assert!(filtered.as_slice().iter().all(|&v| v == 5));
/// ```
pub fn median_blur(src: &PixelBuffer, kernel_size: usize) -> Result<PixelBuffer, ImageError> {
    if kernel_size != 3 && kernel_size != 5 {
        return Err(ImageError::InvalidParameter(
            "kernel_size",
            format!("must be 3 or 5, got {kernel_size}"),
        ));
    }

    let (rows, cols, channels) = (src.rows(), src.cols(), src.num_channels());
    let stride = src.row_stride();
    let ix = BORDER_MODE.window_indices(cols, kernel_size);
    let iy = BORDER_MODE.window_indices(rows, kernel_size);
    let src_data = src.as_slice();
    let mid = kernel_size * kernel_size / 2;

    let mut dst = PixelBuffer::from_size_val(src.size(), channels, 0)?;

    parallel::par_rows_mut(dst.as_slice_mut(), stride, |r, dst_row| {
        let mut window = Vec::with_capacity(kernel_size * kernel_size);
        let rows_taps = &iy[r * kernel_size..(r + 1) * kernel_size];
        for c in 0..cols {
            let cols_taps = &ix[c * kernel_size..(c + 1) * kernel_size];
            for ch in 0..channels {
                window.clear();
                for &y in rows_taps {
                    for &x in cols_taps {
                        window.push(src_data[(y * cols + x) * channels + ch]);
                    }
                }
                let (_, median, _) = window.select_nth_unstable(mid);
                dst_row[c * channels + ch] = *median;
            }
        }
    });

    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelab_image::{ImageError, PixelBuffer};

    #[test]
    fn median_uniform_is_unchanged() -> Result<(), ImageError> {
        let image = PixelBuffer::from_size_val([6, 4].into(), 3, 77)?;
        assert_eq!(median_blur(&image, 3)?, image);
        assert_eq!(median_blur(&image, 5)?, image);
        Ok(())
    }

    #[test]
    fn median_removes_impulse_noise() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let image = PixelBuffer::new(
            [5, 5].into(),
            1,
            vec![
                10, 10, 10, 10, 10,
                10, 255, 10, 10, 10,
                10, 10, 10, 0, 10,
                10, 10, 10, 10, 10,
                10, 10, 10, 10, 10,
            ],
        )?;

        let filtered = median_blur(&image, 5)?;
        assert!(filtered.as_slice().iter().all(|&v| v == 10));

        Ok(())
    }

    #[test]
    fn median_keeps_step_edges() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let image = PixelBuffer::new(
            [4, 3].into(),
            1,
            vec![
                0, 0, 200, 200,
                0, 0, 200, 200,
                0, 0, 200, 200,
            ],
        )?;

        assert_eq!(median_blur(&image, 3)?, image);

        Ok(())
    }

    #[test]
    fn median_per_channel() -> Result<(), ImageError> {
        let mut image = PixelBuffer::from_size_val([3, 3].into(), 3, 0)?;
        image.set_pixel(1, 1, &[255, 0, 0])?;
        image.set_pixel(0, 0, &[0, 9, 0])?;

        let filtered = median_blur(&image, 3)?;
        assert_eq!(filtered.get_pixel(1, 1)?, &[0, 0, 0]);

        Ok(())
    }

    #[test]
    fn median_rejects_kernel_size() -> Result<(), ImageError> {
        let image = PixelBuffer::from_size_val([3, 3].into(), 1, 0)?;
        for kernel_size in [0, 1, 4, 7] {
            assert!(matches!(
                median_blur(&image, kernel_size),
                Err(ImageError::InvalidParameter("kernel_size", _))
            ));
        }
        Ok(())
    }
}
