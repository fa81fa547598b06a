use pixelab_image::{ImageError, PixelBuffer};

use crate::{
    core::saturate_cast,
    padding::{PaddingMode, BORDER_MODE},
    parallel,
};

/// A separable 2D filter that applies horizontal and vertical 1D correlations sequentially.
///
/// The window offsets of both passes are resolved once against the border mode, so the
/// inner loops only do lookups.
pub(crate) struct SeparableFilter<'a> {
    kernel_x: &'a [f32],
    kernel_y: &'a [f32],
    mode: PaddingMode,
}

impl<'a> SeparableFilter<'a> {
    pub(crate) fn new(kernel_x: &'a [f32], kernel_y: &'a [f32]) -> Result<Self, ImageError> {
        for (name, kernel) in [("kernel_x", kernel_x), ("kernel_y", kernel_y)] {
            if kernel.is_empty() || kernel.len() % 2 == 0 {
                return Err(ImageError::InvalidParameter(
                    name,
                    format!("length must be odd, got {}", kernel.len()),
                ));
            }
        }

        Ok(Self {
            kernel_x,
            kernel_y,
            mode: BORDER_MODE,
        })
    }

    /// Filter interleaved samples of shape (rows, cols, channels) into an f32 buffer.
    pub(crate) fn apply<T>(&self, src: &[T], rows: usize, cols: usize, channels: usize) -> Vec<f32>
    where
        T: Copy + Into<f32> + Sync,
    {
        let stride = cols * channels;
        let (kx, ky) = (self.kernel_x.len(), self.kernel_y.len());
        let ix = self.mode.window_indices(cols, kx);
        let iy = self.mode.window_indices(rows, ky);

        // horizontal
        let mut temp = vec![0.0f32; rows * stride];
        parallel::par_rows_mut(&mut temp, stride, |r, row_temp| {
            let src_row = &src[r * stride..(r + 1) * stride];
            for c in 0..cols {
                let taps = &ix[c * kx..(c + 1) * kx];
                for ch in 0..channels {
                    row_temp[c * channels + ch] = taps
                        .iter()
                        .zip(self.kernel_x)
                        .map(|(&x, &k)| Into::<f32>::into(src_row[x * channels + ch]) * k)
                        .sum();
                }
            }
        });

        // vertical
        let mut dst = vec![0.0f32; rows * stride];
        parallel::par_rows_mut(&mut dst, stride, |r, row_dst| {
            let taps = &iy[r * ky..(r + 1) * ky];
            for (i, dst_val) in row_dst.iter_mut().enumerate() {
                *dst_val = taps
                    .iter()
                    .zip(self.kernel_y)
                    .map(|(&y, &k)| temp[y * stride + i] * k)
                    .sum();
            }
        });

        dst
    }
}

/// Apply a separable filter to an image.
///
/// Each channel is correlated with `kernel_x` along the rows and then with `kernel_y`
/// along the columns, with reflect-101 borders. The accumulation happens in f32 and the
/// result is rounded and clamped to [0, 255].
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `kernel_x` - The horizontal kernel, of odd length.
/// * `kernel_y` - The vertical kernel, of odd length.
///
/// # Errors
///
/// Returns [`ImageError::InvalidParameter`] if a kernel is empty or of even length.
pub fn separable_filter(
    src: &PixelBuffer,
    kernel_x: &[f32],
    kernel_y: &[f32],
) -> Result<PixelBuffer, ImageError> {
    let filter = SeparableFilter::new(kernel_x, kernel_y)?;

    let filtered = filter.apply(src.as_slice(), src.rows(), src.cols(), src.num_channels());

    PixelBuffer::new(
        src.size(),
        src.num_channels(),
        filtered.into_iter().map(saturate_cast).collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelab_image::{ImageError, ImageSize, PixelBuffer};

    #[test]
    fn test_separable_filter() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 5,
            height: 5,
        };

        let mut data = vec![0u8; 25];
        data[12] = 9;
        let image = PixelBuffer::new(size, 1, data)?;

        let kernel = [1.0 / 3.0; 3];
        let filtered = separable_filter(&image, &kernel, &kernel)?;

        #[rustfmt::skip]
        assert_eq!(
            filtered.as_slice(),
            &[
                0, 0, 0, 0, 0,
                0, 1, 1, 1, 0,
                0, 1, 1, 1, 0,
                0, 1, 1, 1, 0,
                0, 0, 0, 0, 0,
            ]
        );

        Ok(())
    }

    #[test]
    fn separable_filter_reflects_borders() -> Result<(), ImageError> {
        // a single row: [10, 20, 30] reflect101 pads to 20 | 10 20 30 | 20
        let image = PixelBuffer::new([3, 1].into(), 1, vec![10, 20, 30])?;
        let filtered = separable_filter(&image, &[0.25, 0.5, 0.25], &[1.0])?;
        assert_eq!(filtered.as_slice(), &[15, 20, 25]);
        Ok(())
    }

    #[test]
    fn separable_filter_keeps_channels_apart() -> Result<(), ImageError> {
        let image = PixelBuffer::new([2, 1].into(), 3, vec![0, 100, 200, 0, 100, 200])?;
        let kernel = [1.0 / 3.0; 3];
        let filtered = separable_filter(&image, &kernel, &kernel)?;
        assert_eq!(filtered, image);
        Ok(())
    }

    #[test]
    fn separable_filter_rejects_even_kernel() -> Result<(), ImageError> {
        let image = PixelBuffer::from_size_val([3, 3].into(), 1, 0)?;
        assert!(matches!(
            separable_filter(&image, &[0.5, 0.5], &[1.0]),
            Err(ImageError::InvalidParameter("kernel_x", _))
        ));
        assert!(matches!(
            separable_filter(&image, &[1.0], &[]),
            Err(ImageError::InvalidParameter("kernel_y", _))
        ));
        Ok(())
    }
}
