use pixelab_image::{ImageError, PixelBuffer};

use super::{
    kernels::{self, Kernel},
    separable_filter,
};
use crate::{core::saturate_cast, padding::BORDER_MODE, parallel};

/// Side of the gaussian blur window.
pub const GAUSSIAN_KERNEL_SIZE: usize = 5;

/// Correlate an image with a square kernel.
///
/// The kernel is applied without flipping. Borders are reflect-101, channels are
/// filtered independently and the result is rounded and clamped to [0, 255].
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `kernel` - The `kernel_size * kernel_size` weights in row-major order.
/// * `kernel_size` - The side of the kernel, odd.
///
/// # Errors
///
/// Returns [`ImageError::InvalidParameter`] if the kernel size is even or does not
/// match the number of weights.
///
/// # Example
///
/// ```
/// use pixelab_image::PixelBuffer;
/// use pixelab_imgproc::filter::filter2d;
///
/// let image = PixelBuffer::new([3, 1].into(), 1, vec![10, 20, 30]).unwrap();
///
/// // shift right by one pixel
/// let kernel = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0];
/// let shifted = filter2d(&image, &kernel, 3).unwrap();
///
/// assert_eq!(shifted.as_slice(), &[20, 10, 20]);
/// ```
pub fn filter2d(
    src: &PixelBuffer,
    kernel: &[f32],
    kernel_size: usize,
) -> Result<PixelBuffer, ImageError> {
    if kernel_size % 2 == 0 {
        return Err(ImageError::InvalidParameter(
            "kernel_size",
            format!("must be odd, got {kernel_size}"),
        ));
    }
    if kernel.len() != kernel_size * kernel_size {
        return Err(ImageError::InvalidParameter(
            "kernel",
            format!(
                "expected {} weights, got {}",
                kernel_size * kernel_size,
                kernel.len()
            ),
        ));
    }

    let (rows, cols, channels) = (src.rows(), src.cols(), src.num_channels());
    let stride = src.row_stride();
    let ix = BORDER_MODE.window_indices(cols, kernel_size);
    let iy = BORDER_MODE.window_indices(rows, kernel_size);
    let src_data = src.as_slice();

    let mut dst = PixelBuffer::from_size_val(src.size(), channels, 0)?;

    parallel::par_rows_mut(dst.as_slice_mut(), stride, |r, dst_row| {
        let rows_taps = &iy[r * kernel_size..(r + 1) * kernel_size];
        for c in 0..cols {
            let cols_taps = &ix[c * kernel_size..(c + 1) * kernel_size];
            for ch in 0..channels {
                let mut acc = 0.0f32;
                for (&y, kernel_row) in rows_taps.iter().zip(kernel.chunks_exact(kernel_size)) {
                    let src_row = &src_data[y * stride..(y + 1) * stride];
                    for (&x, &k) in cols_taps.iter().zip(kernel_row) {
                        acc += src_row[x * channels + ch] as f32 * k;
                    }
                }
                dst_row[c * channels + ch] = saturate_cast(acc);
            }
        }
    });

    Ok(dst)
}

/// Correlate an image with a 3x3 kernel of the bank, or any custom [`Kernel`].
///
/// The weights are applied as they are, without normalization.
///
/// # Example
///
/// ```
/// use pixelab_image::PixelBuffer;
/// use pixelab_imgproc::filter::{convolve, kernels::{kernel_for, KernelName}};
///
/// let image = PixelBuffer::new([3, 1].into(), 1, vec![10, 20, 30]).unwrap();
///
/// let same = convolve(&image, &kernel_for(KernelName::Identity)).unwrap();
/// assert_eq!(same, image);
/// ```
pub fn convolve(src: &PixelBuffer, kernel: &Kernel) -> Result<PixelBuffer, ImageError> {
    filter2d(src, &kernel.weights(), 3)
}

/// Blur an image with a uniform 3x3 kernel.
pub fn box_blur(src: &PixelBuffer) -> Result<PixelBuffer, ImageError> {
    filter2d(src, &[1.0 / 9.0; 9], 3)
}

/// Blur an image with a 5x5 gaussian kernel.
///
/// The kernel is applied separably and its sigma derived from the size with
/// [`kernels::gaussian_sigma`], which gives 1.1.
///
/// OpenCV's `GaussianBlur` with sigma 0 uses the fixed binomial taps
/// `[1, 4, 6, 4, 1] / 16` for this size instead, so results can differ from it by a
/// couple of levels.
pub fn gaussian_blur(src: &PixelBuffer) -> Result<PixelBuffer, ImageError> {
    let sigma = kernels::gaussian_sigma(GAUSSIAN_KERNEL_SIZE);
    log::debug!("gaussian blur: kernel size {GAUSSIAN_KERNEL_SIZE}, sigma {sigma}");

    let kernel = kernels::gaussian_kernel_1d(GAUSSIAN_KERNEL_SIZE, sigma);
    separable_filter(src, &kernel, &kernel)
}
