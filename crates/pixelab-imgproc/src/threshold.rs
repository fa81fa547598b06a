use pixelab_image::{ImageError, PixelBuffer};

use crate::{
    core::saturate_cast,
    filter::{kernels, SeparableFilter},
    histogram::{compute_histogram, HistogramTable, NUM_BINS},
    parallel,
};

const MAX_VALUE: u8 = 255;

fn ensure_grayscale(src: &PixelBuffer) -> Result<(), ImageError> {
    if !src.is_grayscale() {
        return Err(ImageError::GrayscaleRequired(src.num_channels()));
    }
    Ok(())
}

/// Apply a binary threshold to a grayscale image.
///
/// Samples greater than or equal to the threshold become 255, all others 0.
///
/// # Arguments
///
/// * `src` - The input single channel image.
/// * `threshold` - The threshold value.
///
/// # Returns
///
/// A single channel mask of the same size.
///
/// # Errors
///
/// Returns [`ImageError::GrayscaleRequired`] if the input has more than one channel.
///
/// # Example
///
/// ```
/// use pixelab_image::{ImageSize, PixelBuffer};
/// use pixelab_imgproc::threshold::threshold_binary;
///
/// let data = vec![100u8, 200, 50, 150, 200, 250];
/// let image = PixelBuffer::new(
///    ImageSize {
///       width: 2,
///       height: 3,
///    },
///    1,
///    data,
/// ).unwrap();
///
/// let thresholded = threshold_binary(&image, 150).unwrap();
///
/// assert_eq!(thresholded.num_channels(), 1);
/// assert_eq!(thresholded.as_slice(), &[0, 255, 0, 255, 255, 255]);
/// ```
pub fn threshold_binary(src: &PixelBuffer, threshold: u8) -> Result<PixelBuffer, ImageError> {
    ensure_grayscale(src)?;

    let mut dst = PixelBuffer::from_size_val(src.size(), 1, 0)?;

    parallel::par_iter_rows_val(src, &mut dst, |src_val, dst_val| {
        *dst_val = if *src_val >= threshold { MAX_VALUE } else { 0 };
    });

    Ok(dst)
}

/// Between-class variance of splitting a histogram at `threshold`.
///
/// The background class holds the values in `[0, threshold)` and the foreground class
/// the values in `[threshold, 255]`. With `w0`, `w1` the class probabilities and `μ0`,
/// `μ1` the class means the score is `w0 * w1 * (μ0 - μ1)^2`. A split that leaves a
/// class empty scores 0.
pub fn otsu_score(hist: &HistogramTable, threshold: u8) -> f64 {
    let t = threshold as usize;
    let counts = hist.counts();

    let (mut n0, mut s0, mut n1, mut s1) = (0.0f64, 0.0f64, 0.0f64, 0.0f64);
    for (v, &count) in counts.iter().enumerate() {
        let count = count as f64;
        if v < t {
            n0 += count;
            s0 += v as f64 * count;
        } else {
            n1 += count;
            s1 += v as f64 * count;
        }
    }

    if n0 == 0.0 || n1 == 0.0 {
        return 0.0;
    }

    let total = n0 + n1;
    let (w0, w1) = (n0 / total, n1 / total);
    let (mu0, mu1) = (s0 / n0, s1 / n1);

    w0 * w1 * (mu0 - mu1).powi(2)
}

/// The Otsu threshold of a histogram: the value with the highest [`otsu_score`].
///
/// Ties resolve to the smallest threshold, so a histogram with a single populated
/// value yields 0.
///
/// # Errors
///
/// Returns [`ImageError::RangeError`] if the histogram is empty.
pub fn otsu_threshold_value(hist: &HistogramTable) -> Result<u8, ImageError> {
    if hist.total() == 0 {
        return Err(ImageError::RangeError(
            "cannot compute the Otsu threshold of an empty histogram".to_string(),
        ));
    }

    let mut best_threshold = 0u8;
    let mut best_score = 0.0f64;
    for t in 0..NUM_BINS {
        let t = t as u8;
        let score = otsu_score(hist, t);
        if score > best_score {
            best_score = score;
            best_threshold = t;
        }
    }

    Ok(best_threshold)
}

/// Binarize a grayscale image with the threshold found by Otsu's method.
///
/// # Returns
///
/// The mask, computed as [`threshold_binary`] does, and the threshold that was applied.
///
/// # Errors
///
/// Returns [`ImageError::GrayscaleRequired`] if the input has more than one channel
/// and [`ImageError::RangeError`] if it is empty.
///
/// # Example
///
/// ```
/// use pixelab_image::PixelBuffer;
/// use pixelab_imgproc::threshold::otsu_threshold;
///
/// let image = PixelBuffer::new([3, 2].into(), 1, vec![100, 200, 50, 150, 200, 250]).unwrap();
///
/// let (thresholded, threshold) = otsu_threshold(&image).unwrap();
///
/// assert_eq!(threshold, 101);
/// assert_eq!(thresholded.as_slice(), &[0, 255, 0, 255, 255, 255]);
/// ```
pub fn otsu_threshold(src: &PixelBuffer) -> Result<(PixelBuffer, u8), ImageError> {
    ensure_grayscale(src)?;

    let hist = compute_histogram(src, 0)?;
    let threshold = otsu_threshold_value(&hist)?;
    log::debug!("otsu threshold: {threshold}");

    Ok((threshold_binary(src, threshold)?, threshold))
}

/// Binarize a grayscale image with Niblack's local threshold.
///
/// The image is inverted first (`v -> 255 - v`), so dark strokes become the bright
/// foreground. For every pixel the mean `μ` and the population standard deviation `σ`
/// of the inverted samples in the `kernel_size` x `kernel_size` window around it give
/// the local threshold `round(μ - k * σ)`. The output is 255 where the inverted sample
/// is at or below its threshold, 0 elsewhere. Borders are reflect-101.
///
/// # Arguments
///
/// * `src` - The input single channel image.
/// * `kernel_size` - The side of the window, odd and at least 3.
/// * `k` - The weight of the standard deviation.
///
/// # Errors
///
/// Returns [`ImageError::GrayscaleRequired`] if the input has more than one channel
/// and [`ImageError::InvalidParameter`] for an even or too small window, or a
/// non-finite `k`.
pub fn niblack_threshold(
    src: &PixelBuffer,
    kernel_size: usize,
    k: f32,
) -> Result<PixelBuffer, ImageError> {
    ensure_grayscale(src)?;

    if kernel_size < 3 || kernel_size % 2 == 0 {
        return Err(ImageError::InvalidParameter(
            "kernel_size",
            format!("must be odd and at least 3, got {kernel_size}"),
        ));
    }
    if !k.is_finite() {
        return Err(ImageError::InvalidParameter(
            "k",
            format!("must be finite, got {k}"),
        ));
    }

    let (rows, cols) = (src.rows(), src.cols());

    let inverted = src
        .as_slice()
        .iter()
        .map(|&v| (MAX_VALUE - v) as f32)
        .collect::<Vec<_>>();
    let squared = inverted.iter().map(|v| v * v).collect::<Vec<_>>();

    let kernel = kernels::box_blur_kernel_1d(kernel_size);
    let filter = SeparableFilter::new(&kernel, &kernel)?;
    let mean = filter.apply(inverted.as_slice(), rows, cols, 1);
    let mean_sq = filter.apply(squared.as_slice(), rows, cols, 1);

    let mut dst = PixelBuffer::from_size_val(src.size(), 1, 0)?;
    parallel::par_rows_mut(dst.as_slice_mut(), cols, |r, dst_row| {
        for (c, dst_val) in dst_row.iter_mut().enumerate() {
            let i = r * cols + c;
            let sigma = (mean_sq[i] - mean[i] * mean[i]).max(0.0).sqrt();
            let threshold = saturate_cast(mean[i] - k * sigma);
            *dst_val = if inverted[i] <= threshold as f32 {
                MAX_VALUE
            } else {
                0
            };
        }
    });

    Ok(dst)
}
