use pixelab_image::{ImageError, PixelBuffer};

/// Statistics of one quadrant, kept as integer sums so that ties compare exactly.
struct QuadrantStats {
    sums: [u64; 3],
    // n * sum(v^2) - sum(v)^2 over all channels, proportional to the variance
    spread: u128,
}

// n * sum(v^2) - sum(v)^2, widened so large windows cannot overflow
fn spread(n: u64, total: u64, total_sq: u64) -> u128 {
    n as u128 * total_sq as u128 - total as u128 * total as u128
}

fn quadrant_stats(
    data: &[u8],
    cols: usize,
    channels: usize,
    origin: (usize, usize),
    side: usize,
) -> QuadrantStats {
    let (y0, x0) = origin;
    let mut sums = [0u64; 3];
    let (mut total, mut total_sq) = (0u64, 0u64);

    for y in y0..y0 + side {
        let row = &data[(y * cols + x0) * channels..(y * cols + x0 + side) * channels];
        for px in row.chunks_exact(channels) {
            for (sum, &v) in sums.iter_mut().zip(px) {
                let v = v as u64;
                *sum += v;
                total += v;
                total_sq += v * v;
            }
        }
    }

    let n = (side * side * channels) as u64;
    QuadrantStats {
        sums,
        spread: spread(n, total, total_sq),
    }
}

/// Apply the Kuwahara filter in place.
///
/// A `kernel_size` x `kernel_size` window slides over the image with its top-left
/// corner at every `(y, x)` with `y < H - kernel_size` and `x < W - kernel_size`. The
/// window is split into four overlapping quadrants of side `(kernel_size + 1) / 2`
/// that share its centre row and column: north-west, north-east, south-west and
/// south-east. The variance of each quadrant is taken over all of its samples, all
/// channels together, and the per channel mean of the quadrant with the smallest
/// variance, truncated to an integer, replaces the pixel at the window centre. On
/// ties the earlier quadrant in that order wins.
///
/// The scan is row-major and writes into the image as it goes, so later windows see
/// the already filtered centres. Pixels outside the visited centres, a strip along
/// each border, keep their value. An image no larger than the kernel is left as is.
///
/// # Arguments
///
/// * `image` - The image to filter, with shape (H, W, C).
/// * `kernel_size` - The side of the window, odd and at least 3.
///
/// # Errors
///
/// Returns [`ImageError::InvalidParameter`] for an even or too small kernel size; the
/// image is not touched in that case.
///
/// # Example
///
/// ```
/// use pixelab_image::PixelBuffer;
/// use pixelab_imgproc::filter::kuwahara;
///
/// let mut image = PixelBuffer::from_size_val([6, 6].into(), 3, 90).unwrap();
/// kuwahara(&mut image, 3).unwrap();
///
/// assert!(image.as_slice().iter().all(|&v| v == 90));
/// ```
pub fn kuwahara(image: &mut PixelBuffer, kernel_size: usize) -> Result<(), ImageError> {
    if kernel_size < 3 || kernel_size % 2 == 0 {
        return Err(ImageError::InvalidParameter(
            "kernel_size",
            format!("must be odd and at least 3, got {kernel_size}"),
        ));
    }

    let (rows, cols, channels) = (image.rows(), image.cols(), image.num_channels());
    let shift = (kernel_size + 1) / 2;

    if rows <= kernel_size || cols <= kernel_size {
        log::debug!("kuwahara: {} too small for kernel size {kernel_size}", image.size());
        return Ok(());
    }

    log::debug!(
        "kuwahara: kernel size {kernel_size}, {} x {} windows",
        cols - kernel_size,
        rows - kernel_size
    );

    let data = image.as_slice_mut();
    let n = (shift * shift) as u64;

    for y in 0..rows - kernel_size {
        for x in 0..cols - kernel_size {
            let (ym, xm) = (y + shift - 1, x + shift - 1);
            // NW first, then NE, SW and SE; only a strictly smaller spread replaces it
            let best = [(y, xm), (ym, x), (ym, xm)].into_iter().fold(
                quadrant_stats(data, cols, channels, (y, x), shift),
                |best, origin| {
                    let stats = quadrant_stats(data, cols, channels, origin, shift);
                    if stats.spread < best.spread {
                        stats
                    } else {
                        best
                    }
                },
            );

            let centre = (ym * cols + xm) * channels;
            for (dst, sum) in data[centre..centre + channels].iter_mut().zip(best.sums) {
                *dst = (sum / n) as u8;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelab_image::{ImageError, PixelBuffer};

    #[test]
    fn kuwahara_uniform_is_unchanged() -> Result<(), ImageError> {
        let mut image = PixelBuffer::from_size_val([8, 7].into(), 3, 33)?;
        let expected = image.clone();

        kuwahara(&mut image, 3)?;
        assert_eq!(image, expected);

        kuwahara(&mut image, 5)?;
        assert_eq!(image, expected);

        Ok(())
    }

    #[test]
    fn kuwahara_picks_flattest_quadrant() -> Result<(), ImageError> {
        // a single 4x4 image gives exactly one window for kernel size 3, centred at (1, 1)
        #[rustfmt::skip]
        let mut image = PixelBuffer::new(
            [4, 4].into(),
            1,
            vec![
                0, 90, 10, 0,
                30, 50, 20, 0,
                200, 0, 40, 0,
                0, 0, 0, 0,
            ],
        )?;

        kuwahara(&mut image, 3)?;

        // NW = {0, 90, 30, 50}, NE = {90, 10, 50, 20}
        // SW = {30, 50, 200, 0}, SE = {50, 20, 0, 40} has the lowest variance
        // mean (50 + 20 + 0 + 40) / 4 = 27.5 truncates to 27
        #[rustfmt::skip]
        assert_eq!(
            image.as_slice(),
            &[
                0, 90, 10, 0,
                30, 27, 20, 0,
                200, 0, 40, 0,
                0, 0, 0, 0,
            ]
        );

        Ok(())
    }

    #[test]
    fn kuwahara_scan_reads_filtered_values() -> Result<(), ImageError> {
        // 5x4 gives two windows along x, centred at (1, 1) and (2, 1)
        #[rustfmt::skip]
        let mut image = PixelBuffer::new(
            [5, 4].into(),
            1,
            vec![
                10, 10, 10, 200, 0,
                10, 90, 10, 0, 200,
                10, 10, 10, 200, 0,
                0, 0, 0, 0, 0,
            ],
        )?;

        kuwahara(&mut image, 3)?;

        // all four quadrants of the first window tie, NW wins with mean 120 / 4
        assert_eq!(image.get(1, 1, 0), Some(30));
        // the second window reads 30 instead of 90 in its NW quadrant
        assert_eq!(image.get(2, 1, 0), Some(15));
        // outside the visited centres nothing changes
        assert_eq!(image.get(0, 0, 0), Some(10));
        assert_eq!(image.get(3, 2, 0), Some(200));

        Ok(())
    }

    #[test]
    fn kuwahara_joint_variance_over_channels() -> Result<(), ImageError> {
        let mut image = PixelBuffer::from_size_val([4, 4].into(), 3, 0)?;
        // make every quadrant but SE noisy in one channel only
        image.set_pixel(0, 0, &[0, 0, 200])?;
        image.set_pixel(2, 0, &[0, 200, 0])?;
        image.set_pixel(0, 2, &[200, 0, 0])?;
        image.set_pixel(1, 1, &[60, 60, 60])?;

        kuwahara(&mut image, 3)?;

        // SE = {(1,1), (2,1), (1,2), (2,2)} only holds the grey centre
        assert_eq!(image.get_pixel(1, 1)?, &[15, 15, 15]);

        Ok(())
    }

    #[test]
    fn kuwahara_small_image_untouched() -> Result<(), ImageError> {
        let data = (0..9).map(|v| v * 20).collect::<Vec<u8>>();
        let mut image = PixelBuffer::new([3, 3].into(), 1, data)?;
        let expected = image.clone();

        kuwahara(&mut image, 3)?;
        assert_eq!(image, expected);

        Ok(())
    }

    #[test]
    fn spread_of_large_windows() {
        let n = 100_000_000u64;

        // a flat quadrant of 255
        assert_eq!(spread(n, n * 255, n * 255 * 255), 0);

        // half 0 and half 200: n^2 * 10000 does not fit in 64 bits
        let expected = n as u128 * n as u128 * 10_000;
        assert!(expected > u64::MAX as u128);
        assert_eq!(spread(n, n * 100, n * 20_000), expected);
    }

    #[test]
    fn kuwahara_rejects_kernel_size() -> Result<(), ImageError> {
        let mut image = PixelBuffer::from_size_val([8, 8].into(), 1, 1)?;
        for kernel_size in [0, 1, 2, 4] {
            assert!(matches!(
                kuwahara(&mut image, kernel_size),
                Err(ImageError::InvalidParameter("kernel_size", _))
            ));
        }
        Ok(())
    }
}
