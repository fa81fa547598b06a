use pixelab_image::{ImageError, PixelBuffer};
use rayon::prelude::*;

use crate::{color, core::saturate_cast, enhance::apply_lut};

/// Number of bins of an 8-bit histogram, one per sample value.
pub const NUM_BINS: usize = 256;

// pixels per parallel work item when counting
const CHUNK_PIXELS: usize = 4096;

/// Per channel frequency table of the 256 possible sample values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistogramTable([usize; NUM_BINS]);

impl Default for HistogramTable {
    fn default() -> Self {
        Self([0; NUM_BINS])
    }
}

impl From<[usize; NUM_BINS]> for HistogramTable {
    fn from(counts: [usize; NUM_BINS]) -> Self {
        Self(counts)
    }
}

impl std::ops::Index<u8> for HistogramTable {
    type Output = usize;

    fn index(&self, value: u8) -> &Self::Output {
        &self.0[value as usize]
    }
}

impl HistogramTable {
    /// The counts indexed by sample value.
    pub fn counts(&self) -> &[usize; NUM_BINS] {
        &self.0
    }

    /// Total number of counted samples.
    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    /// Running sum of the counts, `cumulative()[v]` counts the samples `<= v`.
    pub fn cumulative(&self) -> [usize; NUM_BINS] {
        let mut cdf = [0; NUM_BINS];
        let mut acc = 0;
        for (dst, &count) in cdf.iter_mut().zip(self.0.iter()) {
            acc += count;
            *dst = acc;
        }
        cdf
    }

    /// The smallest sample value with a non-zero count.
    pub fn min_value(&self) -> Option<u8> {
        self.0.iter().position(|&c| c > 0).map(|v| v as u8)
    }

    /// The largest sample value with a non-zero count.
    pub fn max_value(&self) -> Option<u8> {
        self.0.iter().rposition(|&c| c > 0).map(|v| v as u8)
    }
}

/// Compute the pixel intensity histogram of one channel of an image.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `channel` - The channel to count.
///
/// # Returns
///
/// A table with the number of occurrences of each sample value.
///
/// # Errors
///
/// Returns [`ImageError::ChannelIndexOutOfBounds`] if the channel does not exist.
///
/// # Example
///
/// ```
/// use pixelab_image::{ImageSize, PixelBuffer};
/// use pixelab_imgproc::histogram::compute_histogram;
///
/// let image = PixelBuffer::new(
///   ImageSize {
///     width: 3,
///     height: 1,
///   },
///   3,
///   vec![0, 2, 4, 0, 130, 4, 255, 255, 4],
/// ).unwrap();
///
/// let histogram = compute_histogram(&image, 0).unwrap();
/// assert_eq!(histogram[0], 2);
/// assert_eq!(histogram[255], 1);
/// assert_eq!(histogram.total(), 3);
/// ```
pub fn compute_histogram(src: &PixelBuffer, channel: usize) -> Result<HistogramTable, ImageError> {
    let num_channels = src.num_channels();
    if channel >= num_channels {
        return Err(ImageError::ChannelIndexOutOfBounds(channel, num_channels));
    }

    let counts = src
        .as_slice()
        .par_chunks(CHUNK_PIXELS * num_channels)
        .fold(
            || [0usize; NUM_BINS],
            |mut local, chunk| {
                for &px in chunk.iter().skip(channel).step_by(num_channels) {
                    local[px as usize] += 1;
                }
                local
            },
        )
        .reduce(
            || [0usize; NUM_BINS],
            |mut a, b| {
                for (acc, val) in a.iter_mut().zip(b.iter()) {
                    *acc += val;
                }
                a
            },
        );

    Ok(HistogramTable(counts))
}

/// Compute one histogram per channel of an image.
pub fn compute_histograms(src: &PixelBuffer) -> Result<Vec<HistogramTable>, ImageError> {
    (0..src.num_channels())
        .map(|ch| compute_histogram(src, ch))
        .collect()
}

/// Build the lookup table that equalizes a histogram.
///
/// With `i0` the smallest populated value and `N` the number of samples, values up
/// to `i0` map to 0 and every larger value `v` maps to
/// `round(255 * (cdf(v) - hist[i0]) / (N - hist[i0]))`. A histogram with a single
/// populated value, or no samples at all, yields the identity.
pub fn equalization_lut(hist: &HistogramTable) -> [u8; NUM_BINS] {
    let mut lut = [0u8; NUM_BINS];
    for (i, v) in lut.iter_mut().enumerate() {
        *v = i as u8;
    }

    let total = hist.total();
    let Some(i0) = hist.min_value() else {
        return lut;
    };
    let i0 = i0 as usize;
    let base = hist.counts()[i0];
    if base == total {
        return lut;
    }

    let scale = 255.0 / (total - base) as f64;
    let mut sum = 0usize;
    lut[..=i0].fill(0);
    for i in i0 + 1..NUM_BINS {
        sum += hist.counts()[i];
        lut[i] = saturate_cast(sum as f64 * scale);
    }

    lut
}

/// Equalize the histogram of a single channel image.
///
/// # Errors
///
/// Returns [`ImageError::GrayscaleRequired`] if the image has more than one channel.
pub fn equalize_histogram(src: &PixelBuffer) -> Result<PixelBuffer, ImageError> {
    if !src.is_grayscale() {
        return Err(ImageError::GrayscaleRequired(src.num_channels()));
    }
    let lut = equalization_lut(&compute_histogram(src, 0)?);
    Ok(apply_lut(src, &lut))
}

/// Equalize the luma of an RGB image and return it as a gray RGB image.
///
/// The image is reduced to its BT.601 luma, equalized, and the single channel is
/// replicated back to three channels.
///
/// Equalizing twice is not guaranteed to be idempotent because of the rounding of
/// the lookup table.
///
/// # Errors
///
/// Returns [`ImageError::ChannelCountMismatch`] if the input does not have 3 channels.
///
/// # Example
///
/// ```
/// use pixelab_image::PixelBuffer;
/// use pixelab_imgproc::histogram::equalize_grayscale;
///
/// let image = PixelBuffer::new([2, 1].into(), 3, vec![50, 50, 50, 60, 60, 60]).unwrap();
/// let equalized = equalize_grayscale(&image).unwrap();
///
/// assert_eq!(equalized.num_channels(), 3);
/// assert_eq!(equalized.as_slice(), &[0, 0, 0, 255, 255, 255]);
/// ```
pub fn equalize_grayscale(src: &PixelBuffer) -> Result<PixelBuffer, ImageError> {
    let gray = color::gray_from_rgb(src)?;
    let equalized = equalize_histogram(&gray)?;
    color::rgb_from_gray(&equalized)
}

/// Equalize the luma of an RGB image while keeping its chroma.
///
/// The image is converted to YCrCb, only the Y channel is equalized, and the result
/// is converted back to RGB.
///
/// # Errors
///
/// Returns [`ImageError::ChannelCountMismatch`] if the input does not have 3 channels.
pub fn equalize_ycrcb(src: &PixelBuffer) -> Result<PixelBuffer, ImageError> {
    let mut ycrcb = color::ycrcb_from_rgb(src)?;
    equalize_luma(&mut ycrcb)?;
    color::rgb_from_ycrcb(&ycrcb)
}

// equalizes the Y channel of a Y, Cr, Cb buffer in place, Cr and Cb are not touched
fn equalize_luma(ycrcb: &mut PixelBuffer) -> Result<(), ImageError> {
    let lut = equalization_lut(&compute_histogram(ycrcb, 0)?);

    ycrcb
        .as_slice_mut()
        .par_chunks_exact_mut(3)
        .for_each(|px| px[0] = lut[px[0] as usize]);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelab_image::{ImageError, ImageSize, PixelBuffer};

    #[test]
    fn test_compute_histogram() -> Result<(), ImageError> {
        let image = PixelBuffer::new(
            ImageSize {
                width: 3,
                height: 3,
            },
            1,
            vec![0, 2, 4, 128, 130, 132, 254, 255, 255],
        )?;

        let histogram = compute_histogram(&image, 0)?;

        assert_eq!(histogram.total(), 9);
        assert_eq!(histogram[255], 2);
        assert_eq!(histogram[128], 1);
        assert_eq!(histogram[1], 0);
        assert_eq!(histogram.min_value(), Some(0));
        assert_eq!(histogram.max_value(), Some(255));

        assert_eq!(
            compute_histogram(&image, 1),
            Err(ImageError::ChannelIndexOutOfBounds(1, 1))
        );

        Ok(())
    }

    #[test]
    fn histogram_large_image_per_channel() -> Result<(), ImageError> {
        // spans several parallel chunks
        let (width, height) = (100, 90);
        let data = (0..width * height)
            .flat_map(|i| [(i % 256) as u8, 7, 200])
            .collect();
        let image = PixelBuffer::new([width, height].into(), 3, data)?;

        let hists = compute_histograms(&image)?;
        assert_eq!(hists.len(), 3);
        assert_eq!(hists[0].total(), width * height);
        assert_eq!(hists[1][7], width * height);
        assert_eq!(hists[2][200], width * height);
        assert_eq!(hists[0][0], (width * height).div_ceil(256));

        Ok(())
    }

    #[test]
    fn cumulative_counts() {
        let mut counts = [0usize; NUM_BINS];
        counts[1] = 2;
        counts[3] = 5;
        let cdf = HistogramTable::from(counts).cumulative();
        assert_eq!(&cdf[..5], &[0, 2, 2, 7, 7]);
        assert_eq!(cdf[255], 7);
    }

    #[test]
    fn equalization_lut_regression() {
        let mut counts = [0usize; NUM_BINS];
        counts[10] = 2;
        counts[20] = 1;
        counts[30] = 1;
        let lut = equalization_lut(&HistogramTable::from(counts));

        assert_eq!(lut[5], 0);
        assert_eq!(lut[10], 0);
        // (2 + 1 - 2) / (4 - 2) * 255
        assert_eq!(lut[20], 128);
        assert_eq!(lut[25], 128);
        assert_eq!(lut[30], 255);
        assert_eq!(lut[255], 255);
    }

    #[test]
    fn equalization_of_constant_image_is_identity() -> Result<(), ImageError> {
        let image = PixelBuffer::from_size_val([3, 2].into(), 1, 77)?;
        assert_eq!(equalize_histogram(&image)?, image);

        let empty = PixelBuffer::new([0, 0].into(), 1, vec![])?;
        assert!(equalize_histogram(&empty)?.is_empty());

        Ok(())
    }

    #[test]
    fn equalize_grayscale_spreads_levels() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let image = PixelBuffer::new(
            [4, 1].into(),
            3,
            vec![
                100, 100, 100,
                101, 101, 101,
                102, 102, 102,
                103, 103, 103,
            ],
        )?;

        let equalized = equalize_grayscale(&image)?;
        assert_eq!(equalized.num_channels(), 3);
        #[rustfmt::skip]
        assert_eq!(
            equalized.as_slice(),
            &[
                0, 0, 0,
                85, 85, 85,
                170, 170, 170,
                255, 255, 255,
            ]
        );

        let gray = PixelBuffer::from_size_val([2, 2].into(), 1, 0)?;
        assert_eq!(
            equalize_grayscale(&gray),
            Err(ImageError::ChannelCountMismatch(3, 1))
        );

        Ok(())
    }

    #[test]
    fn equalize_ycrcb_keeps_neutral_chroma() -> Result<(), ImageError> {
        let image = PixelBuffer::new([2, 1].into(), 3, vec![40, 40, 40, 80, 80, 80])?;

        let equalized = equalize_ycrcb(&image)?;
        assert_eq!(equalized.as_slice(), &[0, 0, 0, 255, 255, 255]);

        Ok(())
    }
    #[test]
    fn equalize_ycrcb_leaves_chroma_untouched() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let image = PixelBuffer::new(
            [4, 1].into(),
            3,
            vec![
                200, 30, 30,
                30, 200, 30,
                30, 30, 200,
                120, 90, 60,
            ],
        )?;

        let ycrcb = color::ycrcb_from_rgb(&image)?;
        let mut equalized = ycrcb.clone();
        equalize_luma(&mut equalized)?;

        let before = ycrcb.split_channels()?;
        let after = equalized.split_channels()?;

        // Cr and Cb vary across the pixels, equalizing them would change them
        assert_ne!(before[1].as_slice()[0], before[1].as_slice()[1]);
        assert_eq!(after[1], before[1]);
        assert_eq!(after[2], before[2]);

        // luma is stretched to the full range
        let (y_min, y_max) = (
            after[0].as_slice().iter().min().copied(),
            after[0].as_slice().iter().max().copied(),
        );
        assert_eq!((y_min, y_max), (Some(0), Some(255)));

        assert_eq!(equalize_ycrcb(&image)?, color::rgb_from_ycrcb(&equalized)?);

        Ok(())
    }
}
