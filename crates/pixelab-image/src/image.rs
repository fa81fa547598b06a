use crate::error::ImageError;

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use pixelab_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl ImageSize {
    /// Number of pixels covered by the size.
    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

impl From<ImageSize> for [u32; 2] {
    fn from(size: ImageSize) -> Self {
        [size.width as u32, size.height as u32]
    }
}

/// Channel counts a [`PixelBuffer`] can hold.
pub const SUPPORTED_CHANNELS: [usize; 2] = [1, 3];

/// Represents an 8-bit image with one (gray) or three (RGB) channels.
///
/// The samples are stored row-major and channel-interleaved, i.e. with shape
/// (H, W, C), so the sample of channel `c` at pixel `(x, y)` lives at
/// `(y * W + x) * C + c`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    size: ImageSize,
    channels: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a new pixel buffer from sample data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `channels` - The number of channels, 1 or 3.
    /// * `data` - The interleaved sample data of the image.
    ///
    /// # Errors
    ///
    /// If the number of channels is not supported or the length of the data
    /// does not match the image size, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixelab_image::{ImageSize, PixelBuffer};
    ///
    /// let image = PixelBuffer::new(
    ///    ImageSize {
    ///       width: 10,
    ///       height: 20,
    ///    },
    ///    3,
    ///    vec![0u8; 10 * 20 * 3],
    /// ).unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// assert_eq!(image.num_channels(), 3);
    /// ```
    pub fn new(size: ImageSize, channels: usize, data: Vec<u8>) -> Result<Self, ImageError> {
        if !SUPPORTED_CHANNELS.contains(&channels) {
            return Err(ImageError::UnsupportedChannelCount(channels));
        }

        // check if the data length matches the image size
        if data.len() != size.area() * channels {
            return Err(ImageError::InvalidChannelShape(
                data.len(),
                size.area() * channels,
            ));
        }

        Ok(Self {
            size,
            channels,
            data,
        })
    }

    /// Create a new pixel buffer with every sample set to `val`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixelab_image::{ImageSize, PixelBuffer};
    ///
    /// let image = PixelBuffer::from_size_val(
    ///   ImageSize {
    ///     width: 10,
    ///     height: 20,
    ///   },
    ///   1,
    ///   7,
    /// ).unwrap();
    ///
    /// assert_eq!(image.num_channels(), 1);
    /// assert!(image.as_slice().iter().all(|&v| v == 7));
    /// ```
    pub fn from_size_val(size: ImageSize, channels: usize, val: u8) -> Result<Self, ImageError> {
        Self::new(size, channels, vec![val; size.area() * channels])
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the number of columns of the image.
    pub fn cols(&self) -> usize {
        self.width()
    }

    /// Get the number of rows of the image.
    pub fn rows(&self) -> usize {
        self.height()
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of channels in the image.
    pub fn num_channels(&self) -> usize {
        self.channels
    }

    /// Whether the image holds a single channel.
    pub fn is_grayscale(&self) -> bool {
        self.channels == 1
    }

    /// Whether the image has no pixels.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of samples per row, i.e. `width * channels`.
    pub fn row_stride(&self) -> usize {
        self.size.width * self.channels
    }

    /// Get the samples of the image as a slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Get the samples of the image as a mutable slice.
    pub fn as_slice_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the image and return its samples.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Get a single sample, or `None` when the index is out of bounds.
    ///
    /// # Arguments
    ///
    /// * `x` - The column of the pixel.
    /// * `y` - The row of the pixel.
    /// * `ch` - The channel of the sample.
    pub fn get(&self, x: usize, y: usize, ch: usize) -> Option<u8> {
        if x >= self.width() || y >= self.height() || ch >= self.channels {
            return None;
        }
        self.data.get(self.offset(x, y) + ch).copied()
    }

    /// Get all the channels of the pixel at `(x, y)`.
    ///
    /// # Errors
    ///
    /// If the coordinates are out of bounds, an error is returned.
    pub fn get_pixel(&self, x: usize, y: usize) -> Result<&[u8], ImageError> {
        self.check_bounds(x, y)?;
        let offset = self.offset(x, y);
        Ok(&self.data[offset..offset + self.channels])
    }

    /// Overwrite all the channels of the pixel at `(x, y)`.
    ///
    /// # Errors
    ///
    /// If the coordinates are out of bounds or `values` does not hold one
    /// sample per channel, an error is returned and the image is unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixelab_image::PixelBuffer;
    ///
    /// let mut image = PixelBuffer::from_size_val([2, 2].into(), 3, 0).unwrap();
    /// image.set_pixel(1, 0, &[255, 128, 0]).unwrap();
    ///
    /// assert_eq!(image.get_pixel(1, 0).unwrap(), &[255, 128, 0]);
    /// assert!(image.set_pixel(2, 0, &[0, 0, 0]).is_err());
    /// ```
    pub fn set_pixel(&mut self, x: usize, y: usize, values: &[u8]) -> Result<(), ImageError> {
        self.check_bounds(x, y)?;
        if values.len() != self.channels {
            return Err(ImageError::ChannelCountMismatch(
                self.channels,
                values.len(),
            ));
        }
        let offset = self.offset(x, y);
        self.data[offset..offset + self.channels].copy_from_slice(values);
        Ok(())
    }

    /// Get a channel of the image as a single channel image.
    ///
    /// # Errors
    ///
    /// If the channel index is out of bounds, an error is returned.
    pub fn channel(&self, channel: usize) -> Result<PixelBuffer, ImageError> {
        if channel >= self.channels {
            return Err(ImageError::ChannelIndexOutOfBounds(channel, self.channels));
        }

        let channel_data = self
            .data
            .iter()
            .skip(channel)
            .step_by(self.channels)
            .copied()
            .collect();

        PixelBuffer::new(self.size, 1, channel_data)
    }

    /// Split the image into its channels.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixelab_image::PixelBuffer;
    ///
    /// let image = PixelBuffer::new([2, 1].into(), 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
    ///
    /// let channels = image.split_channels().unwrap();
    /// assert_eq!(channels.len(), 3);
    /// assert_eq!(channels[1].as_slice(), &[2, 5]);
    /// ```
    pub fn split_channels(&self) -> Result<Vec<PixelBuffer>, ImageError> {
        (0..self.channels).map(|ch| self.channel(ch)).collect()
    }

    /// Interleave single channel images into one image.
    ///
    /// # Errors
    ///
    /// If any input has more than one channel, if the sizes differ, or if the
    /// number of inputs is not a supported channel count, an error is returned.
    pub fn from_channels(channels: &[PixelBuffer]) -> Result<PixelBuffer, ImageError> {
        let first = channels
            .first()
            .ok_or(ImageError::UnsupportedChannelCount(0))?;
        let size = first.size();

        for ch in channels {
            if ch.num_channels() != 1 {
                return Err(ImageError::ChannelCountMismatch(1, ch.num_channels()));
            }
            if ch.size() != size {
                return Err(ImageError::InvalidImageSize(
                    size.width,
                    size.height,
                    ch.width(),
                    ch.height(),
                ));
            }
        }

        let mut data = Vec::with_capacity(size.area() * channels.len());
        for i in 0..size.area() {
            data.extend(channels.iter().map(|ch| ch.data[i]));
        }

        PixelBuffer::new(size, channels.len(), data)
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width() + x) * self.channels
    }

    fn check_bounds(&self, x: usize, y: usize) -> Result<(), ImageError> {
        if x >= self.width() || y >= self.height() {
            return Err(ImageError::PixelIndexOutOfBounds(
                x,
                y,
                self.width(),
                self.height(),
            ));
        }
        Ok(())
    }
}
