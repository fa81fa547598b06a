/// An error type for the image and image processing modules.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ImageError {
    /// Error when the data length does not match the image size.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when the number of channels is not supported by the pixel buffer.
    #[error("Unsupported number of channels ({0}), expected 1 or 3")]
    UnsupportedChannelCount(usize),

    /// Error when an operation expects a different number of channels.
    #[error("Expected an image with {0} channels, got {1}")]
    ChannelCountMismatch(usize, usize),

    /// Error when the channel index is out of bounds.
    #[error("Channel index {0} is out of bounds for an image with {1} channels")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when the pixel coordinates are out of bounds.
    #[error("Pixel ({0}, {1}) is out of bounds for an image of size {2}x{3}")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when two images are expected to have the same size.
    #[error("Image size ({0}x{1}) does not match ({2}x{3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when a binarization is requested on a multi-channel image.
    #[error("Image needs to be converted to grayscale, got {0} channels")]
    GrayscaleRequired(usize),

    /// Error when an operation parameter is outside its domain.
    #[error("Invalid parameter `{0}`: {1}")]
    InvalidParameter(&'static str, String),

    /// Error when the sample arithmetic of an operation would be meaningless.
    #[error("Range error: {0}")]
    RangeError(String),
}
