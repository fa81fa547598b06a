use std::path::PathBuf;

/// Errors raised while reading or writing image files.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// The input path does not point to a file.
    #[error("No such image file: {0}")]
    FileDoesNotExist(PathBuf),

    /// The output extension does not name a format the encoder knows.
    #[error("Cannot infer an image format from the extension of {0}")]
    InvalidFileExtension(PathBuf),

    /// Opening, reading or writing the file failed.
    #[error("Image file access failed. {0}")]
    FileError(#[from] std::io::Error),

    /// The decoded samples do not form a valid pixel buffer.
    #[error("Decoded data is not a valid pixel buffer. {0}")]
    ImageCreationError(#[from] pixelab_image::ImageError),

    /// The codec rejected the data.
    #[error("Image codec failed. {0}")]
    ImageCodecError(#[from] image::ImageError),
}
