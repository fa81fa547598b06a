#![deny(missing_docs)]
//! Pixel buffer types for 8-bit raster images

/// image representation for image processing purposes.
pub mod image;

/// Error types for the image module.
pub mod error;

pub use crate::error::ImageError;
pub use crate::image::{ImageSize, PixelBuffer, SUPPORTED_CHANNELS};
