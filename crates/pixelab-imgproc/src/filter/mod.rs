//! Spatial filters.
//!
//! Every windowed operation of this module samples outside the image with the
//! reflect-101 border of [`crate::padding::BORDER_MODE`] and keeps the image size.

/// Filter kernels
pub mod kernels;

/// Kuwahara edge preserving filter
mod kuwahara;
pub use kuwahara::kuwahara;

/// Median filter
mod median;
pub use median::median_blur;

/// Filter operations
mod ops;
pub use ops::*;

/// Separable filter operations
mod separable_filter;
pub(crate) use separable_filter::SeparableFilter;
pub use separable_filter::separable_filter;
