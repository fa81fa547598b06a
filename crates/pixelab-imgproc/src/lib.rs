#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// color transformations module.
pub mod color;

/// sample level helpers shared by the transforms.
pub mod core;

/// image enhancement module.
pub mod enhance;

/// image filtering module.
pub mod filter;

/// compute image histogram module.
pub mod histogram;

/// operations to normalize images.
pub mod normalize;

/// border handling for the windowed operations.
pub mod padding;

/// module containing parallization utilities.
pub mod parallel;

/// operations to threshold images.
pub mod threshold;
