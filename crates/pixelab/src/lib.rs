#![doc = include_str!("../README.md")]

#[doc(inline)]
pub use pixelab_image as image;

#[doc(inline)]
pub use pixelab_imgproc as imgproc;

#[doc(inline)]
pub use pixelab_io as io;
