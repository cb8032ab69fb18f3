#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use lithovision_image as image;

#[doc(inline)]
pub use lithovision_imgproc as imgproc;

#[doc(inline)]
pub use lithovision_io as io;

#[doc(inline)]
pub use lithovision_render as render;
